use axum::{
    Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};

use crate::error::DroneWxError;
use crate::forecast::ForecastService;
use crate::models::WeatherData;
use crate::planner::{FlightPlan, FlightPlanRequest, FlightPlanner};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub forecasts: ForecastService,
    pub planner: FlightPlanner,
    /// Horizon used when a forecast request names none
    pub default_hours: u32,
}

#[derive(Debug, Deserialize)]
pub struct CurrentWeatherQuery {
    pub lat: f64,
    pub lon: f64,
    pub drone_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub lat: f64,
    pub lon: f64,
    pub hours: Option<u32>,
    pub drone_id: Option<String>,
}

impl IntoResponse for DroneWxError {
    fn into_response(self) -> Response {
        let status = match &self {
            DroneWxError::Validation { .. } => StatusCode::BAD_REQUEST,
            DroneWxError::Fetch { .. } => StatusCode::BAD_GATEWAY,
            DroneWxError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {self}");
        } else {
            warn!("Rejected request: {self}");
        }

        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}

impl From<QueryRejection> for DroneWxError {
    fn from(rejection: QueryRejection) -> Self {
        DroneWxError::validation(rejection.body_text())
    }
}

impl From<JsonRejection> for DroneWxError {
    fn from(rejection: JsonRejection) -> Self {
        DroneWxError::validation(rejection.body_text())
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/weather/current", get(get_current_weather))
        .route("/weather/forecast", get(get_forecast))
        .route("/flights/plan", post(plan_flight))
}

async fn get_current_weather(
    State(state): State<AppState>,
    query: Result<Query<CurrentWeatherQuery>, QueryRejection>,
) -> Result<Json<WeatherData>, DroneWxError> {
    let Query(query) = query?;
    let data = state
        .forecasts
        .get_current_weather(query.lat, query.lon, query.drone_id)
        .await?;
    Ok(Json(data))
}

async fn get_forecast(
    State(state): State<AppState>,
    query: Result<Query<ForecastQuery>, QueryRejection>,
) -> Result<Json<WeatherData>, DroneWxError> {
    let Query(query) = query?;
    let hours = query.hours.unwrap_or(state.default_hours);
    let data = state
        .forecasts
        .get_forecast(query.lat, query.lon, hours, query.drone_id)
        .await?;
    Ok(Json(data))
}

async fn plan_flight(
    State(state): State<AppState>,
    request: Result<Json<FlightPlanRequest>, JsonRejection>,
) -> Result<Json<FlightPlan>, DroneWxError> {
    let Json(request) = request?;
    let plan = state.planner.plan_flight(&request).await?;
    Ok(Json(plan))
}
