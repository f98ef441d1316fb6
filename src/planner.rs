//! Flight Planning Module
//!
//! Picks a start time for a drone flight from the safe windows of the forecast
//! and lays out a simple survey route whose waypoints carry the safety index
//! of the hour the drone is expected to pass them.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::forecast::ForecastService;
use crate::models::{Location, SafeWindow, WeatherData};
use crate::safety::SafetyClass;
use crate::{DroneWxError, Result};

const WAYPOINT_COUNT: i32 = 6;
const WAYPOINT_STEP_DEG: f64 = 0.01;
const BASE_ALTITUDE_M: f64 = 80.0;
const ALTITUDE_STEP_M: f64 = 5.0;
const ALTERNATIVE_OFFSET_DEG: f64 = 0.02;
const ALTERNATIVE_ALTITUDE_DROP_M: f64 = 10.0;

/// How the start time is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanningMode {
    /// Move the start into the best safe window
    #[default]
    Auto,
    /// Keep the operator's start time
    Manual,
}

/// Flight plan request as sent by the planning form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightPlanRequest {
    pub drone_id: String,
    pub location: Location,
    pub planned_start: DateTime<Utc>,
    pub duration_minutes: u32,
    #[serde(default)]
    pub mode: PlanningMode,
}

/// One point of a planned route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteWaypoint {
    #[serde(flatten)]
    pub position: Location,
    pub altitude_m: f64,
    /// Expected time over this waypoint
    pub eta: DateTime<Utc>,
    pub safety_index: u8,
    pub safety_class: SafetyClass,
}

/// Route with its summary figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub waypoints: Vec<RouteWaypoint>,
    pub distance_km: f64,
    pub max_altitude_m: f64,
    pub avg_safety_index: f64,
    pub avg_safety_class: SafetyClass,
}

impl Route {
    fn from_waypoints(waypoints: Vec<RouteWaypoint>) -> Self {
        let distance_km = waypoints
            .windows(2)
            .map(|leg| leg[0].position.distance_km(&leg[1].position))
            .sum();
        let max_altitude_m = waypoints
            .iter()
            .map(|w| w.altitude_m)
            .fold(0.0, f64::max);

        let avg_safety_index = if waypoints.is_empty() {
            0.0
        } else {
            waypoints
                .iter()
                .map(|w| f64::from(w.safety_index))
                .sum::<f64>()
                / waypoints.len() as f64
        };
        // Mean of u8 values stays inside 0..=100
        let avg_safety_class = SafetyClass::from_index(avg_safety_index.round() as u8);

        Self {
            waypoints,
            distance_km,
            max_altitude_m,
            avg_safety_index,
            avg_safety_class,
        }
    }
}

/// Planned flight returned to the operator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightPlan {
    pub drone_id: String,
    pub recommended_start: DateTime<Utc>,
    pub route: Route,
    pub alternative_routes: Vec<Route>,
    /// Safe windows of the searched forecast, chronological
    pub safe_windows: Vec<SafeWindow>,
}

/// Flight planning service
#[derive(Clone)]
pub struct FlightPlanner {
    forecasts: ForecastService,
    lookahead_hours: u32,
}

impl FlightPlanner {
    #[must_use]
    pub fn new(forecasts: ForecastService, lookahead_hours: u32) -> Self {
        Self {
            forecasts,
            lookahead_hours,
        }
    }

    /// Plan a flight: choose the start time, lay out the routes and score them
    #[instrument(skip(self, request), fields(drone_id = %request.drone_id, mode = ?request.mode))]
    pub async fn plan_flight(&self, request: &FlightPlanRequest) -> Result<FlightPlan> {
        if request.duration_minutes == 0 {
            return Err(DroneWxError::validation(
                "Flight duration must be at least 1 minute",
            ));
        }

        let flight_hours = request.duration_minutes.div_ceil(60);
        let max_hours = self.forecasts.max_hours();
        if flight_hours > max_hours {
            return Err(DroneWxError::validation(format!(
                "Flight duration cannot exceed {max_hours} hours"
            )));
        }

        let horizon = (flight_hours + self.lookahead_hours).min(max_hours);
        let data = self
            .forecasts
            .get_forecast_at(
                request.location,
                horizon,
                request.planned_start,
                Some(request.drone_id.clone()),
            )
            .await?;

        let duration = Duration::minutes(i64::from(request.duration_minutes));
        let recommended_start = match request.mode {
            PlanningMode::Manual => request.planned_start,
            PlanningMode::Auto => recommend_start(&data, request.planned_start, duration),
        };
        info!(
            "Recommended start {} for drone {} ({} safe windows)",
            recommended_start,
            request.drone_id,
            data.safe_windows.len()
        );

        let route = build_route(&data, request.location, recommended_start, duration, 0.0);
        let alternative = build_route(
            &data,
            request.location.offset(ALTERNATIVE_OFFSET_DEG, 0.0),
            recommended_start,
            duration,
            ALTERNATIVE_ALTITUDE_DROP_M,
        );

        Ok(FlightPlan {
            drone_id: request.drone_id.clone(),
            recommended_start,
            route,
            alternative_routes: vec![alternative],
            safe_windows: data.safe_windows,
        })
    }
}

/// Start of the best safe window that holds the flight, else the best window at all,
/// else the planned start
fn recommend_start(
    data: &WeatherData,
    planned_start: DateTime<Utc>,
    duration: Duration,
) -> DateTime<Utc> {
    // The forecast is anchored at the planned start, so no window begins earlier
    let ranked = data.ranked_safe_windows();
    let fitting = ranked.iter().find(|w| w.holds(duration));

    match fitting.or(ranked.first()) {
        Some(window) => {
            debug!(
                "Best window {} - {} peaks at {}",
                window.start, window.end, window.max_safety_index
            );
            window.start
        }
        None => planned_start,
    }
}

fn build_route(
    data: &WeatherData,
    origin: Location,
    start: DateTime<Utc>,
    duration: Duration,
    altitude_drop_m: f64,
) -> Route {
    let waypoints = (0..WAYPOINT_COUNT)
        .map(|i| {
            let step = f64::from(i);
            let eta = start + duration * i / WAYPOINT_COUNT;
            let point = data.point_at(eta).unwrap_or(&data.current);

            RouteWaypoint {
                position: origin.offset(WAYPOINT_STEP_DEG * step, WAYPOINT_STEP_DEG * step),
                altitude_m: BASE_ALTITUDE_M + ALTITUDE_STEP_M * step - altitude_drop_m,
                eta,
                safety_index: point.safety_index(),
                safety_class: point.safety_class(),
            }
        })
        .collect();

    Route::from_waypoints(waypoints)
}
