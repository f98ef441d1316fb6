//! Drone Weather Forecast Module
//!
//! Turns raw hourly observations into scored forecast points and bundles them
//! with their safe windows into the [`WeatherData`] response the dashboard
//! renders. Input validation happens here, before the scoring core runs.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, instrument, warn};

use crate::config::{DroneWxConfig, ForecastConfig};
use crate::models::{ForecastPoint, Location, WeatherData, WeatherObservation};
use crate::weather::{FetchKind, ForecastSource, ObservationRequest, SyntheticSource};
use crate::{DroneWxError, Result};

/// Drone weather forecast service
#[derive(Clone)]
pub struct ForecastService {
    source: Arc<dyn ForecastSource>,
    limits: ForecastConfig,
    safe_threshold: u8,
}

impl ForecastService {
    /// Create a service over any forecast source
    pub fn new(source: Arc<dyn ForecastSource>, config: &DroneWxConfig) -> Self {
        Self {
            source,
            limits: config.forecast.clone(),
            safe_threshold: config.safety.safe_threshold,
        }
    }

    /// Create a service backed by the synthetic generator
    #[must_use]
    pub fn synthetic(config: &DroneWxConfig) -> Self {
        Self::new(Arc::new(SyntheticSource::from_config(&config.source)), config)
    }

    /// Longest forecast horizon this service accepts
    #[must_use]
    pub fn max_hours(&self) -> u32 {
        self.limits.max_hours
    }

    /// Current conditions plus the configured short-range outlook
    #[instrument(skip(self))]
    pub async fn get_current_weather(
        &self,
        lat: f64,
        lon: f64,
        drone_id: Option<String>,
    ) -> Result<WeatherData> {
        let location = Location::validated(lat, lon)?;
        info!(
            "Getting current weather for {}",
            location.format_coordinates()
        );

        self.weather_data(
            location,
            self.limits.current_hours,
            Utc::now(),
            FetchKind::Current,
            drone_id,
        )
        .await
    }

    /// Hourly forecast for the requested horizon starting now
    #[instrument(skip(self))]
    pub async fn get_forecast(
        &self,
        lat: f64,
        lon: f64,
        hours: u32,
        drone_id: Option<String>,
    ) -> Result<WeatherData> {
        let location = Location::validated(lat, lon)?;
        self.validate_hours(hours)?;
        info!(
            "Getting {}h forecast for {}",
            hours,
            location.format_coordinates()
        );

        self.weather_data(location, hours, Utc::now(), FetchKind::Forecast, drone_id)
            .await
    }

    /// Hourly forecast starting at an explicit anchor time
    pub async fn get_forecast_at(
        &self,
        location: Location,
        hours: u32,
        anchor: DateTime<Utc>,
        drone_id: Option<String>,
    ) -> Result<WeatherData> {
        let location = Location::validated(location.latitude, location.longitude)?;
        self.validate_hours(hours)?;

        self.weather_data(location, hours, anchor, FetchKind::Forecast, drone_id)
            .await
    }

    /// Generate `hours` scored forecast points, one per hour from `anchor`.
    ///
    /// Callers must pass a positive horizon.
    pub async fn generate(
        &self,
        location: Location,
        hours: u32,
        anchor: DateTime<Utc>,
        kind: FetchKind,
    ) -> Result<Vec<ForecastPoint>> {
        let request = ObservationRequest {
            location,
            anchor,
            hours,
            kind,
        };

        let observations = self.source.hourly_observations(&request).await?;
        check_hourly_series(&observations, &request)?;

        let points: Vec<ForecastPoint> = observations
            .into_iter()
            .map(ForecastPoint::from_observation)
            .collect();

        debug!(
            "Scored {} forecast points from {} source",
            points.len(),
            self.source.name()
        );

        Ok(points)
    }

    async fn weather_data(
        &self,
        location: Location,
        hours: u32,
        anchor: DateTime<Utc>,
        kind: FetchKind,
        drone_id: Option<String>,
    ) -> Result<WeatherData> {
        let forecast = self.generate(location, hours, anchor, kind).await?;

        let data = WeatherData::from_forecast(location, drone_id, forecast, self.safe_threshold)
            .ok_or_else(|| DroneWxError::fetch("Forecast source returned no data"))?;

        if data.safe_windows.is_empty() {
            warn!(
                "No safe window in the next {}h at {}",
                hours,
                location.format_coordinates()
            );
        } else {
            debug!("Found {} safe windows", data.safe_windows.len());
        }

        Ok(data)
    }

    fn validate_hours(&self, hours: u32) -> Result<()> {
        if hours == 0 {
            return Err(DroneWxError::validation(
                "Forecast horizon must be at least 1 hour",
            ));
        }

        if hours > self.limits.max_hours {
            return Err(DroneWxError::validation(format!(
                "Forecast horizon cannot exceed {} hours, got: {hours}",
                self.limits.max_hours
            )));
        }

        Ok(())
    }
}

/// Reject series that are not exactly `hours` points spaced one hour apart from the anchor
fn check_hourly_series(
    observations: &[WeatherObservation],
    request: &ObservationRequest,
) -> Result<()> {
    if observations.len() != request.hours as usize {
        return Err(DroneWxError::fetch(format!(
            "Expected {} hourly observations, got {}",
            request.hours,
            observations.len()
        )));
    }

    let mut expected = request.anchor;
    for obs in observations {
        if obs.time != expected {
            return Err(DroneWxError::fetch(format!(
                "Observation at {} breaks the hourly series (expected {})",
                obs.time, expected
            )));
        }
        expected += Duration::hours(1);
    }

    Ok(())
}
