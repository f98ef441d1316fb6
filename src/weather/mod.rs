//! Weather sources
//!
//! A [`ForecastSource`] supplies hourly observations for a location. The
//! forecast service scores whatever the source returns, so a live provider can
//! replace the synthetic generator without touching the safety logic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{Location, WeatherObservation};

pub mod synthetic;

pub use synthetic::SyntheticSource;

/// Which dashboard operation triggered the fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Current,
    Forecast,
}

/// Parameters of one observation fetch
#[derive(Debug, Clone)]
pub struct ObservationRequest {
    pub location: Location,
    /// Time of the first observation
    pub anchor: DateTime<Utc>,
    /// Number of hourly observations wanted, at least one
    pub hours: u32,
    pub kind: FetchKind,
}

/// Provider of hourly weather observations
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Fetch `request.hours` observations, one per hour starting at `request.anchor`
    async fn hourly_observations(
        &self,
        request: &ObservationRequest,
    ) -> crate::Result<Vec<WeatherObservation>>;
}
