//! Forecast point, safe window and weather response models

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{Location, WeatherObservation};
use crate::safety::{self, SafetyAssessment, SafetyClass};
use crate::windows;

/// One hourly observation together with its safety assessment.
///
/// Serialized as a single flat object so the dashboard sees
/// `time`, `temp_c`, ..., `safety_index`, `safety_class` side by side.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastPoint {
    #[serde(flatten)]
    pub observation: WeatherObservation,
    #[serde(flatten)]
    pub assessment: SafetyAssessment,
}

impl ForecastPoint {
    /// Score an observation and wrap it into a forecast point
    #[must_use]
    pub fn from_observation(observation: WeatherObservation) -> Self {
        let assessment = safety::assess(&observation);
        Self {
            observation,
            assessment,
        }
    }

    #[must_use]
    pub fn time(&self) -> DateTime<Utc> {
        self.observation.time
    }

    #[must_use]
    pub fn safety_index(&self) -> u8 {
        self.assessment.safety_index
    }

    #[must_use]
    pub fn safety_class(&self) -> SafetyClass {
        self.assessment.safety_class
    }
}

/// Contiguous run of forecast points that stay at or above the safe threshold
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SafeWindow {
    /// Time of the first point in the run
    pub start: DateTime<Utc>,
    /// Time of the last point in the run (inclusive)
    pub end: DateTime<Utc>,
    /// Highest safety index seen inside the run
    pub max_safety_index: u8,
}

impl SafeWindow {
    /// Time covered between the first and the last point of the window
    #[must_use]
    pub fn span(&self) -> Duration {
        self.end - self.start
    }

    /// Whether a flight of `d` fits, counting the hour of the last point
    #[must_use]
    pub fn holds(&self, d: Duration) -> bool {
        self.span() + Duration::hours(1) >= d
    }
}

/// Weather response consumed by the dashboard cards, timelines and safe window lists
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WeatherData {
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drone_id: Option<String>,
    /// First point of `forecast`
    pub current: ForecastPoint,
    /// Hourly points, ascending by time
    pub forecast: Vec<ForecastPoint>,
    /// Safe windows in chronological order
    #[serde(default)]
    pub safe_windows: Vec<SafeWindow>,
}

impl WeatherData {
    /// Bundle a forecast into a response, deriving current conditions and safe windows.
    ///
    /// Returns `None` for an empty forecast since there is no current point.
    #[must_use]
    pub fn from_forecast(
        location: Location,
        drone_id: Option<String>,
        forecast: Vec<ForecastPoint>,
        safe_threshold: u8,
    ) -> Option<Self> {
        let current = forecast.first()?.clone();
        let safe_windows = windows::extract_safe_windows(&forecast, safe_threshold);

        Some(Self {
            location,
            drone_id,
            current,
            forecast,
            safe_windows,
        })
    }

    /// Safe windows ordered best first, leaving `safe_windows` untouched
    #[must_use]
    pub fn ranked_safe_windows(&self) -> Vec<SafeWindow> {
        windows::rank_by_peak(&self.safe_windows)
    }

    /// Forecast point covering the given instant (the latest point not after it)
    #[must_use]
    pub fn point_at(&self, t: DateTime<Utc>) -> Option<&ForecastPoint> {
        self.forecast.iter().take_while(|p| p.time() <= t).last()
    }
}
