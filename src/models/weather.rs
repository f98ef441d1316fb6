//! Weather observation model and display methods

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One hourly weather observation
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherObservation {
    /// Timestamp for this weather observation
    pub time: DateTime<Utc>,
    /// Temperature in Celsius
    pub temp_c: f64,
    /// Sustained wind speed in m/s
    pub wind_speed_mps: f64,
    /// Wind gust speed in m/s
    pub wind_gust_mps: f64,
    /// Precipitation rate in mm/h
    pub precip_mmph: f64,
    /// Visibility in kilometers
    pub visibility_km: f64,
    /// Atmospheric pressure in hPa
    pub pressure_hpa: f64,
    /// Cloud cover percentage (0-100)
    pub cloud_cover_pct: f64,
}

impl WeatherObservation {
    /// Ratio of gust speed to sustained wind speed
    #[must_use]
    pub fn gust_factor(&self) -> Option<f64> {
        (self.wind_speed_mps > 0.0).then(|| self.wind_gust_mps / self.wind_speed_mps)
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.1}°C", self.temp_c)
    }

    /// Format wind information
    #[must_use]
    pub fn format_wind(&self) -> String {
        format!(
            "{:.1} m/s (gusts {:.1} m/s)",
            self.wind_speed_mps, self.wind_gust_mps
        )
    }

    /// Format precipitation rate with unit
    #[must_use]
    pub fn format_precipitation(&self) -> String {
        format!("{:.1} mm/h", self.precip_mmph)
    }

    /// Format visibility with unit
    #[must_use]
    pub fn format_visibility(&self) -> String {
        format!("{:.1} km", self.visibility_km)
    }

    /// Format atmospheric pressure with unit
    #[must_use]
    pub fn format_pressure(&self) -> String {
        format!("{:.1} hPa", self.pressure_hpa)
    }

    /// Format cloud cover with unit
    #[must_use]
    pub fn format_cloud_cover(&self) -> String {
        format!("{:.0}%", self.cloud_cover_pct)
    }
}
