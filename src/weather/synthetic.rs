//! Synthetic weather generator
//!
//! Produces physically plausible hourly observations from a random baseline
//! with hour-to-hour correlated variation. Stands in for a real provider and
//! simulates its latency with a bounded delay.

use async_trait::async_trait;
use chrono::Duration;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

use super::{FetchKind, ForecastSource, ObservationRequest};
use crate::config::SourceConfig;
use crate::models::WeatherObservation;

/// Random-walk weather generator with simulated latency
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    seed: Option<u64>,
    current_latency: std::time::Duration,
    forecast_latency: std::time::Duration,
}

impl SyntheticSource {
    /// Generator without any artificial delay
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            seed,
            current_latency: std::time::Duration::ZERO,
            forecast_latency: std::time::Duration::ZERO,
        }
    }

    #[must_use]
    pub fn from_config(config: &SourceConfig) -> Self {
        Self {
            seed: config.seed,
            current_latency: std::time::Duration::from_millis(config.current_latency_ms),
            forecast_latency: std::time::Duration::from_millis(config.forecast_latency_ms),
        }
    }

    #[must_use]
    pub fn with_latency(
        mut self,
        current: std::time::Duration,
        forecast: std::time::Duration,
    ) -> Self {
        self.current_latency = current;
        self.forecast_latency = forecast;
        self
    }

    fn latency(&self, kind: FetchKind) -> std::time::Duration {
        match kind {
            FetchKind::Current => self.current_latency,
            FetchKind::Forecast => self.forecast_latency,
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Generate the observation series without any delay
    #[must_use]
    pub fn generate(&self, request: &ObservationRequest) -> Vec<WeatherObservation> {
        let mut rng = self.rng();

        // Cooler baseline towards the poles
        let base_temp = 22.0 - 0.3 * request.location.latitude.abs() + rng.random_range(-3.0..3.0);
        let mut wind = rng.random_range(4.0..10.0);
        let mut pressure = rng.random_range(1000.0..1010.0);

        (0..request.hours)
            .map(|i| {
                let hour = f64::from(i);
                if i > 0 {
                    wind = (wind + rng.random_range(-1.5..1.5)).clamp(0.5, 25.0);
                    pressure = (pressure + rng.random_range(-0.8..0.8)).clamp(960.0, 1050.0);
                }

                let gust = wind + 2.0 + rng.random_range(0.0..4.0);
                let precip = f64::max(0.0, (rng.random::<f64>() - 0.6) * 2.0);
                let visibility = (6.0 + rng.random_range(0.0..4.0) - precip * 3.0).max(0.1);

                WeatherObservation {
                    time: request.anchor + Duration::hours(i64::from(i)),
                    temp_c: base_temp + (hour / 2.0).sin() * 3.0,
                    wind_speed_mps: wind,
                    wind_gust_mps: gust,
                    precip_mmph: precip,
                    visibility_km: visibility,
                    pressure_hpa: pressure,
                    cloud_cover_pct: rng.random_range(40.0..=100.0),
                }
            })
            .collect()
    }
}

#[async_trait]
impl ForecastSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    #[instrument(name = "synthetic_fetch", level = "debug", skip(self), fields(hours = request.hours))]
    async fn hourly_observations(
        &self,
        request: &ObservationRequest,
    ) -> crate::Result<Vec<WeatherObservation>> {
        let latency = self.latency(request.kind);
        if !latency.is_zero() {
            debug!("Simulating {}ms source latency", latency.as_millis());
            tokio::time::sleep(latency).await;
        }

        Ok(self.generate(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Location;
    use chrono::{TimeZone, Utc};

    fn request(hours: u32) -> ObservationRequest {
        ObservationRequest {
            location: Location::new(55.75, 37.62),
            anchor: Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap(),
            hours,
            kind: FetchKind::Forecast,
        }
    }

    #[test]
    fn test_generates_hourly_series() {
        let source = SyntheticSource::new(Some(7));
        let req = request(6);
        let observations = source.generate(&req);

        assert_eq!(observations.len(), 6);
        assert_eq!(observations[0].time, req.anchor);
        for pair in observations.windows(2) {
            assert_eq!(pair[1].time - pair[0].time, Duration::hours(1));
        }
    }

    #[test]
    fn test_values_are_plausible() {
        let source = SyntheticSource::new(Some(11));
        for obs in source.generate(&request(48)) {
            assert!((0.5..=25.0).contains(&obs.wind_speed_mps));
            assert!(obs.wind_gust_mps >= obs.wind_speed_mps + 2.0);
            assert!(obs.precip_mmph >= 0.0 && obs.precip_mmph <= 0.8);
            assert!(obs.visibility_km > 0.0);
            assert!((960.0..=1050.0).contains(&obs.pressure_hpa));
            assert!((40.0..=100.0).contains(&obs.cloud_cover_pct));
            assert!(obs.temp_c.is_finite());
        }
    }

    #[test]
    fn test_seed_makes_output_reproducible() {
        let a = SyntheticSource::new(Some(42)).generate(&request(12));
        let b = SyntheticSource::new(Some(42)).generate(&request(12));
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_fetch_without_latency() {
        let source = SyntheticSource::new(Some(1));
        let observations = source.hourly_observations(&request(3)).await.unwrap();
        assert_eq!(observations.len(), 3);
        assert_eq!(source.name(), "synthetic");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_waits_for_configured_latency() {
        let source = SyntheticSource::new(Some(1)).with_latency(
            std::time::Duration::from_millis(400),
            std::time::Duration::from_millis(500),
        );
        let started = tokio::time::Instant::now();
        source.hourly_observations(&request(1)).await.unwrap();
        assert!(started.elapsed() >= std::time::Duration::from_millis(500));
    }
}
