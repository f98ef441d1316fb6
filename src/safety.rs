//! Flight Safety Scoring
//!
//! Maps a single weather observation to a safety index (0-100) and a safety
//! class. The index starts at 100 and every weather factor subtracts a fixed
//! penalty once its value crosses a threshold. The per-factor breakdown shown
//! to operators is built from the very same penalty functions, so the
//! breakdown always sums to the index.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::WeatherObservation;

/// Index at or above which conditions are classified as safe
pub const SAFE_THRESHOLD: u8 = 80;

/// Index at or above which conditions are classified as caution
pub const CAUTION_THRESHOLD: u8 = 60;

const BASELINE: i32 = 100;

/// Coarse safety bucket, serialized with the dashboard's traffic-light names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SafetyClass {
    /// Index >= 80
    #[serde(rename = "green")]
    Safe,
    /// 60 <= index < 80
    #[serde(rename = "yellow")]
    Caution,
    /// Index < 60
    #[serde(rename = "red")]
    Unsafe,
}

impl SafetyClass {
    /// Classify a safety index
    #[must_use]
    pub fn from_index(index: u8) -> Self {
        match index {
            i if i >= SAFE_THRESHOLD => SafetyClass::Safe,
            i if i >= CAUTION_THRESHOLD => SafetyClass::Caution,
            _ => SafetyClass::Unsafe,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            SafetyClass::Safe => "SAFE",
            SafetyClass::Caution => "CAUTION",
            SafetyClass::Unsafe => "UNSAFE",
        }
    }

    /// Get color-coded representation
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match self {
            SafetyClass::Safe => "🟢",
            SafetyClass::Caution => "🟡",
            SafetyClass::Unsafe => "🔴",
        }
    }

    /// Short operator-facing advice for this class
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            SafetyClass::Safe => "Conditions are favorable for flight",
            SafetyClass::Caution => "Flight possible with caution, conditions are marginal",
            SafetyClass::Unsafe => "Flight not recommended",
        }
    }
}

impl fmt::Display for SafetyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Safety index and its derived class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyAssessment {
    /// Integer score in 0..=100
    pub safety_index: u8,
    pub safety_class: SafetyClass,
}

impl SafetyAssessment {
    #[must_use]
    pub fn from_index(safety_index: u8) -> Self {
        Self {
            safety_index,
            safety_class: SafetyClass::from_index(safety_index),
        }
    }
}

/// Weather factors that contribute to the safety index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyFactor {
    Wind,
    Temperature,
    Precipitation,
    Visibility,
    CloudCover,
}

/// Penalty one factor applied to the index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorContribution {
    pub factor: SafetyFactor,
    /// Zero or negative change applied to the baseline of 100
    pub delta: i32,
    /// Measured value with its unit
    pub description: String,
}

/// Full explanation of a safety assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyReport {
    pub safety_index: u8,
    pub safety_class: SafetyClass,
    pub message: String,
    pub factors: Vec<FactorContribution>,
}

impl SafetyReport {
    /// Assess an observation and keep the per-factor breakdown
    #[must_use]
    pub fn analyze(observation: &WeatherObservation) -> Self {
        let factors = factor_breakdown(observation);
        let assessment = SafetyAssessment::from_index(index_from_deltas(
            factors.iter().map(|f| f.delta),
        ));

        Self {
            safety_index: assessment.safety_index,
            safety_class: assessment.safety_class,
            message: assessment.safety_class.message().to_string(),
            factors,
        }
    }

    /// Factors that actually lowered the index, worst first
    #[must_use]
    pub fn limiting_factors(&self) -> Vec<&FactorContribution> {
        let mut limiting: Vec<_> = self.factors.iter().filter(|f| f.delta < 0).collect();
        limiting.sort_by_key(|f| f.delta);
        limiting
    }
}

/// Score a single observation.
///
/// Pure and total: any finite (or even non-finite) input yields an index in 0..=100.
#[must_use]
pub fn assess(observation: &WeatherObservation) -> SafetyAssessment {
    let deltas = [
        wind_penalty(observation.wind_speed_mps, observation.wind_gust_mps),
        temperature_penalty(observation.temp_c),
        precipitation_penalty(observation.precip_mmph),
        visibility_penalty(observation.visibility_km),
        cloud_cover_penalty(observation.cloud_cover_pct),
    ];
    SafetyAssessment::from_index(index_from_deltas(deltas))
}

/// Per-factor deltas for an observation
#[must_use]
pub fn factor_breakdown(observation: &WeatherObservation) -> Vec<FactorContribution> {
    let wind_description = match observation.gust_factor() {
        Some(g) if g > 1.5 => format!(
            "{}, gust factor {:.1}",
            observation.format_wind(),
            g
        ),
        _ => observation.format_wind(),
    };

    vec![
        FactorContribution {
            factor: SafetyFactor::Wind,
            delta: wind_penalty(observation.wind_speed_mps, observation.wind_gust_mps),
            description: wind_description,
        },
        FactorContribution {
            factor: SafetyFactor::Temperature,
            delta: temperature_penalty(observation.temp_c),
            description: observation.format_temperature(),
        },
        FactorContribution {
            factor: SafetyFactor::Precipitation,
            delta: precipitation_penalty(observation.precip_mmph),
            description: observation.format_precipitation(),
        },
        FactorContribution {
            factor: SafetyFactor::Visibility,
            delta: visibility_penalty(observation.visibility_km),
            description: observation.format_visibility(),
        },
        FactorContribution {
            factor: SafetyFactor::CloudCover,
            delta: cloud_cover_penalty(observation.cloud_cover_pct),
            description: observation.format_cloud_cover(),
        },
    ]
}

fn index_from_deltas(deltas: impl IntoIterator<Item = i32>) -> u8 {
    let raw = BASELINE + deltas.into_iter().sum::<i32>();
    // clamp keeps the value inside 0..=100, so the cast is lossless
    raw.clamp(0, 100) as u8
}

/// Sustained wind penalty plus gust factor penalty (gust > 1.5x sustained)
fn wind_penalty(speed_mps: f64, gust_mps: f64) -> i32 {
    let sustained = match speed_mps {
        s if s > 15.0 => -30,
        s if s > 10.0 => -15,
        s if s > 7.0 => -5,
        _ => 0,
    };
    let gust = if gust_mps > speed_mps * 1.5 { -10 } else { 0 };
    sustained + gust
}

/// Penalty grows with distance from the 5-25°C comfort band
fn temperature_penalty(temp_c: f64) -> i32 {
    match temp_c {
        t if t < -10.0 || t > 35.0 => -20,
        t if t < 0.0 || t > 30.0 => -10,
        t if t < 5.0 || t > 25.0 => -5,
        _ => 0,
    }
}

fn precipitation_penalty(precip_mmph: f64) -> i32 {
    match precip_mmph {
        p if p > 2.0 => -25,
        p if p > 1.0 => -15,
        p if p > 0.5 => -5,
        _ => 0,
    }
}

fn visibility_penalty(visibility_km: f64) -> i32 {
    match visibility_km {
        v if v < 1.0 => -30,
        v if v < 3.0 => -15,
        v if v < 5.0 => -5,
        _ => 0,
    }
}

fn cloud_cover_penalty(cloud_cover_pct: f64) -> i32 {
    if cloud_cover_pct > 90.0 { -5 } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::weather::fixtures;
    use chrono::Utc;
    use proptest::prelude::*;
    use rstest::rstest;

    fn observation() -> WeatherObservation {
        fixtures::calm(Utc::now())
    }

    #[test]
    fn test_calm_conditions_score_full_marks() {
        let assessment = assess(&observation());
        assert_eq!(assessment.safety_index, 100);
        assert_eq!(assessment.safety_class, SafetyClass::Safe);
    }

    #[test]
    fn test_strong_wind_without_gust_factor() {
        let mut obs = observation();
        obs.wind_speed_mps = 16.0;
        obs.wind_gust_mps = 10.0;

        let assessment = assess(&obs);
        assert_eq!(assessment.safety_index, 70);
        assert_eq!(assessment.safety_class, SafetyClass::Caution);
    }

    #[rstest]
    #[case(80, SafetyClass::Safe)]
    #[case(100, SafetyClass::Safe)]
    #[case(79, SafetyClass::Caution)]
    #[case(60, SafetyClass::Caution)]
    #[case(59, SafetyClass::Unsafe)]
    #[case(0, SafetyClass::Unsafe)]
    fn test_classification_thresholds(#[case] index: u8, #[case] expected: SafetyClass) {
        assert_eq!(SafetyClass::from_index(index), expected);
    }

    #[rstest]
    #[case(7.0, 0)]
    #[case(7.1, -5)]
    #[case(10.0, -5)]
    #[case(10.5, -15)]
    #[case(15.0, -15)]
    #[case(15.1, -30)]
    fn test_wind_penalty_bands(#[case] speed: f64, #[case] expected: i32) {
        // Gust equal to sustained speed never triggers the gust factor
        assert_eq!(wind_penalty(speed, speed), expected);
    }

    #[rstest]
    #[case(4.0, 6.0, 0)]
    #[case(4.0, 6.1, -10)]
    #[case(12.0, 20.0, -25)]
    #[case(0.0, 0.5, -10)]
    fn test_gust_factor_penalty_stacks(
        #[case] speed: f64,
        #[case] gust: f64,
        #[case] expected: i32,
    ) {
        assert_eq!(wind_penalty(speed, gust), expected);
    }

    #[rstest]
    #[case(5.0, 0)]
    #[case(25.0, 0)]
    #[case(4.9, -5)]
    #[case(0.0, -5)]
    #[case(25.1, -5)]
    #[case(30.0, -5)]
    #[case(-0.1, -10)]
    #[case(-10.0, -10)]
    #[case(30.1, -10)]
    #[case(35.0, -10)]
    #[case(-10.1, -20)]
    #[case(35.1, -20)]
    #[case(-60.0, -20)]
    fn test_temperature_penalty_bands(#[case] temp: f64, #[case] expected: i32) {
        assert_eq!(temperature_penalty(temp), expected);
    }

    #[rstest]
    #[case(0.5, 0)]
    #[case(0.6, -5)]
    #[case(1.0, -5)]
    #[case(2.0, -15)]
    #[case(2.1, -25)]
    fn test_precipitation_penalty_bands(#[case] precip: f64, #[case] expected: i32) {
        assert_eq!(precipitation_penalty(precip), expected);
    }

    #[rstest]
    #[case(5.0, 0)]
    #[case(4.9, -5)]
    #[case(3.0, -5)]
    #[case(2.9, -15)]
    #[case(1.0, -15)]
    #[case(0.9, -30)]
    fn test_visibility_penalty_bands(#[case] visibility: f64, #[case] expected: i32) {
        assert_eq!(visibility_penalty(visibility), expected);
    }

    #[rstest]
    #[case(90.0, 0)]
    #[case(90.5, -5)]
    fn test_cloud_cover_penalty(#[case] cloud: f64, #[case] expected: i32) {
        assert_eq!(cloud_cover_penalty(cloud), expected);
    }

    #[test]
    fn test_index_clamps_at_zero() {
        let obs = WeatherObservation {
            time: Utc::now(),
            temp_c: -40.0,
            wind_speed_mps: 30.0,
            wind_gust_mps: 60.0,
            precip_mmph: 12.0,
            visibility_km: 0.2,
            pressure_hpa: 960.0,
            cloud_cover_pct: 100.0,
        };
        let assessment = assess(&obs);
        assert_eq!(assessment.safety_index, 0);
        assert_eq!(assessment.safety_class, SafetyClass::Unsafe);
    }

    #[test]
    fn test_non_finite_input_still_scores() {
        let mut obs = observation();
        obs.wind_speed_mps = f64::NAN;
        obs.temp_c = f64::INFINITY;
        let assessment = assess(&obs);
        assert!(assessment.safety_index <= 100);
    }

    proptest! {
        #[test]
        fn test_index_bounded_for_any_observation(
            temp_c in -80.0f64..60.0,
            wind_speed_mps in 0.0f64..60.0,
            wind_gust_mps in 0.0f64..90.0,
            precip_mmph in 0.0f64..50.0,
            visibility_km in 0.0f64..50.0,
            pressure_hpa in 900.0f64..1080.0,
            cloud_cover_pct in 0.0f64..=100.0,
        ) {
            let obs = WeatherObservation {
                time: Utc::now(),
                temp_c,
                wind_speed_mps,
                wind_gust_mps,
                precip_mmph,
                visibility_km,
                pressure_hpa,
                cloud_cover_pct,
            };

            let assessment = assess(&obs);
            prop_assert!(assessment.safety_index <= 100);
            prop_assert_eq!(
                SafetyClass::from_index(assessment.safety_index),
                assessment.safety_class
            );

            let report = SafetyReport::analyze(&obs);
            let raw = 100 + report.factors.iter().map(|f| f.delta).sum::<i32>();
            prop_assert_eq!(i32::from(report.safety_index), raw.clamp(0, 100));
            prop_assert_eq!(report.safety_index, assessment.safety_index);
        }

        #[test]
        fn test_index_bounded_for_any_finite_values(
            temp_c in any::<f64>().prop_filter("finite", |v| v.is_finite()),
            wind_speed_mps in any::<f64>().prop_filter("finite", |v| v.is_finite()),
            wind_gust_mps in any::<f64>().prop_filter("finite", |v| v.is_finite()),
            precip_mmph in any::<f64>().prop_filter("finite", |v| v.is_finite()),
            visibility_km in any::<f64>().prop_filter("finite", |v| v.is_finite()),
        ) {
            let obs = WeatherObservation {
                time: Utc::now(),
                temp_c,
                wind_speed_mps,
                wind_gust_mps,
                precip_mmph,
                visibility_km,
                pressure_hpa: 1013.0,
                cloud_cover_pct: 50.0,
            };
            prop_assert!(assess(&obs).safety_index <= 100);
        }
    }

    #[test]
    fn test_assess_is_pure() {
        let mut obs = observation();
        obs.wind_speed_mps = 11.0;
        obs.precip_mmph = 1.5;
        assert_eq!(assess(&obs), assess(&obs));
    }

    #[test]
    fn test_report_matches_assessment() {
        let mut obs = observation();
        obs.wind_speed_mps = 8.0;
        obs.wind_gust_mps = 14.0;
        obs.temp_c = 28.0;
        obs.visibility_km = 2.0;
        obs.cloud_cover_pct = 95.0;

        let report = SafetyReport::analyze(&obs);
        let assessment = assess(&obs);

        assert_eq!(report.safety_index, assessment.safety_index);
        assert_eq!(report.safety_class, assessment.safety_class);
        assert_eq!(report.factors.len(), 5);

        let sum: i32 = report.factors.iter().map(|f| f.delta).sum();
        assert_eq!(i32::from(report.safety_index), 100 + sum);
        // -5 wind, -10 gust, -5 temperature, -15 visibility, -5 cloud
        assert_eq!(report.safety_index, 60);
        assert_eq!(report.message, SafetyClass::Caution.message());
    }

    #[test]
    fn test_limiting_factors_worst_first() {
        let mut obs = observation();
        obs.precip_mmph = 3.0;
        obs.cloud_cover_pct = 95.0;

        let report = SafetyReport::analyze(&obs);
        let limiting = report.limiting_factors();

        assert_eq!(limiting.len(), 2);
        assert_eq!(limiting[0].factor, SafetyFactor::Precipitation);
        assert_eq!(limiting[0].description, "3.0 mm/h");
        assert_eq!(limiting[1].factor, SafetyFactor::CloudCover);
    }

    #[test]
    fn test_wind_description_mentions_gust_factor() {
        let mut obs = observation();
        obs.wind_speed_mps = 4.0;
        obs.wind_gust_mps = 10.0;
        let factors = factor_breakdown(&obs);
        assert!(factors[0].description.contains("gust factor 2.5"));
    }

    #[test]
    fn test_safety_class_wire_names() {
        assert_eq!(serde_json::to_string(&SafetyClass::Safe).unwrap(), "\"green\"");
        assert_eq!(serde_json::to_string(&SafetyClass::Caution).unwrap(), "\"yellow\"");
        assert_eq!(serde_json::to_string(&SafetyClass::Unsafe).unwrap(), "\"red\"");
        assert_eq!(SafetyClass::Caution.to_string(), "CAUTION");
    }
}
