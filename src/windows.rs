//! Safe window extraction
//!
//! Collapses an ordered forecast into the maximal runs of adjacent points whose
//! safety index stays at or above a threshold. Adjacency is by position in the
//! sequence, gaps in the timestamps do not split a run.

use chrono::{DateTime, Utc};

use crate::models::{ForecastPoint, SafeWindow};

/// Window under construction during the scan
struct OpenWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    max_safety_index: u8,
}

impl OpenWindow {
    fn close(self) -> SafeWindow {
        SafeWindow {
            start: self.start,
            end: self.end,
            max_safety_index: self.max_safety_index,
        }
    }
}

/// Extract safe windows in chronological order.
///
/// A point qualifies when `safety_index >= threshold`. Each window ends at the
/// last qualifying point of its run, so a lone qualifying point yields a window
/// whose start equals its end.
#[must_use]
pub fn extract_safe_windows(points: &[ForecastPoint], threshold: u8) -> Vec<SafeWindow> {
    let mut windows = Vec::new();
    let mut current: Option<OpenWindow> = None;

    for point in points {
        let index = point.safety_index();

        if index >= threshold {
            match &mut current {
                Some(open) => {
                    open.end = point.time();
                    open.max_safety_index = open.max_safety_index.max(index);
                }
                None => {
                    current = Some(OpenWindow {
                        start: point.time(),
                        end: point.time(),
                        max_safety_index: index,
                    });
                }
            }
        } else if let Some(open) = current.take() {
            windows.push(open.close());
        }
    }

    // Run reaching the end of the forecast includes the final point
    if let Some(open) = current {
        windows.push(open.close());
    }

    windows
}

/// Windows ordered best first: highest peak index, then earliest start.
///
/// Returns a new vector; the chronological input is left as is.
#[must_use]
pub fn rank_by_peak(windows: &[SafeWindow]) -> Vec<SafeWindow> {
    let mut ranked = windows.to_vec();
    ranked.sort_by(|a, b| {
        b.max_safety_index
            .cmp(&a.max_safety_index)
            .then(a.start.cmp(&b.start))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeatherObservation;
    use crate::safety::{SafetyAssessment, SAFE_THRESHOLD};
    use chrono::{Duration, TimeZone};

    fn t(i: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 6, 0, 0).unwrap() + Duration::hours(i)
    }

    /// Points with preset indices; the observation itself is irrelevant to extraction
    fn points(indices: &[u8]) -> Vec<ForecastPoint> {
        indices
            .iter()
            .enumerate()
            .map(|(i, &index)| ForecastPoint {
                observation: WeatherObservation {
                    time: t(i64::try_from(i).unwrap()),
                    temp_c: 15.0,
                    wind_speed_mps: 3.0,
                    wind_gust_mps: 4.0,
                    precip_mmph: 0.0,
                    visibility_km: 10.0,
                    pressure_hpa: 1010.0,
                    cloud_cover_pct: 20.0,
                },
                assessment: SafetyAssessment::from_index(index),
            })
            .collect()
    }

    fn window(start: i64, end: i64, max: u8) -> SafeWindow {
        SafeWindow {
            start: t(start),
            end: t(end),
            max_safety_index: max,
        }
    }

    #[test]
    fn test_empty_forecast() {
        assert!(extract_safe_windows(&[], SAFE_THRESHOLD).is_empty());
    }

    #[test]
    fn test_no_qualifying_points() {
        let forecast = points(&[79, 60, 10]);
        assert!(extract_safe_windows(&forecast, SAFE_THRESHOLD).is_empty());
    }

    #[test]
    fn test_all_points_qualify() {
        let forecast = points(&[81, 95, 80, 88]);
        let windows = extract_safe_windows(&forecast, SAFE_THRESHOLD);
        assert_eq!(windows, vec![window(0, 3, 95)]);
    }

    #[test]
    fn test_split_runs() {
        let forecast = points(&[85, 90, 55, 95, 82]);
        let windows = extract_safe_windows(&forecast, SAFE_THRESHOLD);
        assert_eq!(windows, vec![window(0, 1, 90), window(3, 4, 95)]);
    }

    #[test]
    fn test_alternating_points() {
        let forecast = points(&[90, 10, 85, 10, 99, 10]);
        let windows = extract_safe_windows(&forecast, SAFE_THRESHOLD);
        assert_eq!(
            windows,
            vec![window(0, 0, 90), window(2, 2, 85), window(4, 4, 99)]
        );
    }

    #[test]
    fn test_single_point() {
        let windows = extract_safe_windows(&points(&[80]), SAFE_THRESHOLD);
        assert_eq!(windows, vec![window(0, 0, 80)]);
    }

    #[test]
    fn test_custom_threshold() {
        let forecast = points(&[65, 70, 59, 62]);
        let windows = extract_safe_windows(&forecast, 60);
        assert_eq!(windows, vec![window(0, 1, 70), window(3, 3, 62)]);
    }

    #[test]
    fn test_time_gaps_do_not_split_runs() {
        let mut forecast = points(&[90, 90]);
        forecast[1].observation.time = t(5);
        let windows = extract_safe_windows(&forecast, SAFE_THRESHOLD);
        assert_eq!(windows, vec![window(0, 5, 90)]);
    }

    #[test]
    fn test_rank_by_peak_leaves_input_order() {
        let chronological = vec![window(0, 1, 90), window(3, 4, 95), window(6, 6, 90)];
        let ranked = rank_by_peak(&chronological);

        assert_eq!(
            ranked,
            vec![window(3, 4, 95), window(0, 1, 90), window(6, 6, 90)]
        );
        assert_eq!(chronological[0], window(0, 1, 90));
    }
}
