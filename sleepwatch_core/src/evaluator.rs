//! Night evaluation and poor-night streak counting.
//!
//! Pure functions: no I/O, no clock. Records must already be filtered to
//! completed sessions and ordered most recent first.

use crate::{AlertResult, NightMetrics, SleepRecord, Thresholds};

/// Whether a night fails at least one threshold.
///
/// A night without latency data is never penalised for latency.
pub fn is_poor_night(metrics: &NightMetrics, thresholds: &Thresholds) -> bool {
    let latency_too_long = metrics
        .sleep_latency_min
        .is_some_and(|latency| latency as f64 > thresholds.max_sleep_latency_min);

    metrics.sleep_score < thresholds.score_threshold
        || (metrics.total_sleep_min as f64) < thresholds.min_total_sleep_min
        || latency_too_long
}

/// Count consecutive poor nights from the front of `records`.
///
/// Stops at the first good night; later poor nights don't count.
pub fn streak_length(records: &[SleepRecord], thresholds: &Thresholds) -> u32 {
    records
        .iter()
        .map(NightMetrics::from_record)
        .take_while(|metrics| is_poor_night(metrics, thresholds))
        .count() as u32
}

/// Evaluate the latest night and the streak ending at it.
///
/// Returns `None` for an empty slice.
pub fn evaluate(records: &[SleepRecord], thresholds: &Thresholds) -> Option<AlertResult> {
    let latest = NightMetrics::from_record(records.first()?);
    let poor_night = is_poor_night(&latest, thresholds);
    let streak = if poor_night {
        streak_length(records, thresholds)
    } else {
        0
    };

    tracing::debug!(
        "Evaluated {} records: poor_night={}, streak={}",
        records.len(),
        poor_night,
        streak
    );

    Some(AlertResult {
        poor_night,
        streak,
        latest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SleepKind;
    use chrono::{DateTime, Duration};

    fn night(days_ago: i64, score: f64, total_min: i64, latency_min: Option<i64>) -> SleepRecord {
        let base = DateTime::parse_from_rfc3339("2025-10-29T08:00:00+00:00").unwrap();
        SleepRecord {
            score: Some(score),
            total_sleep_duration: Some((total_min * 60) as f64),
            sleep_latency: latency_min.map(|m| (m * 60) as f64),
            average_hrv: Some(40.0),
            end_time: base - Duration::days(days_ago),
            kind: SleepKind::LongSleep,
        }
    }

    fn good(days_ago: i64) -> SleepRecord {
        night(days_ago, 85.0, 450, Some(10))
    }

    fn poor(days_ago: i64) -> SleepRecord {
        night(days_ago, 60.0, 300, Some(45))
    }

    #[test]
    fn test_empty_input_returns_none() {
        assert!(evaluate(&[], &Thresholds::default()).is_none());
    }

    #[test]
    fn test_low_score_is_poor() {
        let records = vec![night(0, 74.0, 450, Some(10))];
        let result = evaluate(&records, &Thresholds::default()).unwrap();
        assert!(result.poor_night);
        assert_eq!(result.streak, 1);
    }

    #[test]
    fn test_short_sleep_is_poor() {
        let records = vec![night(0, 90.0, 359, Some(10))];
        let result = evaluate(&records, &Thresholds::default()).unwrap();
        assert!(result.poor_night);
    }

    #[test]
    fn test_long_latency_is_poor() {
        let records = vec![night(0, 90.0, 450, Some(31))];
        let result = evaluate(&records, &Thresholds::default()).unwrap();
        assert!(result.poor_night);
    }

    #[test]
    fn test_latency_at_limit_is_fine() {
        let records = vec![night(0, 75.0, 360, Some(30))];
        let result = evaluate(&records, &Thresholds::default()).unwrap();
        assert!(!result.poor_night);
        assert_eq!(result.streak, 0);
    }

    #[test]
    fn test_missing_latency_never_counts() {
        let thresholds = Thresholds {
            max_sleep_latency_min: 0.0,
            ..Thresholds::default()
        };
        let records = vec![night(0, 90.0, 450, None)];
        let result = evaluate(&records, &thresholds).unwrap();

        assert!(!result.poor_night);
        assert_eq!(result.latest.sleep_latency_min, None);
    }

    #[test]
    fn test_streak_stops_at_first_good_night() {
        let records = vec![poor(0), poor(1), good(2)];
        let result = evaluate(&records, &Thresholds::default()).unwrap();
        assert!(result.poor_night);
        assert_eq!(result.streak, 2);
    }

    #[test]
    fn test_streak_counts_all_poor_nights() {
        let records = vec![poor(0), poor(1), poor(2)];
        let result = evaluate(&records, &Thresholds::default()).unwrap();
        assert_eq!(result.streak, 3);
    }

    #[test]
    fn test_streak_ignores_poor_nights_after_gap() {
        let records = vec![poor(0), good(1), poor(2), poor(3)];
        assert_eq!(streak_length(&records, &Thresholds::default()), 1);
    }

    #[test]
    fn test_good_latest_night_has_no_streak() {
        let records = vec![good(0), poor(1), poor(2)];
        let result = evaluate(&records, &Thresholds::default()).unwrap();
        assert!(!result.poor_night);
        assert_eq!(result.streak, 0);
    }

    #[test]
    fn test_identical_records_all_count() {
        let records = vec![poor(0), poor(0), poor(0)];
        let result = evaluate(&records, &Thresholds::default()).unwrap();
        assert_eq!(result.streak, 3);
    }

    #[test]
    fn test_latest_metrics_extracted() {
        let records = vec![night(0, 65.0, 320, Some(45)), good(1)];
        let result = evaluate(&records, &Thresholds::default()).unwrap();

        assert_eq!(result.latest.sleep_score, 65.0);
        assert_eq!(result.latest.total_sleep_min, 320);
        assert_eq!(result.latest.sleep_latency_min, Some(45));
        assert_eq!(result.latest.hrv_avg_ms, Some(40.0));
        assert_eq!(result.latest.date, records[0].end_time);
    }
}
