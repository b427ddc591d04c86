//! Canned data for dry runs and webhook smoke tests.

use crate::{AlertPayload, PayloadMeta, SleepKind, SleepRecord};
use chrono::{DateTime, Utc};

fn record(
    score: f64,
    total_sleep_duration: f64,
    sleep_latency: f64,
    average_hrv: f64,
    end_time: &str,
) -> SleepRecord {
    SleepRecord {
        score: Some(score),
        total_sleep_duration: Some(total_sleep_duration),
        sleep_latency: Some(sleep_latency),
        average_hrv: Some(average_hrv),
        end_time: DateTime::parse_from_rfc3339(end_time)
            .unwrap_or_else(|_| DateTime::<Utc>::UNIX_EPOCH.fixed_offset()),
        kind: SleepKind::LongSleep,
    }
}

/// Three nights, most recent first: two poor nights then a good one
pub fn sample_records() -> Vec<SleepRecord> {
    vec![
        // 320 min, 45 min latency
        record(65.0, 19200.0, 2700.0, 35.0, "2025-10-29T08:00:00+00:00"),
        // 340 min, 38 min latency
        record(68.0, 20400.0, 2280.0, 32.0, "2025-10-28T08:00:00+00:00"),
        // 420 min, 15 min latency
        record(82.0, 25200.0, 900.0, 55.0, "2025-10-27T08:00:00+00:00"),
    ]
}

/// Fixed payload for checking that a webhook accepts our shape
pub fn sample_payload() -> AlertPayload {
    AlertPayload {
        title: "Oura Sleep Alert".into(),
        message: "Sleep score 68. Total 325 min. Ease up this morning.".into(),
        meta: PayloadMeta {
            sleep_score: 68.0,
            total_sleep_min: 325,
            sleep_latency_min: Some(35),
            hrv_avg_ms: None,
            date: "2025-10-29T07:00:00.123Z".into(),
            streak: None,
        },
    }
}
