//! Alert escalation and the webhook payload shape.

use crate::types::{serialize_number, serialize_opt_number};
use crate::{AlertResult, Thresholds};
use serde::Serialize;

pub const STREAK_TITLE: &str = "⚠️ Sleep Streak Alert";
pub const POOR_NIGHT_TITLE: &str = "Poor Sleep Alert";

/// Which alert variant a result warrants
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertLevel {
    /// The latest night alone fell below thresholds
    PoorNight,
    /// The streak reached the configured escalation length
    Streak,
}

impl AlertLevel {
    /// Decide the alert variant; `None` when the latest night was fine.
    pub fn classify(result: &AlertResult, thresholds: &Thresholds) -> Option<Self> {
        if !result.poor_night {
            return None;
        }

        if result.streak >= thresholds.poor_nights_streak {
            Some(AlertLevel::Streak)
        } else {
            Some(AlertLevel::PoorNight)
        }
    }
}

/// Metrics block sent alongside every alert
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PayloadMeta {
    #[serde(serialize_with = "serialize_number")]
    pub sleep_score: f64,
    pub total_sleep_min: i64,
    pub sleep_latency_min: Option<i64>,
    #[serde(serialize_with = "serialize_opt_number")]
    pub hrv_avg_ms: Option<f64>,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streak: Option<u32>,
}

/// JSON body posted to the notification webhook
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AlertPayload {
    pub title: String,
    pub message: String,
    pub meta: PayloadMeta,
}

impl AlertPayload {
    /// Build the payload for a result at the given level
    pub fn new(result: &AlertResult, level: AlertLevel) -> Self {
        let latest = &result.latest;

        let (title, message, streak) = match level {
            AlertLevel::Streak => (
                STREAK_TITLE,
                format!(
                    "You've had {} consecutive poor nights. Consider reviewing your sleep routine.",
                    result.streak
                ),
                Some(result.streak),
            ),
            AlertLevel::PoorNight => {
                let latency = latest
                    .sleep_latency_min
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "N/A".to_string());
                (
                    POOR_NIGHT_TITLE,
                    format!(
                        "Your sleep last night fell below thresholds. Score: {}, Total: {} min, Latency: {} min.",
                        latest.sleep_score, latest.total_sleep_min, latency
                    ),
                    None,
                )
            }
        };

        Self {
            title: title.to_string(),
            message,
            meta: PayloadMeta {
                sleep_score: latest.sleep_score,
                total_sleep_min: latest.total_sleep_min,
                sleep_latency_min: latest.sleep_latency_min,
                hrv_avg_ms: latest.hrv_avg_ms,
                date: latest.date.to_rfc3339(),
                streak,
            },
        }
    }

    /// Classify and build in one step; `None` when no alert is due
    pub fn for_result(result: &AlertResult, thresholds: &Thresholds) -> Option<Self> {
        AlertLevel::classify(result, thresholds).map(|level| Self::new(result, level))
    }
}
