//! Core domain types for sleepwatch.
//!
//! This module defines the fundamental types used throughout the system:
//! - Sleep session records as returned by the provider
//! - Alert thresholds
//! - Per-night metrics and the evaluation result

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize, Serializer};

// ============================================================================
// Provider Records
// ============================================================================

/// Kind of sleep session reported by the provider
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SleepKind {
    LongSleep,
    Sleep,
    LateNap,
    Rest,
    Deleted,
    #[serde(other)]
    Other,
}

impl SleepKind {
    /// Whether this kind marks a full overnight or long sleep (not a nap)
    pub fn is_completed(self) -> bool {
        matches!(self, SleepKind::LongSleep | SleepKind::Sleep)
    }
}

/// A single sleep session as returned by the provider.
///
/// Only the fields the evaluator consumes are modelled; anything else the
/// provider sends is ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct SleepRecord {
    #[serde(default)]
    pub score: Option<f64>,
    /// Seconds; the provider may send whole or fractional numbers
    #[serde(default)]
    pub total_sleep_duration: Option<f64>,
    /// Seconds
    #[serde(default)]
    pub sleep_latency: Option<f64>,
    #[serde(default)]
    pub average_hrv: Option<f64>,
    pub end_time: DateTime<FixedOffset>,
    #[serde(rename = "type")]
    pub kind: SleepKind,
}

// ============================================================================
// Thresholds
// ============================================================================

pub const DEFAULT_SCORE_THRESHOLD: f64 = 75.0;
pub const DEFAULT_MIN_TOTAL_SLEEP_MIN: f64 = 360.0;
pub const DEFAULT_MAX_SLEEP_LATENCY_MIN: f64 = 30.0;
pub const DEFAULT_POOR_NIGHTS_STREAK: u32 = 2;

/// Static health thresholds a night is judged against
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Thresholds {
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f64,

    #[serde(default = "default_min_total_sleep_min")]
    pub min_total_sleep_min: f64,

    #[serde(default = "default_max_sleep_latency_min")]
    pub max_sleep_latency_min: f64,

    /// Streak length at which a single-night alert escalates
    #[serde(default = "default_poor_nights_streak")]
    pub poor_nights_streak: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            min_total_sleep_min: DEFAULT_MIN_TOTAL_SLEEP_MIN,
            max_sleep_latency_min: DEFAULT_MAX_SLEEP_LATENCY_MIN,
            poor_nights_streak: DEFAULT_POOR_NIGHTS_STREAK,
        }
    }
}

fn default_score_threshold() -> f64 {
    DEFAULT_SCORE_THRESHOLD
}

fn default_min_total_sleep_min() -> f64 {
    DEFAULT_MIN_TOTAL_SLEEP_MIN
}

fn default_max_sleep_latency_min() -> f64 {
    DEFAULT_MAX_SLEEP_LATENCY_MIN
}

fn default_poor_nights_streak() -> u32 {
    DEFAULT_POOR_NIGHTS_STREAK
}

// ============================================================================
// Evaluation Output
// ============================================================================

fn whole_minutes(seconds: f64) -> i64 {
    (seconds / 60.0).floor() as i64
}

/// Serialize whole numbers without a fractional part (`65`, not `65.0`)
pub(crate) fn serialize_number<S: Serializer>(
    value: &f64,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

pub(crate) fn serialize_opt_number<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serialize_number(v, serializer),
        None => serializer.serialize_none(),
    }
}

/// Metrics extracted from one sleep record, in the units alerts use
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NightMetrics {
    #[serde(serialize_with = "serialize_number")]
    pub sleep_score: f64,
    pub total_sleep_min: i64,
    pub sleep_latency_min: Option<i64>,
    #[serde(serialize_with = "serialize_opt_number")]
    pub hrv_avg_ms: Option<f64>,
    pub date: DateTime<FixedOffset>,
}

impl NightMetrics {
    /// Extract metrics from a record.
    ///
    /// Missing score and duration count as zero; missing latency and HRV
    /// stay absent. Minutes are floored.
    pub fn from_record(record: &SleepRecord) -> Self {
        Self {
            sleep_score: record.score.unwrap_or(0.0),
            total_sleep_min: whole_minutes(record.total_sleep_duration.unwrap_or(0.0)),
            sleep_latency_min: record.sleep_latency.map(whole_minutes),
            hrv_avg_ms: record.average_hrv,
            date: record.end_time,
        }
    }
}

/// Outcome of evaluating the most recent night
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AlertResult {
    pub poor_night: bool,
    /// Consecutive poor nights ending at (and including) the latest one
    pub streak: u32,
    #[serde(flatten)]
    pub latest: NightMetrics,
}
