#![forbid(unsafe_code)]

//! Core domain model and business logic for sleepwatch.
//!
//! This crate provides:
//! - Domain types (sleep records, thresholds, evaluation results)
//! - Night evaluation and poor-night streak counting
//! - Alert escalation and the webhook payload
//! - Sleep provider client and alert notifiers
//! - Configuration and logging setup

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod evaluator;
pub mod payload;
pub mod provider;
pub mod notifier;
pub mod runner;
pub mod demo;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use evaluator::{evaluate, is_poor_night, streak_length};
pub use payload::{AlertLevel, AlertPayload, PayloadMeta};
pub use provider::{OuraClient, SleepSource};
pub use notifier::{LogNotifier, Notifier, WebhookNotifier};
pub use runner::{run_check, CheckOutcome};
