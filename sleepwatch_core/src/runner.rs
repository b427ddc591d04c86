//! One check: fetch, evaluate, and alert if warranted.

use crate::notifier::Notifier;
use crate::provider::SleepSource;
use crate::{evaluate, AlertPayload, AlertResult, Error, Result, Thresholds};

/// What a check run ended with
#[derive(Clone, Debug)]
pub enum CheckOutcome {
    /// No completed sleep sessions in the window
    NoData,
    /// Latest night was within thresholds
    NoAlert(AlertResult),
    /// An alert was built and handed to the notifier
    Alerted {
        result: AlertResult,
        payload: AlertPayload,
        /// False when the notifier failed; the failure is only logged
        delivered: bool,
    },
}

/// Run a single check.
///
/// Fetch errors propagate. Notifier errors are logged and reported through
/// `delivered`, never returned.
pub fn run_check(
    source: &dyn SleepSource,
    notifier: &mut dyn Notifier,
    thresholds: &Thresholds,
) -> Result<CheckOutcome> {
    let records = source.fetch_recent()?;

    let Some(result) = evaluate(&records, thresholds) else {
        tracing::info!("No completed sleep records in window");
        return Ok(CheckOutcome::NoData);
    };

    let Some(payload) = AlertPayload::for_result(&result, thresholds) else {
        tracing::info!(
            "No alert: score {}, total {} min",
            result.latest.sleep_score,
            result.latest.total_sleep_min
        );
        return Ok(CheckOutcome::NoAlert(result));
    };

    let delivered = match notifier.notify(&payload) {
        Ok(()) => {
            tracing::info!(
                "Alert sent: score {}, total {} min, streak {}",
                result.latest.sleep_score,
                result.latest.total_sleep_min,
                result.streak
            );
            true
        }
        Err(Error::Webhook { status, body }) => {
            tracing::error!("Webhook failed: HTTP {}", status);
            tracing::error!("Webhook response: {}", body);
            false
        }
        Err(e) => {
            tracing::error!("Webhook error: {}", e);
            false
        }
    };

    Ok(CheckOutcome::Alerted {
        result,
        payload,
        delivered,
    })
}
