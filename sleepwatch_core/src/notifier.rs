//! Alert delivery.
//!
//! Alerts go to a webhook as JSON over HTTP POST, or are only logged when
//! no webhook is configured. Delivery is attempted once.

use crate::config::WebhookConfig;
use crate::{AlertPayload, Error, Result};
use std::time::Duration;

/// Destination for alert payloads
pub trait Notifier {
    fn notify(&mut self, payload: &AlertPayload) -> Result<()>;
}

/// Posts payloads to a webhook URL
pub struct WebhookNotifier {
    client: reqwest::blocking::Client,
    url: String,
}

impl WebhookNotifier {
    /// Create a notifier for the given URL
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Send a payload and return the HTTP status, whatever it is
    pub fn post(&self, payload: &AlertPayload) -> Result<reqwest::StatusCode> {
        tracing::debug!("POST {}", self.url);
        let response = self.client.post(&self.url).json(payload).send()?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::Webhook {
                status: status.as_u16(),
                body,
            });
        }

        Ok(status)
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&mut self, payload: &AlertPayload) -> Result<()> {
        self.post(payload)?;
        tracing::info!("Alert sent to webhook: {}", payload.title);
        Ok(())
    }
}

/// Logs payloads instead of sending them
#[derive(Debug, Default)]
pub struct LogNotifier {
    /// Payloads seen so far, in order
    pub sent: Vec<AlertPayload>,
}

impl Notifier for LogNotifier {
    fn notify(&mut self, payload: &AlertPayload) -> Result<()> {
        let meta = serde_json::to_string(&payload.meta)?;
        tracing::debug!("Would notify: {} {}", payload.message, meta);
        self.sent.push(payload.clone());
        Ok(())
    }
}

/// Pick the webhook notifier when a URL is configured, else the logger
pub fn from_config(config: &WebhookConfig) -> Result<Box<dyn Notifier>> {
    match config.target() {
        Some(url) => Ok(Box::new(WebhookNotifier::new(url, config.timeout_secs)?)),
        None => {
            tracing::debug!("No webhook configured, alerts will only be logged");
            Ok(Box::new(LogNotifier::default()))
        }
    }
}
