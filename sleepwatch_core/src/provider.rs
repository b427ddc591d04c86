//! Sleep provider client.
//!
//! Fetches sleep sessions for a trailing date window from the Oura v2
//! `usercollection/sleep` endpoint and reduces them to completed sessions,
//! newest first.

use crate::config::ProviderConfig;
use crate::{Error, Result, SleepRecord};
use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration as StdDuration;

const SLEEP_PATH: &str = "/v2/usercollection/sleep";

/// Source of recent sleep sessions
pub trait SleepSource {
    /// Completed sessions in the trailing window, most recent first
    fn fetch_recent(&self) -> Result<Vec<SleepRecord>>;
}

/// One page of the provider's sleep collection
#[derive(Debug, Deserialize)]
struct SleepPage {
    #[serde(default)]
    data: Vec<serde_json::Value>,
    #[serde(default)]
    next_token: Option<String>,
}

/// Blocking HTTP client for the Oura API
pub struct OuraClient {
    client: reqwest::blocking::Client,
    base_url: String,
    token: String,
    window_days: i64,
}

impl OuraClient {
    /// Build a client from provider configuration.
    ///
    /// Fails if no access token is configured.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let token = config
            .token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Error::Config("OURA_TOKEN is not set".into()))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(StdDuration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
            window_days: config.window_days,
        })
    }

    /// Fetch every sleep session between `start` and `end` (inclusive dates),
    /// following pagination. Stops early if the provider hands back a
    /// `next_token` it already gave.
    pub fn fetch_window(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<SleepRecord>> {
        let url = format!("{}{}", self.base_url, SLEEP_PATH);
        let mut records = Vec::new();
        let mut next_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        loop {
            let mut query = vec![
                ("start_date", start.to_string()),
                ("end_date", end.to_string()),
            ];
            if let Some(token) = next_token.take() {
                query.push(("next_token", token));
            }

            tracing::debug!("GET {} {:?}", url, query);
            let response = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .query(&query)
                .send()?;

            let status = response.status();
            if !status.is_success() {
                let text = response.text().unwrap_or_default();
                let body = serde_json::from_str::<serde_json::Value>(&text).ok();
                let reason = status.canonical_reason().unwrap_or_default().to_string();

                tracing::error!("Sleep provider error: HTTP {} {}", status.as_u16(), reason);
                if let Some(ref body) = body {
                    tracing::error!("Sleep provider response: {}", body);
                }

                return Err(Error::Provider {
                    status: status.as_u16(),
                    reason,
                    body,
                });
            }

            let page: SleepPage = response.json()?;
            for (idx, value) in page.data.into_iter().enumerate() {
                match serde_json::from_value::<SleepRecord>(value) {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        tracing::warn!("Skipping unreadable sleep record {}: {}", idx, e);
                    }
                }
            }

            match page.next_token {
                Some(token) if !token.is_empty() => {
                    if !seen_tokens.insert(token.clone()) {
                        tracing::warn!("Sleep provider repeated next_token {}, stopping", token);
                        break;
                    }
                    next_token = Some(token);
                }
                _ => break,
            }
        }

        tracing::debug!("Fetched {} sleep records", records.len());
        Ok(records)
    }
}

impl SleepSource for OuraClient {
    fn fetch_recent(&self) -> Result<Vec<SleepRecord>> {
        let (start, end) = sleep_window(Utc::now().date_naive(), self.window_days);
        let records = self.fetch_window(start, end)?;
        Ok(completed_newest_first(records))
    }
}

/// Trailing window of `days` ending at `today`
pub fn sleep_window(today: NaiveDate, days: i64) -> (NaiveDate, NaiveDate) {
    (today - Duration::days(days.max(0)), today)
}

/// Keep completed sessions only, ordered by end time (newest first)
pub fn completed_newest_first(records: Vec<SleepRecord>) -> Vec<SleepRecord> {
    let mut completed: Vec<SleepRecord> = records
        .into_iter()
        .filter(|r| r.kind.is_completed())
        .collect();
    completed.sort_by(|a, b| b.end_time.cmp(&a.end_time));
    completed
}
