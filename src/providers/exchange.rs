//! Exchange Rate API Client
//!
//! API: https://api.exchangerate-api.com/v4/latest/{CODE}
//! Free, no API key required. Reports USD and KZT against the base.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::models::errors::{AppError, AppResult};
use crate::models::types::{ExchangeSnapshot, Rate};
use crate::providers::http::{encode_component, read_json};
use crate::utils::constants::{
    MSG_RATE_EMPTY, MSG_RATE_FAILED, MSG_RATE_NOT_FOUND, TARGET_CURRENCY,
};

/// Rate table for one base currency
#[derive(Debug, Deserialize)]
pub struct RateTable {
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    /// Entries are read individually; a malformed one only affects itself
    #[serde(default)]
    pub rates: Option<Map<String, Value>>,
}

/// Uppercase and trim a currency code
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Today's UTC date as `YYYY-MM-DD`
fn today() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Reduce a rate table to the snapshot we report.
/// `requested` is only used when the table omits its own base code.
pub fn snapshot_from_table(table: RateTable, requested: &str) -> AppResult<ExchangeSnapshot> {
    let rates = table
        .rates
        .ok_or_else(|| AppError::upstream_empty(MSG_RATE_EMPTY))?;

    Ok(ExchangeSnapshot {
        base: table
            .base
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| requested.to_string()),
        usd_rate: Rate::from_upstream(rates.get("USD").and_then(Value::as_f64)),
        kzt_rate: Rate::from_upstream(rates.get(TARGET_CURRENCY).and_then(Value::as_f64)),
        date: table.date.filter(|d| !d.is_empty()).unwrap_or_else(today),
    })
}

/// Exchange Rate API client
#[derive(Clone)]
pub struct ExchangeRateClient {
    client: reqwest::Client,
    base_url: String,
}

impl ExchangeRateClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Fetch USD and KZT rates for `currency`
    pub async fn fetch_rates(&self, currency: &str) -> AppResult<ExchangeSnapshot> {
        let code = normalize_code(currency);
        let url = format!("{}/v4/latest/{}", self.base_url, encode_component(&code));

        info!("💱 ExchangeRate: Fetching rates for {}", code);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::from(e).context(MSG_RATE_FAILED))?;

        if !response.status().is_success() {
            warn!("⚠️ ExchangeRate {} for {}", response.status(), code);
            return Err(AppError::upstream_status(MSG_RATE_NOT_FOUND));
        }

        let table: RateTable = read_json(response)
            .await
            .map_err(|e| e.context(MSG_RATE_FAILED))?;

        snapshot_from_table(table, &code)
    }
}
