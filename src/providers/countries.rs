//! REST Countries API Client
//!
//! API: https://restcountries.com/v3.1/name/{name}?fullText=false
//! Free, no API key required. Partial name matching is allowed, so a
//! query can return several records; the first one wins.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::models::errors::{AppError, AppResult};
use crate::models::types::CountryInfo;
use crate::providers::http::{encode_component, read_json};
use crate::utils::constants::{
    MSG_COUNTRY_EMPTY, MSG_COUNTRY_FAILED, MSG_COUNTRY_NOT_FOUND, NOT_AVAILABLE,
};

/// One country record. Every field is optional upstream.
#[derive(Debug, Default, Deserialize)]
pub struct RawCountry {
    #[serde(default)]
    pub name: Option<RawCountryName>,
    #[serde(default)]
    pub capital: Option<Vec<String>>,
    /// Language code -> language name, in upstream order
    #[serde(default)]
    pub languages: Option<Map<String, Value>>,
    /// Currency code -> `{ name, symbol }`, in upstream order
    #[serde(default)]
    pub currencies: Option<Map<String, Value>>,
    #[serde(default)]
    pub flags: Option<RawFlags>,
    /// Usually an integer; floats and junk are tolerated
    #[serde(default)]
    pub population: Option<Value>,
    #[serde(default)]
    pub region: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawCountryName {
    #[serde(default)]
    pub common: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawFlags {
    #[serde(default)]
    pub svg: Option<String>,
    #[serde(default)]
    pub png: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn na() -> String {
    NOT_AVAILABLE.to_string()
}

/// Head count from a JSON number, 0 when absent or not a count
fn population_of(value: Option<&Value>) -> u64 {
    value
        .and_then(|v| {
            v.as_u64().or_else(|| {
                v.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f.round() as u64)
            })
        })
        .unwrap_or(0)
}

/// Normalize one record. Each field falls back on its own.
pub fn normalize_country(raw: RawCountry) -> CountryInfo {
    let name = non_empty(raw.name.and_then(|n| n.common)).unwrap_or_else(na);

    let capital = non_empty(raw.capital.and_then(|c| c.into_iter().next())).unwrap_or_else(na);

    let languages = raw
        .languages
        .map(|langs| {
            langs
                .values()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .filter(|joined| !joined.is_empty())
        .unwrap_or_else(na);

    let first_currency = raw.currencies.and_then(|map| map.into_iter().next());
    let (currency, currency_name, currency_symbol) = match first_currency {
        Some((code, details)) => (
            code,
            details
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(na),
            details
                .get("symbol")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_default(),
        ),
        None => (na(), na(), String::new()),
    };

    let flag = raw
        .flags
        .and_then(|f| non_empty(f.svg).or_else(|| non_empty(f.png)))
        .unwrap_or_else(na);

    CountryInfo {
        name,
        capital,
        languages,
        currency,
        currency_name,
        currency_symbol,
        flag,
        population: population_of(raw.population.as_ref()),
        region: non_empty(raw.region).unwrap_or_else(na),
    }
}

/// REST Countries API client
#[derive(Clone)]
pub struct CountriesClient {
    client: reqwest::Client,
    base_url: String,
}

impl CountriesClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Look up a country by (partial) name
    pub async fn fetch_country(&self, country_name: &str) -> AppResult<CountryInfo> {
        let url = format!(
            "{}/v3.1/name/{}?fullText=false",
            self.base_url,
            encode_component(country_name)
        );

        info!("🌍 RestCountries: Looking up {}", country_name);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::from(e).context(MSG_COUNTRY_FAILED))?;

        if !response.status().is_success() {
            warn!("⚠️ RestCountries {} for {}", response.status(), country_name);
            return Err(AppError::upstream_status(MSG_COUNTRY_NOT_FOUND));
        }

        let records: Vec<RawCountry> = read_json(response)
            .await
            .map_err(|e| e.context(MSG_COUNTRY_FAILED))?;

        if records.len() > 1 {
            info!("   {} matches for {}, using the first", records.len(), country_name);
        }

        let raw = records
            .into_iter()
            .next()
            .ok_or_else(|| AppError::upstream_empty(MSG_COUNTRY_EMPTY))?;

        Ok(normalize_country(raw))
    }
}
