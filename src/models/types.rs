//! Type definitions for Country Pulse
//! Normalized shapes produced by the upstream adapters. Every entity lives
//! for the duration of one aggregation run only.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::utils::constants::NOT_AVAILABLE;

/// A randomly generated person, flattened from the upstream record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    /// Large portrait URL
    pub picture: String,
    pub age: u32,
    /// ISO-8601 timestamp as sent upstream
    pub date_of_birth: String,
    pub city: String,
    /// Free-text country name, fed to the country and news lookups
    pub country: String,
    /// `"<street number> <street name>"`
    pub address: String,
    pub email: String,
    pub phone: String,
}

impl Person {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Country metadata. Every field has its own "N/A" style default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryInfo {
    pub name: String,
    pub capital: String,
    /// All official languages joined with ", "
    pub languages: String,
    /// ISO currency code, "N/A" when the country lists none
    pub currency: String,
    pub currency_name: String,
    /// Empty when unknown
    pub currency_symbol: String,
    /// SVG flag URL, PNG fallback
    pub flag: String,
    pub population: u64,
    pub region: String,
}

impl CountryInfo {
    /// Whether the currency code is usable for an exchange-rate lookup
    pub fn has_currency(&self) -> bool {
        !self.currency.is_empty() && self.currency != NOT_AVAILABLE
    }
}

/// Exchange rate value or the "N/A" sentinel.
///
/// Serialized as a bare JSON number, or as the string `"N/A"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rate {
    Value(f64),
    NotAvailable,
}

impl Rate {
    /// Zero and missing rates are both treated as unavailable
    pub fn from_upstream(value: Option<f64>) -> Self {
        match value {
            Some(v) if v != 0.0 && v.is_finite() => Rate::Value(v),
            _ => Rate::NotAvailable,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Rate::Value(v) => Some(*v),
            Rate::NotAvailable => None,
        }
    }
}

impl Serialize for Rate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Rate::Value(v) => serializer.serialize_f64(*v),
            Rate::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

impl<'de> Deserialize<'de> for Rate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawRate {
            Number(f64),
            Text(String),
        }

        Ok(match RawRate::deserialize(deserializer)? {
            RawRate::Number(v) => Rate::Value(v),
            // "N/A" or anything unparsable
            RawRate::Text(s) => s.parse::<f64>().map(Rate::Value).unwrap_or(Rate::NotAvailable),
        })
    }
}

/// Rates for one base currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeSnapshot {
    /// Base code exactly as the rate table reports it
    pub base: String,
    pub usd_rate: Rate,
    pub kzt_rate: Rate,
    /// `YYYY-MM-DD`
    pub date: String,
}

/// A single headline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub url: String,
    pub source: String,
    pub published_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_serializes_as_number_or_sentinel() {
        let snapshot = ExchangeSnapshot {
            base: "JPY".to_string(),
            usd_rate: Rate::Value(0.0067),
            kzt_rate: Rate::NotAvailable,
            date: "2024-01-02".to_string(),
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["usdRate"], serde_json::json!(0.0067));
        assert_eq!(json["kztRate"], serde_json::json!("N/A"));

        let back: ExchangeSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_rate_from_upstream() {
        assert_eq!(Rate::from_upstream(Some(1.5)), Rate::Value(1.5));
        assert_eq!(Rate::from_upstream(Some(0.0)), Rate::NotAvailable);
        assert_eq!(Rate::from_upstream(None), Rate::NotAvailable);
    }

    #[test]
    fn test_country_without_currency() {
        let country = CountryInfo {
            name: "Antarctica".to_string(),
            capital: "N/A".to_string(),
            languages: "N/A".to_string(),
            currency: "N/A".to_string(),
            currency_name: "N/A".to_string(),
            currency_symbol: String::new(),
            flag: "N/A".to_string(),
            population: 1000,
            region: "Antarctic".to_string(),
        };
        assert!(!country.has_currency());
    }
}
