//! Profile sources - the boundary the aggregator talks to
//!
//! Every method returns an `Envelope`; nothing raw escapes. Two
//! implementations exist:
//! - `Upstreams`: calls the third-party APIs directly (used by the server)
//! - `BackendClient`: calls our own `/api/*` routes (used by the client binary)

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::warn;

use crate::api::types::Envelope;
use crate::models::config::Config;
use crate::models::errors::AppResult;
use crate::models::types::{CountryInfo, ExchangeSnapshot, NewsArticle, Person};
use crate::providers::http::{build_client, encode_component};
use crate::providers::{CountriesClient, ExchangeRateClient, NewsClient, RandomUserClient};
use crate::utils::constants::{MSG_NEWS_FAILED, MSG_SERVER_UNREACHABLE};

/// Anything that can answer the four lookups
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn random_user(&self) -> Envelope<Person>;
    async fn country(&self, name: &str) -> Envelope<CountryInfo>;
    async fn exchange_rate(&self, code: &str) -> Envelope<ExchangeSnapshot>;
    /// Failures still carry `data: []`
    async fn news(&self, country: &str) -> Envelope<Vec<NewsArticle>>;
}

/// Shared handle, so one source can back several aggregators
pub type SharedProfileSource = Arc<dyn ProfileSource>;

#[async_trait]
impl<S: ProfileSource + ?Sized> ProfileSource for Arc<S> {
    async fn random_user(&self) -> Envelope<Person> {
        (**self).random_user().await
    }

    async fn country(&self, name: &str) -> Envelope<CountryInfo> {
        (**self).country(name).await
    }

    async fn exchange_rate(&self, code: &str) -> Envelope<ExchangeSnapshot> {
        (**self).exchange_rate(code).await
    }

    async fn news(&self, country: &str) -> Envelope<Vec<NewsArticle>> {
        (**self).news(country).await
    }
}

// ============================================
// Direct upstream access
// ============================================

/// The four upstream clients, built from one configuration
#[derive(Clone)]
pub struct Upstreams {
    pub random_user: RandomUserClient,
    pub countries: CountriesClient,
    pub exchange: ExchangeRateClient,
    pub news: NewsClient,
}

impl Upstreams {
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let client = build_client(config.upstream_timeout)?;
        let urls = &config.upstreams;
        Ok(Self {
            random_user: RandomUserClient::new(client.clone(), urls.random_user.clone()),
            countries: CountriesClient::new(client.clone(), urls.countries.clone()),
            exchange: ExchangeRateClient::new(client.clone(), urls.exchange.clone()),
            news: NewsClient::new(client, urls.news.clone(), config.news_api_key.clone()),
        })
    }
}

/// Log a failed adapter call with its error code, then wrap it
fn envelope<T>(what: &str, result: AppResult<T>) -> Envelope<T> {
    if let Err(e) = &result {
        warn!(code = e.code_str(), "{} failed: {}", what, e.message);
    }
    Envelope::from_result(result)
}

#[async_trait]
impl ProfileSource for Upstreams {
    async fn random_user(&self) -> Envelope<Person> {
        envelope("random user", self.random_user.fetch_person().await)
    }

    async fn country(&self, name: &str) -> Envelope<CountryInfo> {
        envelope("country lookup", self.countries.fetch_country(name).await)
    }

    async fn exchange_rate(&self, code: &str) -> Envelope<ExchangeSnapshot> {
        envelope("exchange rate", self.exchange.fetch_rates(code).await)
    }

    async fn news(&self, country: &str) -> Envelope<Vec<NewsArticle>> {
        match self.news.fetch_headlines(country).await {
            Ok(articles) => Envelope::success(articles),
            Err(e) => {
                warn!(code = e.code_str(), "news failed: {}", e.message);
                Envelope::from_error_with_data(&e, Vec::new())
            }
        }
    }
}

// ============================================
// Backend over HTTP
// ============================================

/// Consumes this crate's own HTTP API
#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// GET an envelope. Failure bodies (404/500) are envelopes too.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<Envelope<T>> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).send().await?;
        Ok(response.json::<Envelope<T>>().await?)
    }

    async fn get_or<T: DeserializeOwned>(&self, path: &str, message: &str) -> Envelope<T> {
        match self.get(path).await {
            Ok(env) => env,
            Err(e) => {
                warn!(code = e.code_str(), "GET {} failed: {}", path, e.message);
                Envelope::failure(message)
            }
        }
    }
}

#[async_trait]
impl ProfileSource for BackendClient {
    async fn random_user(&self) -> Envelope<Person> {
        self.get_or("/api/random-user", MSG_SERVER_UNREACHABLE).await
    }

    async fn country(&self, name: &str) -> Envelope<CountryInfo> {
        let path = format!("/api/country/{}", encode_component(name));
        self.get_or(&path, MSG_SERVER_UNREACHABLE).await
    }

    async fn exchange_rate(&self, code: &str) -> Envelope<ExchangeSnapshot> {
        let path = format!("/api/exchange-rate/{}", encode_component(code));
        self.get_or(&path, MSG_SERVER_UNREACHABLE).await
    }

    async fn news(&self, country: &str) -> Envelope<Vec<NewsArticle>> {
        let path = format!("/api/news/{}", encode_component(country));
        let mut env: Envelope<Vec<NewsArticle>> = self.get_or(&path, MSG_NEWS_FAILED).await;
        // Always hand back a list
        if env.data.is_none() {
            env.data = Some(Vec::new());
        }
        env
    }
}
