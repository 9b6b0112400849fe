//! News API Client
//!
//! API: https://newsapi.org/v2/everything?q={query}&language=en&pageSize=5&apiKey={key}
//! Requires an API key. The key is injected at construction time; a missing
//! key is reported before any request is made.
//!
//! The index answers errors with a JSON body (`status: "error"`), so the body
//! is decoded whatever the HTTP status is.

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::models::errors::{AppError, AppResult};
use crate::models::types::NewsArticle;
use crate::providers::http::{encode_component, mask_api_key, read_json};
use crate::utils::constants::{
    MSG_NEWS_FAILED, MSG_NEWS_KEY_MISSING, MSG_NO_NEWS, NEWS_LANGUAGE, NEWS_PAGE_SIZE,
    NO_ARTICLE_URL, NO_DESCRIPTION, NO_TITLE, UNKNOWN_SOURCE,
};

/// News API response
#[derive(Debug, Deserialize)]
pub struct NewsResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub articles: Option<Vec<RawArticle>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url_to_image: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub source: Option<RawSource>,
    #[serde(default)]
    pub published_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawSource {
    #[serde(default)]
    pub name: Option<String>,
}

fn or_placeholder(value: Option<String>, placeholder: &str) -> String {
    value
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| placeholder.to_string())
}

impl From<RawArticle> for NewsArticle {
    fn from(raw: RawArticle) -> Self {
        NewsArticle {
            title: or_placeholder(raw.title, NO_TITLE),
            description: or_placeholder(raw.description, NO_DESCRIPTION),
            image: raw.url_to_image.filter(|s| !s.trim().is_empty()),
            url: or_placeholder(raw.url, NO_ARTICLE_URL),
            source: or_placeholder(raw.source.and_then(|s| s.name), UNKNOWN_SOURCE),
            published_at: raw.published_at.unwrap_or_default(),
        }
    }
}

/// Turn a decoded response into at most five articles, upstream order kept
pub fn articles_from_response(response: NewsResponse) -> AppResult<Vec<NewsArticle>> {
    match (response.status.as_deref(), response.articles) {
        (Some("ok"), Some(articles)) => Ok(articles
            .into_iter()
            .take(NEWS_PAGE_SIZE)
            .map(NewsArticle::from)
            .collect()),
        _ => Err(AppError::news_unavailable(
            response
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| MSG_NO_NEWS.to_string()),
        )),
    }
}

/// News API client
#[derive(Clone)]
pub struct NewsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl NewsClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }

    /// Whether a credential was supplied
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch English headlines mentioning `country`
    pub async fn fetch_headlines(&self, country: &str) -> AppResult<Vec<NewsArticle>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::missing_api_key(MSG_NEWS_KEY_MISSING))?;

        let url = format!(
            "{}/v2/everything?q={}&language={}&pageSize={}&apiKey={}",
            self.base_url,
            encode_component(country),
            NEWS_LANGUAGE,
            NEWS_PAGE_SIZE,
            encode_component(api_key)
        );

        debug!("📰 NewsAPI: GET {}", mask_api_key(&url));

        let result = async {
            let response = self.client.get(&url).send().await?;
            read_json::<NewsResponse>(response).await
        }
        .await;

        let data = result.map_err(|e| {
            warn!("⚠️ NewsAPI request failed: {}", e);
            e.context(MSG_NEWS_FAILED)
        })?;

        let articles = articles_from_response(data)?;
        info!("📰 NewsAPI: {} articles for {}", articles.len(), country);
        Ok(articles)
    }
}
