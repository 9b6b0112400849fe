//! Shared HTTP plumbing for the upstream clients
//!
//! One `reqwest::Client` is built from `Config` and cloned into each
//! provider (the client is an `Arc` internally).

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, USER_AGENT};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::utils::constants::USER_AGENT as USER_AGENT_CONST;

/// Build the HTTP client shared by all providers
pub fn build_client(timeout: Duration) -> AppResult<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_CONST));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .gzip(true)
        .build()
        .map_err(|e| AppError::with_source(ErrorCode::Unknown, "Failed to build HTTP client", e))
}

/// Percent-encode one path or query component
pub fn encode_component(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

/// Read the whole body and decode it as JSON.
///
/// Decoding from text keeps the serde error (with line/column) as the source.
pub async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> AppResult<T> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Hide the value of an `apiKey=` query parameter before logging a URL
pub fn mask_api_key(url: &str) -> String {
    match url.find("apiKey=") {
        Some(idx) => {
            let start = idx + "apiKey=".len();
            let end = url[start..].find('&').map(|i| start + i).unwrap_or(url.len());
            format!("{}***HIDDEN***{}", &url[..start], &url[end..])
        }
        None => url.to_string(),
    }
}
