//! Constants Module - Single Source of Truth
//!
//! Sentinels, placeholders and upstream endpoints used across the crate.
//! Other modules refer to these instead of repeating literals.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for upstream requests (the news index rejects anonymous clients)
pub const USER_AGENT: &str = concat!("CountryPulse/", env!("CARGO_PKG_VERSION"));

/// Default timeout for upstream requests (seconds)
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;

/// Default listen host
pub const DEFAULT_HOST: &str = "0.0.0.0";

// ============================================
// UPSTREAM BASE URLS
// ============================================

pub const RANDOM_USER_BASE_URL: &str = "https://randomuser.me";
pub const COUNTRIES_BASE_URL: &str = "https://restcountries.com";
pub const EXCHANGE_BASE_URL: &str = "https://api.exchangerate-api.com";
pub const NEWS_BASE_URL: &str = "https://newsapi.org";

// ============================================
// SENTINELS & PLACEHOLDERS
// ============================================

/// Generic "not available" sentinel
pub const NOT_AVAILABLE: &str = "N/A";

/// Second currency reported next to USD
pub const TARGET_CURRENCY: &str = "KZT";

/// Headlines requested per lookup
pub const NEWS_PAGE_SIZE: usize = 5;

/// Language filter for headline search
pub const NEWS_LANGUAGE: &str = "en";

pub const NO_TITLE: &str = "No title available";
pub const NO_DESCRIPTION: &str = "No description available";
pub const UNKNOWN_SOURCE: &str = "Unknown source";
pub const NO_ARTICLE_URL: &str = "#";

// ============================================
// USER-FACING MESSAGES
// ============================================

pub const MSG_NO_USER: &str = "No user data found";
pub const MSG_USER_FAILED: &str = "Failed to fetch user data";
pub const MSG_COUNTRY_NOT_FOUND: &str = "Country not found";
pub const MSG_COUNTRY_EMPTY: &str = "Country data not available";
pub const MSG_COUNTRY_FAILED: &str = "Failed to fetch country data";
pub const MSG_RATE_NOT_FOUND: &str = "Exchange rate not found";
pub const MSG_RATE_EMPTY: &str = "Exchange rate data not available";
pub const MSG_RATE_FAILED: &str = "Failed to fetch exchange rate";
pub const MSG_NO_NEWS: &str = "No news articles found for this country";
pub const MSG_NEWS_FAILED: &str = "Failed to fetch news";
pub const MSG_NEWS_KEY_MISSING: &str =
    "News API key not configured. Please add NEWS_API_KEY to your .env file";
pub const MSG_SERVER_UNREACHABLE: &str = "Error connecting to server";
pub const MSG_UNEXPECTED: &str = "An unexpected error occurred. Please try again.";
pub const MSG_IN_PROGRESS: &str = "Aggregation already in progress";

/// Placeholder values that count as "no key configured"
pub fn is_placeholder_key(key: &str) -> bool {
    let key = key.trim();
    key.is_empty() || key == "YOUR_API_KEY" || key == "your_news_api_key_here"
}
