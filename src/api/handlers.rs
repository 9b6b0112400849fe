//! API Request Handlers

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use super::types::*;
use crate::core::pipeline::Aggregator;
use crate::core::source::{SharedProfileSource, Upstreams};
use crate::models::config::Config;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{CountryInfo, ExchangeSnapshot, NewsArticle, Person};
use crate::utils::constants::MSG_IN_PROGRESS;

/// Shared application state
pub struct AppState {
    pub upstreams: Upstreams,
    pub aggregator: Aggregator<SharedProfileSource>,
    pub start_time: Instant,
    /// One permit: at most one profile aggregation in flight
    pub profile_gate: Arc<Semaphore>,
}

impl AppState {
    pub fn new(config: &Config) -> AppResult<Self> {
        let upstreams = Upstreams::from_config(config)?;
        let source: SharedProfileSource = Arc::new(upstreams.clone());
        Ok(Self::with_source(upstreams, source))
    }

    /// State whose aggregator reads from `source` instead of the upstreams
    pub fn with_source(upstreams: Upstreams, source: SharedProfileSource) -> Self {
        Self {
            upstreams,
            aggregator: Aggregator::new(source),
            start_time: Instant::now(),
            profile_gate: Arc::new(Semaphore::new(1)),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

type ApiReply<T> = (StatusCode, Json<Envelope<T>>);

fn status_of(err: &AppError) -> StatusCode {
    StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Map an adapter result onto status + envelope
fn reply<T>(route: &str, result: AppResult<T>) -> ApiReply<T> {
    match result {
        Ok(data) => (StatusCode::OK, Json(Envelope::success(data))),
        Err(e) => {
            warn!(code = e.code_str(), route, "❌ {}", e.message);
            (status_of(&e), Json(Envelope::from_error(&e)))
        }
    }
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Envelope<HealthData>> {
    Json(Envelope::success(HealthData {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        news_configured: state.upstreams.news.is_configured(),
    }))
}

// ============================================
// Upstream adapters
// ============================================

/// GET /api/random-user
pub async fn random_user(State(state): State<Arc<AppState>>) -> ApiReply<Person> {
    reply("random-user", state.upstreams.random_user.fetch_person().await)
}

/// GET /api/country/:name
pub async fn country(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiReply<CountryInfo> {
    reply("country", state.upstreams.countries.fetch_country(&name).await)
}

/// GET /api/exchange-rate/:code
pub async fn exchange_rate(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> ApiReply<ExchangeSnapshot> {
    reply("exchange-rate", state.upstreams.exchange.fetch_rates(&code).await)
}

/// GET /api/news/:country
///
/// Failures still carry `data: []`.
pub async fn news(
    State(state): State<Arc<AppState>>,
    Path(country): Path<String>,
) -> ApiReply<Vec<NewsArticle>> {
    match state.upstreams.news.fetch_headlines(&country).await {
        Ok(articles) => (StatusCode::OK, Json(Envelope::success(articles))),
        Err(e) => {
            warn!(code = e.code_str(), route = "news", "❌ {}", e.message);
            (status_of(&e), Json(Envelope::from_error_with_data(&e, Vec::new())))
        }
    }
}

// ============================================
// Full profile
// ============================================

/// GET /api/profile - run the whole pipeline server-side
pub async fn profile(State(state): State<Arc<AppState>>) -> Response {
    let Ok(_permit) = state.profile_gate.clone().try_acquire_owned() else {
        warn!("⏳ Profile requested while another run is in flight");
        return (
            StatusCode::CONFLICT,
            Json(Envelope::<()>::failure(MSG_IN_PROGRESS)),
        )
            .into_response();
    };

    let start = Instant::now();
    let outcome = state.aggregator.run().await;
    info!(
        done = outcome.is_done(),
        latency_ms = start.elapsed().as_millis() as u64,
        "🧭 Profile aggregation finished"
    );

    Json(outcome).into_response()
}
