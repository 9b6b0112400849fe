//! API Route Configuration

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{self, AppState};
use super::middleware::logging_middleware;

/// Create the API router with all routes and middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Upstream adapters
        .route("/random-user", get(handlers::random_user))
        .route("/country/:name", get(handlers::country))
        .route("/exchange-rate/:code", get(handlers::exchange_rate))
        .route("/news/:country", get(handlers::news))
        // Whole pipeline
        .route("/profile", get(handlers::profile));

    Router::new()
        .nest("/api", api)
        .route("/health", get(handlers::health_check))
        .with_state(state)
        // Middleware (order matters - bottom runs first)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
}
