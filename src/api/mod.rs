//! Country Pulse HTTP API
//! JSON routes wrapping the four upstream adapters and the full pipeline

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod types;

pub use handlers::AppState;
pub use routes::create_router;
pub use types::*;
