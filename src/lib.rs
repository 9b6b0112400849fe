//! Country Pulse Library
//!
//! Aggregates four third-party APIs into one profile:
//! - a random person (randomuser.me)
//! - metadata for that person's country (restcountries.com)
//! - USD / KZT exchange rates for the country's currency (exchangerate-api.com)
//! - English headlines mentioning the country (newsapi.org)
//!
//! Each upstream is wrapped by an adapter that normalizes its response and
//! reports failures through a uniform envelope. The aggregation pipeline
//! chains them with hard/soft failure semantics.

pub mod api;
pub mod core;
pub mod models;
pub mod providers;
pub mod utils;

pub use crate::api::{create_router, AppState, Envelope};
pub use crate::core::{
    render_page, render_text, Aggregation, Aggregator, BackendClient, Page, ProfileReport,
    ProfileSource, Stage, Upstreams,
};
pub use crate::models::{
    AppError, AppResult, Config, CountryInfo, ErrorCode, ExchangeSnapshot, NewsArticle, Person,
    Rate, UpstreamUrls,
};
