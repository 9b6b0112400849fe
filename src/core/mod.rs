//! Core Module - Aggregation Logic
//!
//! The adapter boundary trait, the pipeline that drives it, and the
//! display rules applied to its result.

pub mod pipeline;
pub mod render;
pub mod source;

pub use pipeline::{Aggregation, Aggregator, ProfileReport, Stage};
pub use render::{render_page, render_text, Page, Section};
pub use source::{BackendClient, ProfileSource, SharedProfileSource, Upstreams};
