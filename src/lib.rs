//! Avalanche Forecast - voice skill backend for US avalanche danger
//!
//! This library fetches the avalanche.org forecast feed, caches an indexed
//! snapshot of it, and answers region and state questions with spoken text.

pub mod api;
pub mod bottom_line;
pub mod cache;
pub mod config;
pub mod error;
pub mod forecast;
pub mod service;
pub mod skill;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use bottom_line::{BottomLine, BottomLineSource};
pub use cache::{FjallStore, KeyValueStore, MemoryStore};
pub use config::AvalancheConfig;
pub use error::{AvalancheError, FetchError, StoreError};
pub use forecast::{
    AvalancheOrgClient, CacheSnapshot, CacheStore, DangerTier, ForecastEntry, ForecastSource,
    SummaryPlan, summarize,
};
pub use service::{ForecastRequest, ForecastService, Resolved};
pub use skill::{Intent, RequestContext, SkillHandler, SkillResponse};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AvalancheError>;
