//! Forecast module
//!
//! Fetching the avalanche.org feed, indexing it by region and state, caching
//! the indexed snapshot and summarizing danger levels per state.

pub mod cache;
pub mod entry;
pub mod fetcher;
pub mod index;
pub mod summary;

pub use cache::{CacheSnapshot, CacheStore, DEFAULT_TTL_HOURS, SNAPSHOT_KEY};
pub use entry::{DangerTier, ForecastEntry, NO_RATING, region_key};
pub use fetcher::{AvalancheOrgClient, ForecastSource, build_http_client};
pub use index::{RegionIndex, StateIndex, index};
pub use summary::{SummaryPlan, summarize};
