//! Request orchestration: cache lookup, refresh and index lookup per request

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::error::AvalancheError;
use crate::forecast::{CacheStore, ForecastEntry, region_key};

/// What a request asks to look up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForecastRequest {
    Region { key: String },
    State { code: String },
}

/// Result of resolving a [`ForecastRequest`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Region(ForecastEntry),
    State(Vec<ForecastEntry>),
}

pub struct ForecastService {
    cache: CacheStore,
}

impl ForecastService {
    #[must_use]
    pub fn new(cache: CacheStore) -> Self {
        Self { cache }
    }

    #[instrument(skip(self))]
    pub async fn resolve_region(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> crate::Result<ForecastEntry> {
        let snapshot = self.cache.get_or_refresh(now).await?;
        let key = region_key(key);
        debug!("Looking up region {}", key);
        snapshot
            .regions
            .get(&key)
            .cloned()
            .ok_or_else(|| AvalancheError::not_found(format!("region {key}")))
    }

    #[instrument(skip(self))]
    pub async fn resolve_state(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> crate::Result<Vec<ForecastEntry>> {
        let snapshot = self.cache.get_or_refresh(now).await?;
        snapshot
            .states
            .get(code)
            .map(<[ForecastEntry]>::to_vec)
            .ok_or_else(|| AvalancheError::not_found(format!("state {code}")))
    }

    pub async fn resolve(
        &self,
        request: &ForecastRequest,
        now: DateTime<Utc>,
    ) -> crate::Result<Resolved> {
        match request {
            ForecastRequest::Region { key } => {
                self.resolve_region(key, now).await.map(Resolved::Region)
            }
            ForecastRequest::State { code } => {
                self.resolve_state(code, now).await.map(Resolved::State)
            }
        }
    }
}
