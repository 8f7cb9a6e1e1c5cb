use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::{ForecastSource, RegionIndex, StateIndex, index};
use crate::cache::KeyValueStore;
use crate::error::{AvalancheError, FetchError, StoreError};

/// Store key holding the serialized snapshot
pub const SNAPSHOT_KEY: &str = "forecast_snapshot";

/// Default freshness window for a snapshot
pub const DEFAULT_TTL_HOURS: i64 = 10;

/// One fetched-and-indexed view of all forecasts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    pub regions: RegionIndex,
    pub states: StateIndex,
    pub fetched_at: DateTime<Utc>,
}

impl CacheSnapshot {
    /// Whether `now` lies within `ttl` of the fetch time, in either direction.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        let age = now.signed_duration_since(self.fetched_at);
        age < ttl && age > -ttl
    }
}

/// Snapshot cache layered over a persistent store
pub struct CacheStore {
    source: Arc<dyn ForecastSource>,
    store: Arc<dyn KeyValueStore>,
    ttl: TimeDelta,
}

impl CacheStore {
    #[must_use]
    pub fn new(source: Arc<dyn ForecastSource>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            source,
            store,
            ttl: TimeDelta::hours(DEFAULT_TTL_HOURS),
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: TimeDelta) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Read the persisted snapshot, if one was ever written.
    pub async fn snapshot(&self) -> Result<Option<CacheSnapshot>, StoreError> {
        let Some(bytes) = self.store.get(SNAPSHOT_KEY).await? else {
            debug!("No snapshot stored yet");
            return Ok(None);
        };
        let snapshot =
            postcard::from_bytes(&bytes).map_err(|e| StoreError::Codec(e.to_string()))?;
        Ok(Some(snapshot))
    }

    #[must_use]
    pub fn is_fresh(&self, snapshot: &CacheSnapshot, now: DateTime<Utc>) -> bool {
        snapshot.is_fresh(now, self.ttl)
    }

    /// Fetch, index and persist a new snapshot stamped with `now`.
    ///
    /// Nothing is written when the fetch fails.
    #[instrument(name = "refresh_snapshot", skip(self))]
    pub async fn refresh(&self, now: DateTime<Utc>) -> crate::Result<CacheSnapshot> {
        let snapshot = self.fetch_snapshot(now).await?;
        self.persist(&snapshot).await?;
        Ok(snapshot)
    }

    /// Return the stored snapshot while fresh, otherwise refresh it.
    ///
    /// When the fetch fails, a stale snapshot is still served; only a missing
    /// snapshot turns the failure into [`AvalancheError::Upstream`]. A fetched
    /// snapshot that cannot be written is served anyway.
    #[instrument(name = "get_or_refresh_snapshot", skip(self))]
    pub async fn get_or_refresh(&self, now: DateTime<Utc>) -> crate::Result<CacheSnapshot> {
        let existing = match self.snapshot().await {
            Ok(existing) => existing,
            Err(StoreError::Codec(e)) => {
                warn!("Discarding undecodable snapshot: {}", e);
                None
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(snapshot) = &existing {
            if self.is_fresh(snapshot, now) {
                debug!("Snapshot from {} still fresh", snapshot.fetched_at);
                return Ok(snapshot.clone());
            }
            debug!("Snapshot from {} expired", snapshot.fetched_at);
        }

        let snapshot = match self.fetch_snapshot(now).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                return match existing {
                    Some(stale) => {
                        warn!(
                            "Refresh failed ({}), serving snapshot from {}",
                            err, stale.fetched_at
                        );
                        Ok(stale)
                    }
                    None => Err(AvalancheError::Upstream(err)),
                };
            }
        };

        if let Err(e) = self.persist(&snapshot).await {
            warn!("Serving unsaved snapshot from {}: {}", snapshot.fetched_at, e);
        }
        Ok(snapshot)
    }

    async fn fetch_snapshot(&self, now: DateTime<Utc>) -> Result<CacheSnapshot, FetchError> {
        let entries = self.source.fetch().await?;
        let (regions, states) = index(&entries);
        Ok(CacheSnapshot {
            regions,
            states,
            fetched_at: now,
        })
    }

    async fn persist(&self, snapshot: &CacheSnapshot) -> Result<(), StoreError> {
        let bytes = postcard::to_stdvec(snapshot).map_err(|e| StoreError::Codec(e.to_string()))?;
        self.store.put(SNAPSHOT_KEY, bytes).await?;

        info!(
            "Stored snapshot with {} regions in {} states",
            snapshot.regions.len(),
            snapshot.states.len()
        );
        Ok(())
    }
}
