use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{ForecastEntry, region_key};

/// Forecasts keyed by whitespace-free region name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionIndex {
    regions: HashMap<String, ForecastEntry>,
}

impl RegionIndex {
    /// Look up a region by its normalized key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ForecastEntry> {
        self.regions.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Forecasts grouped by state code; groups keep source order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateIndex {
    states: HashMap<String, Vec<ForecastEntry>>,
    /// State codes in first-seen order
    order: Vec<String>,
}

impl StateIndex {
    #[must_use]
    pub fn get(&self, state: &str) -> Option<&[ForecastEntry]> {
        self.states.get(state).map(Vec::as_slice)
    }

    /// State codes in the order they first appeared in the feed
    #[must_use]
    pub fn states(&self) -> &[String] {
        &self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Build both lookup indexes from the flat forecast list.
///
/// A later entry whose name normalizes to an already-seen key replaces the
/// earlier one in the region index. State grouping is case-preserving.
#[must_use]
pub fn index(entries: &[ForecastEntry]) -> (RegionIndex, StateIndex) {
    let mut regions = RegionIndex::default();
    let mut states = StateIndex::default();

    for entry in entries {
        regions.regions.insert(region_key(&entry.name), entry.clone());

        match states.states.get_mut(&entry.state) {
            Some(group) => group.push(entry.clone()),
            None => {
                states.order.push(entry.state.clone());
                states
                    .states
                    .insert(entry.state.clone(), vec![entry.clone()]);
            }
        }
    }

    (regions, states)
}
