//! State-level danger summary
//!
//! Picks the least dangerous tier present in a state and decides which regions
//! to name and whose travel advice to read out.

use std::collections::HashMap;

use super::{DangerTier, ForecastEntry, NO_RATING};

/// What to say about a state, independent of wording
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryPlan {
    /// Reported tier; `None` when nothing in the state is rated
    pub tier: Option<DangerTier>,
    /// Regions to name, in source order
    pub named_regions: Vec<String>,
    /// Travel advice read out as representative of the tier
    pub sample_advice: Option<String>,
    pub all_no_rating: bool,
}

impl SummaryPlan {
    fn no_rating(sample_advice: Option<String>) -> Self {
        Self {
            tier: None,
            named_regions: Vec::new(),
            sample_advice,
            all_no_rating: true,
        }
    }

    /// Named regions as a spoken list: "A", "A and B", "A, B and C".
    #[must_use]
    pub fn region_list(&self) -> Option<String> {
        match self.named_regions.as_slice() {
            [] => None,
            [only] => Some(only.clone()),
            [init @ .., last] => Some(format!("{} and {}", init.join(", "), last)),
        }
    }
}

/// Summarize all forecasts of one state.
#[must_use]
pub fn summarize(forecasts: &[ForecastEntry]) -> SummaryPlan {
    let mut by_level: HashMap<i32, Vec<&ForecastEntry>> = HashMap::new();
    for forecast in forecasts {
        by_level
            .entry(forecast.danger_level)
            .or_default()
            .push(forecast);
    }

    let unrated = by_level.get(&NO_RATING).map_or(0, Vec::len);
    if unrated == forecasts.len() {
        return SummaryPlan::no_rating(forecasts.first().map(|f| f.travel_advice.clone()));
    }

    for tier in DangerTier::SCAN_ORDER {
        if let Some(members) = by_level.get(&tier.level()) {
            return tier_plan(tier, members);
        }
    }

    let extreme = by_level
        .get(&DangerTier::Extreme.level())
        .map(Vec::as_slice)
        .unwrap_or_default();
    SummaryPlan {
        tier: Some(DangerTier::Extreme),
        named_regions: extreme.iter().map(|f| f.name.clone()).collect(),
        sample_advice: extreme.first().map(|f| f.travel_advice.clone()),
        all_no_rating: false,
    }
}

/// `members` is never empty: groups only exist once an entry lands in them.
fn tier_plan(tier: DangerTier, members: &[&ForecastEntry]) -> SummaryPlan {
    let named_regions = members.iter().map(|f| f.name.clone()).collect();

    // Three or more regions read out the last one's advice.
    let representative = if members.len() >= 3 {
        members.last()
    } else {
        members.first()
    };

    SummaryPlan {
        tier: Some(tier),
        named_regions,
        sample_advice: representative.map(|f| f.travel_advice.clone()),
        all_no_rating: false,
    }
}
