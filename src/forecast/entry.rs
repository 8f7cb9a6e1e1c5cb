use serde::{Deserialize, Serialize};

/// Danger level the upstream uses for regions without a rating
pub const NO_RATING: i32 = -1;

/// One region's forecast as published by avalanche.org
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Region display name, e.g. "Mount Shasta"
    pub name: String,
    /// Issuing avalanche center
    pub center: String,
    /// Forecast page for the region
    pub link: String,
    /// Two-letter state code
    pub state: String,
    pub travel_advice: String,
    /// Danger rating as text, e.g. "moderate"
    pub danger: String,
    /// `-1` for no rating, otherwise 1 (low) through 5 (extreme)
    pub danger_level: i32,
}

impl ForecastEntry {
    /// Key used to look the region up, matching the voice platform slot ids
    #[must_use]
    pub fn region_key(&self) -> String {
        region_key(&self.name)
    }

    #[must_use]
    pub fn is_rated(&self) -> bool {
        self.danger_level != NO_RATING
    }
}

/// Strip every Unicode whitespace character from a region name.
#[must_use]
pub fn region_key(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Rated danger tiers, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DangerTier {
    Low = 1,
    Moderate = 2,
    Considerable = 3,
    High = 4,
    Extreme = 5,
}

impl DangerTier {
    /// Tiers scanned when looking for the safest region in a state
    pub const SCAN_ORDER: [DangerTier; 4] = [
        DangerTier::Low,
        DangerTier::Moderate,
        DangerTier::Considerable,
        DangerTier::High,
    ];

    #[must_use]
    pub fn from_level(level: i32) -> Option<Self> {
        match level {
            1 => Some(Self::Low),
            2 => Some(Self::Moderate),
            3 => Some(Self::Considerable),
            4 => Some(Self::High),
            5 => Some(Self::Extreme),
            _ => None,
        }
    }

    #[must_use]
    pub fn level(self) -> i32 {
        self as i32
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::Considerable => "considerable",
            Self::High => "high",
            Self::Extreme => "extreme",
        }
    }
}
