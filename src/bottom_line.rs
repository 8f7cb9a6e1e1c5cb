//! Per-region "bottom line" summaries published on forecast pages.
//!
//! Extraction from the forecast page lives outside this crate; it plugs in
//! through [`BottomLineSource`].

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::AvalancheError;

/// States whose forecast pages carry a bottom line we can read out
pub const BOTTOM_LINE_STATES: [&str; 1] = ["WA"];

/// Bottom line text and the day it was issued
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BottomLine {
    pub text: String,
    pub issued: NaiveDate,
}

#[async_trait]
pub trait BottomLineSource: Send + Sync {
    /// Read the bottom line from a region's forecast page.
    ///
    /// Fails with [`AvalancheError::Parse`] when the page has no usable block.
    async fn bottom_line(&self, link: &str) -> Result<BottomLine, AvalancheError>;
}

#[must_use]
pub fn supports_state(state: &str) -> bool {
    BOTTOM_LINE_STATES.contains(&state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_washington_supported() {
        assert!(supports_state("WA"));
        assert!(!supports_state("CA"));
        assert!(!supports_state("wa"));
    }
}
