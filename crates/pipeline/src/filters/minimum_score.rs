//! Filter that keeps only items scoring above the presentation threshold.

use crate::traits::Filter;
use crate::types::ScoredItem;
use anyhow::Result;
use neighborhood::UserContext;

/// Keeps items with `score > threshold` (strictly greater).
pub struct MinimumScoreFilter {
    threshold: f64,
}

impl MinimumScoreFilter {
    /// Create a new MinimumScoreFilter.
    ///
    /// # Arguments
    /// * `threshold` - Items must score above this (typically 3.5)
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Filter for MinimumScoreFilter {
    fn name(&self) -> &str {
        "MinimumScoreFilter"
    }

    fn apply(&self, items: Vec<ScoredItem>, _context: &UserContext) -> Result<Vec<ScoredItem>> {
        let filtered: Vec<ScoredItem> = items
            .into_iter()
            .filter(|item| item.score > self.threshold)
            .collect();
        Ok(filtered)
    }
}
