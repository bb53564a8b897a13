//! Tunable thresholds for every stage of the pipeline.
//!
//! The defaults reproduce the values the recommender was first tuned with on
//! MovieLens 20M. They are empirical, so every one of them can be overridden.

use crate::error::{RecommendError, Result};
use serde::{Deserialize, Serialize};

/// Thresholds passed explicitly into each pipeline component.
///
/// Rust concept: `#[serde(default)]` fills missing fields from `Default`, so
/// a JSON file only has to name the values it changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Keep an item as a matrix column only if it has more ratings than this
    pub popularity_threshold: u32,

    /// A neighbor must share more than this many watched items with the target
    pub min_overlap: usize,

    /// Minimum Pearson correlation for a neighbor to contribute (inclusive)
    pub similarity_cutoff: f64,

    /// Items are presented only if their score is above this (exclusive)
    pub score_threshold: f64,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            popularity_threshold: 1000,
            min_overlap: 20,
            similarity_cutoff: 0.65,
            score_threshold: 3.5,
        }
    }
}

impl RecommenderConfig {
    pub fn with_popularity_threshold(mut self, threshold: u32) -> Self {
        self.popularity_threshold = threshold;
        self
    }

    pub fn with_min_overlap(mut self, min_overlap: usize) -> Self {
        self.min_overlap = min_overlap;
        self
    }

    pub fn with_similarity_cutoff(mut self, cutoff: f64) -> Self {
        self.similarity_cutoff = cutoff;
        self
    }

    pub fn with_score_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = threshold;
        self
    }

    /// Reject values no correlation or score could ever be compared against
    pub fn validate(&self) -> Result<()> {
        if !self.similarity_cutoff.is_finite() || !(-1.0..=1.0).contains(&self.similarity_cutoff) {
            return Err(RecommendError::InvalidConfig(format!(
                "similarity_cutoff must be within [-1, 1], got {}",
                self.similarity_cutoff
            )));
        }
        if !self.score_threshold.is_finite() {
            return Err(RecommendError::InvalidConfig(format!(
                "score_threshold must be finite, got {}",
                self.score_threshold
            )));
        }
        Ok(())
    }
}
