//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern.

use crate::filters::{AlreadyWatchedFilter, MinimumScoreFilter};
use crate::traits::Filter;
use crate::types::{rank_items, ScoredItem};
use anyhow::Result;
use neighborhood::{RecommenderConfig, UserContext};

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(MinimumScoreFilter::new(3.5))
///     .add_filter(AlreadyWatchedFilter);
///
/// let recommendations = pipeline.apply(items, &context)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The final stage of the recommender: score threshold, then removal
    /// of everything the user has already rated.
    pub fn recommendation_stage(config: &RecommenderConfig) -> Self {
        Self::new()
            .add_filter(MinimumScoreFilter::new(config.score_threshold))
            .add_filter(AlreadyWatchedFilter)
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Names of the filters, in application order
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Apply all filters in sequence, then rank what is left.
    ///
    /// ## Algorithm
    /// 1. Start with the input items
    /// 2. For each filter in order, apply it and log the counts
    /// 3. Sort by score descending, item id ascending
    pub fn apply(&self, items: Vec<ScoredItem>, context: &UserContext) -> Result<Vec<ScoredItem>> {
        let mut current = items;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, context)?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        rank_items(&mut current);
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
