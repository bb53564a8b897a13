//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to scored items.

use crate::types::ScoredItem;
use anyhow::Result;
use neighborhood::UserContext;

/// Core trait for filtering scored items.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared across threads
/// - Filters take ownership of the Vec<ScoredItem> and return a filtered Vec
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of scored items.
    ///
    /// # Arguments
    /// * `items` - The items to filter (takes ownership)
    /// * `context` - The target user's watched and rated items
    fn apply(&self, items: Vec<ScoredItem>, context: &UserContext) -> Result<Vec<ScoredItem>>;
}
