//! Filter to remove items the user has already rated.
//!
//! Applied as the last step regardless of what earlier stages did, so a
//! rated item can never be recommended back.

use crate::traits::Filter;
use crate::types::ScoredItem;
use anyhow::Result;
use neighborhood::UserContext;

/// Removes items that are in the user's watched items or that the user
/// rated anywhere in the ratings table.
pub struct AlreadyWatchedFilter;

impl Filter for AlreadyWatchedFilter {
    fn name(&self) -> &str {
        "AlreadyWatchedFilter"
    }

    fn apply(&self, items: Vec<ScoredItem>, context: &UserContext) -> Result<Vec<ScoredItem>> {
        let filtered: Vec<ScoredItem> = items
            .into_iter()
            .filter(|item| !context.has_seen(item.movie_id))
            .collect();
        Ok(filtered)
    }
}
