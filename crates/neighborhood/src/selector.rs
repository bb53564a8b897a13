//! Neighbor Selector
//!
//! Finds the users that rated enough of the same items as the target.
//!
//! ## Algorithm
//! 1. Watched items = the non-missing cells of the target's row
//! 2. For every other row, count the non-missing cells among watched items
//! 3. Keep the users whose count is strictly above `min_overlap`

use crate::config::RecommenderConfig;
use crate::error::{RecommendError, Result};
use crate::matrix::UserItemMatrix;
use data_loader::{MovieId, UserId};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// A user who passed the overlap threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NeighborCandidate {
    pub user_id: UserId,
    /// Number of watched items this user also rated
    pub overlap: usize,
}

/// Output of the selector: the target's watched items and its candidates
#[derive(Debug, Clone, PartialEq)]
pub struct Neighborhood {
    pub user_id: UserId,
    pub watched_items: BTreeSet<MovieId>,
    /// Sorted by user id ascending, never contains the target
    pub candidates: Vec<NeighborCandidate>,
}

impl Neighborhood {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Overlap count of a candidate, `None` if it is not a candidate
    #[cfg(test)]
    pub(crate) fn overlap_of(&self, user_id: UserId) -> Option<usize> {
        self.candidates
            .binary_search_by_key(&user_id, |c| c.user_id)
            .ok()
            .map(|i| self.candidates[i].overlap)
    }
}

/// Selects neighbor candidates by rating overlap
#[derive(Debug, Clone, Copy)]
pub struct NeighborSelector {
    /// Overlap must be strictly greater than this
    min_overlap: usize,
}

impl NeighborSelector {
    pub fn new(config: &RecommenderConfig) -> Self {
        Self {
            min_overlap: config.min_overlap,
        }
    }

    /// Determine the watched items and the neighbor candidates of a user.
    ///
    /// # Errors
    /// * `UserNotFound` - the user has no row in the matrix
    /// * `NoRatingsForUser` - the user's row is empty
    #[instrument(skip(self, matrix), fields(min_overlap = self.min_overlap))]
    pub fn select(&self, matrix: &UserItemMatrix, user_id: UserId) -> Result<Neighborhood> {
        let target_row = matrix
            .row(user_id)
            .ok_or(RecommendError::UserNotFound(user_id))?;

        let watched_items: BTreeSet<MovieId> = target_row.keys().copied().collect();
        if watched_items.is_empty() {
            return Err(RecommendError::NoRatingsForUser(user_id));
        }

        let mut candidates: Vec<NeighborCandidate> = matrix
            .rows()
            .par_iter()
            .filter(|&(&other_id, _)| other_id != user_id)
            .filter_map(|(&other_id, row)| {
                let overlap = watched_items
                    .iter()
                    .filter(|&&movie_id| row.contains_key(&movie_id))
                    .count();
                (overlap > self.min_overlap).then_some(NeighborCandidate {
                    user_id: other_id,
                    overlap,
                })
            })
            .collect();
        candidates.sort_unstable_by_key(|c| c.user_id);

        debug!(
            "User {} watched {} kept items, {} candidates share more than {}",
            user_id,
            watched_items.len(),
            candidates.len(),
            self.min_overlap
        );

        Ok(Neighborhood {
            user_id,
            watched_items,
            candidates,
        })
    }
}
