//! What the pipeline knows about the target user once neighbors are chosen.

use crate::selector::Neighborhood;
use data_loader::{DataIndex, MovieId, UserId};
use std::collections::{BTreeSet, HashSet};

/// Target-side context handed to the post-aggregation filters
#[derive(Debug, Clone, Default)]
pub struct UserContext {
    pub user_id: UserId,
    /// Kept items the user rated (the columns similarity was computed on)
    pub watched_items: BTreeSet<MovieId>,
    /// Every item the user rated in the full table, popular or not
    pub rated_items: HashSet<MovieId>,
}

impl UserContext {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            ..Default::default()
        }
    }

    /// True if the user has rated this item anywhere
    pub fn has_seen(&self, movie_id: MovieId) -> bool {
        self.watched_items.contains(&movie_id) || self.rated_items.contains(&movie_id)
    }
}

/// Build a UserContext from the ratings table and the selected neighborhood
pub fn build_user_context(data_index: &DataIndex, neighborhood: &Neighborhood) -> UserContext {
    UserContext {
        user_id: neighborhood.user_id,
        watched_items: neighborhood.watched_items.clone(),
        rated_items: data_index
            .get_user_ratings(neighborhood.user_id)
            .iter()
            .map(|r| r.movie_id)
            .collect(),
    }
}
