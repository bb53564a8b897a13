//! Matrix Builder - the user x item rating matrix.
//!
//! Rows are users, columns are the items that passed the popularity
//! threshold, cells are ratings. The matrix is stored sparsely: a missing
//! cell means "not rated", which is different from a rating of zero, and
//! memory grows with the number of kept ratings rather than users x items.
//!
//! Every user in the ratings table gets a row, even when none of their
//! ratings are on a kept item. Such a row is simply empty, which lets the
//! selector tell an unknown user apart from one with nothing left to compare.

use crate::config::RecommenderConfig;
use data_loader::{DataIndex, MovieId, Rating, UserId};
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, instrument};

/// One matrix row: the ratings a user gave to kept items
pub type UserRow = HashMap<MovieId, f32>;

/// Sparse user-item rating matrix, immutable once built
#[derive(Debug, Clone, Default)]
pub struct UserItemMatrix {
    rows: HashMap<UserId, UserRow>,
    items: BTreeSet<MovieId>,
}

impl UserItemMatrix {
    /// Build the matrix from the ratings table and per-item rating counts.
    ///
    /// Items with `count > popularity_threshold` become columns. When a user
    /// rated the same item more than once the cell holds the mean.
    #[instrument(skip_all, fields(threshold = config.popularity_threshold))]
    pub fn build(
        index: &DataIndex,
        popularity: &HashMap<MovieId, u32>,
        config: &RecommenderConfig,
    ) -> Self {
        let items: BTreeSet<MovieId> = popularity
            .iter()
            .filter(|&(_, &count)| count > config.popularity_threshold)
            .map(|(&movie_id, _)| movie_id)
            .collect();

        let rows: HashMap<UserId, UserRow> = index
            .ratings_by_user()
            .par_iter()
            .map(|(&user_id, ratings)| (user_id, build_row(ratings, &items)))
            .collect();

        debug!(
            "Built matrix: {} users x {} kept items ({} cells)",
            rows.len(),
            items.len(),
            rows.values().map(|r| r.len()).sum::<usize>()
        );

        Self { rows, items }
    }

    /// Build using the popularity counts of the index itself
    pub fn from_index(index: &DataIndex, config: &RecommenderConfig) -> Self {
        Self::build(index, &index.item_popularity(), config)
    }

    /// The row of a user, `None` if the user is not in the matrix
    pub fn row(&self, user_id: UserId) -> Option<&UserRow> {
        self.rows.get(&user_id)
    }

    /// A single cell; `None` means "not rated"
    pub fn rating(&self, user_id: UserId, movie_id: MovieId) -> Option<f32> {
        self.rows.get(&user_id)?.get(&movie_id).copied()
    }

    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.rows.contains_key(&user_id)
    }

    /// All rows, in no particular order
    pub fn rows(&self) -> &HashMap<UserId, UserRow> {
        &self.rows
    }

    /// Row ids, ascending
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.rows.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Kept item columns, ascending
    pub fn items(&self) -> &BTreeSet<MovieId> {
        &self.items
    }

    pub fn user_count(&self) -> usize {
        self.rows.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// True when no item passed the popularity threshold
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Average each kept item's ratings into one cell
fn build_row(ratings: &[Rating], items: &BTreeSet<MovieId>) -> UserRow {
    let mut sums: HashMap<MovieId, (f32, u32)> = HashMap::new();
    for rating in ratings.iter().filter(|r| items.contains(&r.movie_id)) {
        let entry = sums.entry(rating.movie_id).or_insert((0.0, 0));
        entry.0 += rating.rating;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(movie_id, (sum, count))| (movie_id, sum / count as f32))
        .collect()
}
