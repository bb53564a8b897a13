//! Scored items flowing through the aggregation and filter stages.

use data_loader::MovieId;
use serde::Serialize;

/// An item with its recommendation score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredItem {
    pub movie_id: MovieId,
    /// Mean of `similarity * rating` over the neighbors that rated the item
    pub score: f64,
    /// How many neighbor ratings went into the mean
    pub neighbor_count: usize,
}

impl ScoredItem {
    pub fn new(movie_id: MovieId, score: f64, neighbor_count: usize) -> Self {
        Self {
            movie_id,
            score,
            neighbor_count,
        }
    }
}

/// Score descending, ties broken by item id ascending
pub fn rank_items(items: &mut [ScoredItem]) {
    items.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.movie_id.cmp(&b.movie_id))
    });
}
