//! Score Aggregator - turns similar neighbors into item scores.
//!
//! ## Algorithm
//! 1. For every neighbor, fetch ALL of its ratings from the full table (not
//!    only the watched items, and not only popular items)
//! 2. Weight each rating by the neighbor's similarity
//! 3. Group by item and take the mean weighted rating
//!
//! Thresholding and removal of already-seen items happen afterwards in the
//! [`FilterPipeline`](crate::FilterPipeline).

use crate::types::ScoredItem;
use data_loader::{DataIndex, MovieId, UserId};
use neighborhood::Neighbor;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Aggregates weighted neighbor ratings per item
#[derive(Debug, Clone)]
pub struct ScoreAggregator {
    /// Shared reference to the full ratings table
    data_index: Arc<DataIndex>,
}

impl ScoreAggregator {
    pub fn new(data_index: Arc<DataIndex>) -> Self {
        Self { data_index }
    }

    /// Mean `similarity * rating` per item, in item id order.
    ///
    /// Rows belonging to the target `user_id` are skipped even if the target
    /// shows up in `neighbors`. Every rating record counts, so a neighbor that rated
    /// an item twice contributes twice.
    #[instrument(skip(self, neighbors), fields(neighbor_count = neighbors.len()))]
    pub fn aggregate(&self, user_id: UserId, neighbors: &[Neighbor]) -> Vec<ScoredItem> {
        // Sequential in neighbor order so the sums are reproducible
        let mut sums: BTreeMap<MovieId, (f64, usize)> = BTreeMap::new();
        for neighbor in neighbors.iter().filter(|n| n.user_id != user_id) {
            for rating in self.data_index.get_user_ratings(neighbor.user_id) {
                let entry = sums.entry(rating.movie_id).or_insert((0.0, 0));
                entry.0 += neighbor.similarity * rating.rating as f64;
                entry.1 += 1;
            }
        }

        let items: Vec<ScoredItem> = sums
            .into_iter()
            .map(|(movie_id, (sum, count))| ScoredItem::new(movie_id, sum / count as f64, count))
            .collect();

        debug!("Aggregated scores for {} items", items.len());
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::Rating;

    fn create_test_index() -> Arc<DataIndex> {
        let mut index = DataIndex::new();
        for (user_id, movie_id, rating) in [
            (1, 1, 5.0),
            (2, 1, 4.0),
            (2, 2, 4.0),
            (3, 2, 2.0),
            (3, 3, 5.0),
        ] {
            index.insert_rating(Rating { user_id, movie_id, rating });
        }
        Arc::new(index)
    }

    fn neighbor(user_id: UserId, similarity: f64) -> Neighbor {
        Neighbor {
            user_id,
            similarity,
            overlap: 1,
        }
    }

    #[test]
    fn test_weighted_mean_per_item() {
        let aggregator = ScoreAggregator::new(create_test_index());
        let items = aggregator.aggregate(1, &[neighbor(2, 0.5), neighbor(3, 1.0)]);

        let by_id: BTreeMap<MovieId, ScoredItem> =
            items.into_iter().map(|i| (i.movie_id, i)).collect();
        // Movie 1: only user 2 -> 0.5 * 4.0
        assert!((by_id[&1].score - 2.0).abs() < 1e-12);
        // Movie 2: (0.5 * 4.0 + 1.0 * 2.0) / 2
        assert!((by_id[&2].score - 2.0).abs() < 1e-12);
        assert_eq!(by_id[&2].neighbor_count, 2);
        // Movie 3: 1.0 * 5.0
        assert!((by_id[&3].score - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_target_rows_are_excluded() {
        let aggregator = ScoreAggregator::new(create_test_index());
        let items = aggregator.aggregate(1, &[neighbor(1, 1.0)]);
        assert!(items.is_empty());
    }

    #[test]
    fn test_no_neighbors() {
        let aggregator = ScoreAggregator::new(create_test_index());
        assert!(aggregator.aggregate(1, &[]).is_empty());
    }
}
