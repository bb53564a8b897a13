//! Similarity Engine - Pearson correlation between target and candidates.
//!
//! Correlation is computed over pairwise-complete observations: only the
//! watched items that BOTH users rated take part, and the means are taken
//! over that shared subset. A pair with fewer than two shared items, or with
//! no variance on one side, has no defined correlation and is dropped.
//!
//! Rows whose shared ratings are identical agree perfectly and score exactly
//! 1.0, including the case where both are constant.

use crate::config::RecommenderConfig;
use crate::matrix::{UserItemMatrix, UserRow};
use crate::selector::Neighborhood;
use data_loader::{MovieId, UserId};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Sums of squares at or below this count as zero variance
const VARIANCE_EPSILON: f64 = 1e-12;

/// A candidate whose similarity cleared the cutoff
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub user_id: UserId,
    /// Pearson correlation with the target, in [-1, 1]
    pub similarity: f64,
    /// Watched items shared with the target
    pub overlap: usize,
}

/// Pearson correlation of two rows restricted to `columns`.
///
/// Returns `None` when the correlation is undefined: fewer than two columns
/// rated by both, or zero variance in either row (unless the shared ratings
/// are identical). Columns are visited in ascending order so the result does
/// not depend on hash iteration order.
pub fn pairwise_pearson(a: &UserRow, b: &UserRow, columns: &BTreeSet<MovieId>) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = columns
        .iter()
        .filter_map(|movie_id| Some((*a.get(movie_id)? as f64, *b.get(movie_id)? as f64)))
        .collect();

    if pairs.len() < 2 {
        return None;
    }
    if pairs.iter().all(|(x, y)| x == y) {
        return Some(1.0);
    }

    let n = pairs.len() as f64;
    let mean_a = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut sab, mut saa, mut sbb) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_a;
        let dy = y - mean_b;
        sab += dx * dy;
        saa += dx * dx;
        sbb += dy * dy;
    }

    if saa <= VARIANCE_EPSILON || sbb <= VARIANCE_EPSILON {
        return None;
    }

    Some((sab / (saa * sbb).sqrt()).clamp(-1.0, 1.0))
}

/// Scores candidates against the target and keeps the similar ones
#[derive(Debug, Clone, Copy)]
pub struct SimilarityEngine {
    /// Minimum similarity, inclusive
    cutoff: f64,
}

impl SimilarityEngine {
    pub fn new(config: &RecommenderConfig) -> Self {
        Self {
            cutoff: config.similarity_cutoff,
        }
    }

    /// Correlate every candidate with the target over the watched items.
    ///
    /// Returns the neighbors with `similarity >= cutoff`, sorted by
    /// similarity descending and then user id ascending. Pairs are
    /// independent, so they are computed in parallel; sorting afterwards makes
    /// the output identical to a sequential run.
    #[instrument(skip_all, fields(user_id = neighborhood.user_id, cutoff = self.cutoff))]
    pub fn similar_neighbors(
        &self,
        matrix: &UserItemMatrix,
        neighborhood: &Neighborhood,
    ) -> Vec<Neighbor> {
        let Some(target_row) = matrix.row(neighborhood.user_id) else {
            return Vec::new();
        };

        let correlations: Vec<(UserId, usize, Option<f64>)> = neighborhood
            .candidates
            .par_iter()
            .filter(|c| c.user_id != neighborhood.user_id)
            .filter_map(|c| {
                let row = matrix.row(c.user_id)?;
                let similarity = pairwise_pearson(target_row, row, &neighborhood.watched_items);
                Some((c.user_id, c.overlap, similarity))
            })
            .collect();

        let undefined = correlations.iter().filter(|(_, _, s)| s.is_none()).count();

        let mut neighbors: Vec<Neighbor> = correlations
            .into_iter()
            .filter_map(|(user_id, overlap, similarity)| {
                similarity.map(|similarity| Neighbor {
                    user_id,
                    similarity,
                    overlap,
                })
            })
            .filter(|n| n.similarity >= self.cutoff)
            .collect();
        rank_neighbors(&mut neighbors);

        debug!(
            "{} candidates: {} undefined correlations dropped, {} at or above {}",
            neighborhood.candidates.len(),
            undefined,
            neighbors.len(),
            self.cutoff
        );
        neighbors
    }
}

/// Similarity descending, ties broken by user id ascending
pub fn rank_neighbors(neighbors: &mut [Neighbor]) {
    neighbors.sort_by(|a, b| {
        b.similarity
            .total_cmp(&a.similarity)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::NeighborCandidate;

    fn row(cells: &[(MovieId, f32)]) -> UserRow {
        cells.iter().copied().collect()
    }

    fn columns(ids: &[MovieId]) -> BTreeSet<MovieId> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_perfect_positive_and_negative() {
        let a = row(&[(1, 1.0), (2, 2.0), (3, 3.0)]);
        let b = row(&[(1, 2.0), (2, 4.0), (3, 6.0)]);
        let c = row(&[(1, 3.0), (2, 2.0), (3, 1.0)]);
        let cols = columns(&[1, 2, 3]);

        assert_eq!(pairwise_pearson(&a, &b, &cols), Some(1.0));
        assert!((pairwise_pearson(&a, &c, &cols).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_known_value() {
        let a = row(&[(1, 1.0), (2, 2.0), (3, 3.0), (4, 4.0)]);
        let b = row(&[(1, 2.0), (2, 1.0), (3, 4.0), (4, 3.0)]);
        // sab = 3, saa = sbb = 5
        let r = pairwise_pearson(&a, &b, &columns(&[1, 2, 3, 4])).unwrap();
        assert!((r - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_pairwise_complete_only() {
        // Item 4 is rated by `a` only and must not shift a's mean
        let a = row(&[(1, 1.0), (2, 2.0), (3, 3.0), (4, 5.0)]);
        let b = row(&[(1, 1.0), (2, 2.0), (3, 3.0)]);
        assert_eq!(pairwise_pearson(&a, &b, &columns(&[1, 2, 3, 4])), Some(1.0));
    }

    #[test]
    fn test_columns_restrict_the_pair() {
        let a = row(&[(1, 1.0), (2, 2.0), (3, 3.0)]);
        let b = row(&[(1, 1.0), (2, 2.0), (3, 3.0)]);
        assert_eq!(pairwise_pearson(&a, &b, &columns(&[1])), None);
    }

    #[test]
    fn test_fewer_than_two_shared_items_is_undefined() {
        let a = row(&[(1, 4.0), (2, 3.0)]);
        let b = row(&[(1, 4.0), (3, 1.0)]);
        assert_eq!(pairwise_pearson(&a, &b, &columns(&[1, 2, 3])), None);
    }

    #[test]
    fn test_zero_variance_is_undefined() {
        let a = row(&[(1, 5.0), (2, 5.0), (3, 5.0)]);
        let b = row(&[(1, 1.0), (2, 3.0), (3, 4.0)]);
        assert_eq!(pairwise_pearson(&a, &b, &columns(&[1, 2, 3])), None);
        assert_eq!(pairwise_pearson(&b, &a, &columns(&[1, 2, 3])), None);

        let c = row(&[(1, 2.0), (2, 2.0), (3, 2.0)]);
        assert_eq!(pairwise_pearson(&a, &c, &columns(&[1, 2, 3])), None);
    }

    #[test]
    fn test_identical_constant_rows_agree() {
        let a = row(&[(1, 5.0), (2, 5.0)]);
        let b = row(&[(1, 5.0), (2, 5.0), (3, 4.0)]);
        assert_eq!(pairwise_pearson(&a, &b, &columns(&[1, 2])), Some(1.0));
    }

    #[test]
    fn test_engine_cutoff_and_order() {
        let mut matrix_rows = vec![(1, row(&[(1, 1.0), (2, 2.0), (3, 3.0)]))];
        matrix_rows.push((2, row(&[(1, 2.0), (2, 4.0), (3, 6.0)]))); // 1.0
        matrix_rows.push((3, row(&[(1, 3.0), (2, 2.0), (3, 1.0)]))); // -1.0
        matrix_rows.push((4, row(&[(1, 1.0), (2, 2.0), (3, 3.0)]))); // 1.0
        matrix_rows.push((5, row(&[(1, 4.0), (2, 4.0), (3, 4.0)]))); // undefined

        let mut index = data_loader::DataIndex::new();
        for (user_id, cells) in &matrix_rows {
            for (&movie_id, &rating) in cells {
                index.insert_rating(data_loader::Rating { user_id: *user_id, movie_id, rating });
            }
        }
        let config = RecommenderConfig::default()
            .with_popularity_threshold(0)
            .with_similarity_cutoff(0.65);
        let matrix = UserItemMatrix::from_index(&index, &config);

        let neighborhood = Neighborhood {
            user_id: 1,
            watched_items: columns(&[1, 2, 3]),
            candidates: (2..=5)
                .map(|user_id| NeighborCandidate { user_id, overlap: 3 })
                .collect(),
        };

        let neighbors = SimilarityEngine::new(&config).similar_neighbors(&matrix, &neighborhood);
        let ids: Vec<UserId> = neighbors.iter().map(|n| n.user_id).collect();
        assert_eq!(ids, vec![2, 4]);
        assert!(neighbors.iter().all(|n| n.similarity >= 0.65));
    }

    #[test]
    fn test_rank_neighbors_tie_break() {
        let mut neighbors = vec![
            Neighbor { user_id: 9, similarity: 0.8, overlap: 3 },
            Neighbor { user_id: 4, similarity: 0.9, overlap: 3 },
            Neighbor { user_id: 2, similarity: 0.8, overlap: 3 },
        ];
        rank_neighbors(&mut neighbors);
        let ids: Vec<UserId> = neighbors.iter().map(|n| n.user_id).collect();
        assert_eq!(ids, vec![4, 2, 9]);
    }
}
