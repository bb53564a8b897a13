//! End-to-end tests of the recommender on a hand-built ratings table.

use data_loader::{DataIndex, MovieId, Rating, UserId};
use recommender::{RecommendError, RecommendationOutcome, RecommenderConfig, Recommender};
use std::sync::Arc;

/// Target pattern over items 1..=25: ratings cycle through 1.0 ..= 5.0
fn pattern(movie_id: MovieId) -> f32 {
    (movie_id % 5 + 1) as f32
}

fn rate(index: &mut DataIndex, user_id: UserId, movie_id: MovieId, rating: f32) {
    index.insert_rating(Rating { user_id, movie_id, rating });
}

fn create_test_index() -> Arc<DataIndex> {
    let mut index = DataIndex::new();

    for movie_id in 1..=25 {
        // User 1: the target
        rate(&mut index, 1, movie_id, pattern(movie_id));
        // User 2: same taste as the target
        rate(&mut index, 2, movie_id, pattern(movie_id));
        // User 4: opposite taste
        rate(&mut index, 4, movie_id, 6.0 - pattern(movie_id));
        // User 5: rates everything 3.0, so correlation is undefined
        rate(&mut index, 5, movie_id, 3.0);
        // User 6: same taste again
        rate(&mut index, 6, movie_id, pattern(movie_id));
    }
    // User 3: same taste but only 20 shared items (not more than 20)
    for movie_id in 1..=20 {
        rate(&mut index, 3, movie_id, pattern(movie_id));
    }

    // Items outside the target's history; none of them is popular
    rate(&mut index, 2, 100, 5.0);
    rate(&mut index, 2, 101, 2.0);
    rate(&mut index, 6, 100, 4.0);
    rate(&mut index, 3, 102, 5.0);
    rate(&mut index, 4, 103, 5.0);
    rate(&mut index, 5, 104, 5.0);

    // User 7 only rated an unpopular item
    rate(&mut index, 7, 200, 4.0);

    Arc::new(index)
}

fn config() -> RecommenderConfig {
    RecommenderConfig::default().with_popularity_threshold(2)
}

#[test]
fn test_recommends_from_similar_neighbors_only() {
    let recommender = Recommender::new(create_test_index(), config()).unwrap();
    let report = recommender.recommend(1).unwrap();

    assert_eq!(report.watched_items, 25);
    // Users 2, 4, 5 and 6 share 25 items; user 3 shares only 20
    assert_eq!(report.candidate_neighbors, 4);

    let neighbor_ids: Vec<UserId> = report.neighbors.iter().map(|n| n.user_id).collect();
    assert_eq!(neighbor_ids, vec![2, 6]);
    assert!(report.neighbors.iter().all(|n| n.overlap > 20));

    // Item 100 is scored from the full table even though it is not popular:
    // (1.0 * 5.0 + 1.0 * 4.0) / 2
    assert_eq!(report.recommendations.len(), 1);
    assert_eq!(report.recommendations[0].movie_id, 100);
    assert!((report.recommendations[0].score - 4.5).abs() < 1e-9);
    assert_eq!(report.recommendations[0].neighbor_count, 2);
    assert_eq!(report.outcome, RecommendationOutcome::Recommended);
}

#[test]
fn test_watched_items_are_excluded() {
    let recommender = Recommender::new(create_test_index(), config()).unwrap();
    let report = recommender.recommend(1).unwrap();

    for item in &report.recommendations {
        assert!(recommender.matrix().rating(1, item.movie_id).is_none());
    }
}

#[test]
fn test_no_overlapping_neighbors() {
    let recommender = Recommender::new(create_test_index(), config().with_min_overlap(30)).unwrap();
    let report = recommender.recommend(1).unwrap();

    assert!(report.is_empty());
    assert_eq!(report.candidate_neighbors, 0);
    assert_eq!(report.outcome, RecommendationOutcome::NoOverlappingNeighbors);
}

#[test]
fn test_no_similar_neighbors() {
    let recommender = Recommender::new(create_test_index(), config()).unwrap();
    // User 5 has constant ratings: every correlation is undefined
    let report = recommender.recommend(5).unwrap();

    assert!(report.candidate_neighbors > 0);
    assert!(report.neighbors.is_empty());
    assert_eq!(report.outcome, RecommendationOutcome::NoSimilarNeighbors);
}

#[test]
fn test_negative_cutoff_admits_opposite_taste() {
    let recommender =
        Recommender::new(create_test_index(), config().with_similarity_cutoff(-1.0)).unwrap();
    let report = recommender.recommend(1).unwrap();

    let neighbor_ids: Vec<UserId> = report.neighbors.iter().map(|n| n.user_id).collect();
    assert_eq!(neighbor_ids, vec![2, 6, 4]);
    assert!((report.neighbors[2].similarity + 1.0).abs() < 1e-9);
}

#[test]
fn test_fatal_errors() {
    let recommender = Recommender::new(create_test_index(), config()).unwrap();

    assert_eq!(
        recommender.recommend(999).unwrap_err(),
        RecommendError::UserNotFound(999)
    );
    assert_eq!(
        recommender.recommend(7).unwrap_err(),
        RecommendError::NoRatingsForUser(7)
    );
}

#[test]
fn test_nothing_popular_enough() {
    let recommender =
        Recommender::new(create_test_index(), RecommenderConfig::default()).unwrap();

    assert!(recommender.matrix().is_empty());
    assert_eq!(
        recommender.recommend(1).unwrap_err(),
        RecommendError::NoRatingsForUser(1)
    );
}

#[test]
fn test_runs_are_identical() {
    let index = create_test_index();
    let first = Recommender::new(index.clone(), config()).unwrap().recommend(1).unwrap();
    let second = Recommender::new(index, config()).unwrap().recommend(1).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_report_serializes() {
    let recommender = Recommender::new(create_test_index(), config()).unwrap();
    let report = recommender.recommend(1).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["outcome"], "Recommended");
    assert_eq!(json["recommendations"][0]["movie_id"], 100);
}
