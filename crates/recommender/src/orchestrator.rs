//! # Recommendation Orchestrator
//!
//! This module runs the whole user-based pipeline for one target user:
//! 1. Select neighbor candidates by rating overlap
//! 2. Correlate them with the target and keep the similar ones
//! 3. Aggregate the neighbors' weighted ratings per item
//! 4. Apply the score threshold and drop already-rated items
//!
//! The rating matrix is built once in [`Recommender::new`] and shared
//! read-only by every call, so a `Recommender` can be cloned cheaply and used
//! from several threads.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::info;

use data_loader::{DataIndex, UserId};
use neighborhood::{
    build_user_context, Neighbor, NeighborSelector, RecommendError, RecommenderConfig, Result,
    SimilarityEngine, UserItemMatrix,
};
use pipeline::{FilterPipeline, ScoreAggregator, ScoredItem};

/// Why a report has (or lacks) recommendations.
///
/// An empty list is a valid result; this tells the caller which stage ran dry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecommendationOutcome {
    /// At least one item made it through
    Recommended,
    /// No user shared more than `min_overlap` watched items
    NoOverlappingNeighbors,
    /// Candidates existed but none reached the similarity cutoff
    NoSimilarNeighbors,
    /// Neighbors were found but no unseen item scored above the threshold
    NothingAboveThreshold,
}

/// Everything one run of the pipeline produced for a user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationReport {
    pub user_id: UserId,
    /// Number of kept items the user rated
    pub watched_items: usize,
    /// Users that passed the overlap threshold
    pub candidate_neighbors: usize,
    /// Users that passed the similarity cutoff, most similar first
    pub neighbors: Vec<Neighbor>,
    /// Recommended items, best first
    pub recommendations: Vec<ScoredItem>,
    pub outcome: RecommendationOutcome,
}

impl RecommendationReport {
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }
}

/// Coordinates Matrix Builder -> Neighbor Selector -> Similarity Engine ->
/// Score Aggregator
#[derive(Clone)]
pub struct Recommender {
    data_index: Arc<DataIndex>,
    matrix: Arc<UserItemMatrix>,
    config: RecommenderConfig,
    selector: NeighborSelector,
    engine: SimilarityEngine,
    aggregator: ScoreAggregator,
    filter_pipeline: Arc<FilterPipeline>,
}

impl Recommender {
    /// Validate the config and build the rating matrix
    pub fn new(data_index: Arc<DataIndex>, config: RecommenderConfig) -> Result<Self> {
        config.validate()?;

        let start = Instant::now();
        let matrix = UserItemMatrix::from_index(&data_index, &config);
        info!(
            "Built rating matrix: {} users, {} items with more than {} ratings ({:.2?})",
            matrix.user_count(),
            matrix.item_count(),
            config.popularity_threshold,
            start.elapsed()
        );

        Ok(Self {
            selector: NeighborSelector::new(&config),
            engine: SimilarityEngine::new(&config),
            aggregator: ScoreAggregator::new(data_index.clone()),
            filter_pipeline: Arc::new(FilterPipeline::recommendation_stage(&config)),
            matrix: Arc::new(matrix),
            data_index,
            config,
        })
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    pub fn matrix(&self) -> &UserItemMatrix {
        &self.matrix
    }

    pub fn data_index(&self) -> &DataIndex {
        &self.data_index
    }

    /// Main entry point: recommend unseen items to a user
    ///
    /// # Errors
    /// * `UserNotFound` - the user is not in the ratings table
    /// * `NoRatingsForUser` - the user rated no popular item
    ///
    /// Every other shortfall yields an empty report with its
    /// [`RecommendationOutcome`].
    pub fn recommend(&self, user_id: UserId) -> Result<RecommendationReport> {
        let start_time = Instant::now();

        let neighborhood = self.selector.select(&self.matrix, user_id)?;
        info!(
            "User {} watched {} items, {} neighbor candidates",
            user_id,
            neighborhood.watched_items.len(),
            neighborhood.candidates.len()
        );

        let mut report = RecommendationReport {
            user_id,
            watched_items: neighborhood.watched_items.len(),
            candidate_neighbors: neighborhood.candidates.len(),
            neighbors: Vec::new(),
            recommendations: Vec::new(),
            outcome: RecommendationOutcome::NoOverlappingNeighbors,
        };
        if neighborhood.is_empty() {
            return Ok(report);
        }

        report.neighbors = self.engine.similar_neighbors(&self.matrix, &neighborhood);
        info!(
            "{} neighbors with similarity >= {}",
            report.neighbors.len(),
            self.config.similarity_cutoff
        );
        if report.neighbors.is_empty() {
            report.outcome = RecommendationOutcome::NoSimilarNeighbors;
            return Ok(report);
        }

        let scored = self.aggregator.aggregate(user_id, &report.neighbors);
        let context = build_user_context(&self.data_index, &neighborhood);
        report.recommendations = self
            .filter_pipeline
            .apply(scored, &context)
            .map_err(|e| RecommendError::FilterFailed {
                filter: "recommendation_stage".to_string(),
                reason: e.to_string(),
            })?;

        report.outcome = if report.recommendations.is_empty() {
            RecommendationOutcome::NothingAboveThreshold
        } else {
            RecommendationOutcome::Recommended
        };

        info!(
            "Recommended {} items to user {} in {:.2?}",
            report.recommendations.len(),
            user_id,
            start_time.elapsed()
        );
        Ok(report)
    }
}
