//! User-based collaborative filtering recommender.
//!
//! This crate wires the neighborhood stages and the scoring pipeline into a
//! single [`Recommender`] that turns a target user id into a ranked list of
//! unseen items.

pub mod orchestrator;

pub use orchestrator::{RecommendationOutcome, RecommendationReport, Recommender};

// The types a caller needs to configure a run and read its result
pub use neighborhood::{Neighbor, RecommendError, RecommenderConfig};
pub use pipeline::ScoredItem;
