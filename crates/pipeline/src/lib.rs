//! Score aggregation and final filtering of recommendations.
//!
//! This crate provides:
//! - ScoreAggregator, which turns similar neighbors into per-item scores
//! - Filter trait and implementations for the final cut
//! - FilterPipeline for composing filters and ranking the survivors
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FilterPipeline, ScoreAggregator};
//!
//! let aggregator = ScoreAggregator::new(index.clone());
//! let items = aggregator.aggregate(user_id, &neighbors);
//!
//! let pipeline = FilterPipeline::recommendation_stage(&config);
//! let recommendations = pipeline.apply(items, &context)?;
//! ```

pub mod aggregator;
pub mod filter_pipeline;
pub mod filters;
pub mod traits;
pub mod types;

// Re-export main types
pub use aggregator::ScoreAggregator;
pub use filter_pipeline::FilterPipeline;
pub use traits::Filter;
pub use types::{rank_items, ScoredItem};
