//! # Neighborhood Crate
//!
//! The first three stages of user-based collaborative filtering:
//!
//! 1. **Matrix Builder** ([`UserItemMatrix`]) - sparse user x item ratings,
//!    restricted to popular items
//! 2. **Neighbor Selector** ([`NeighborSelector`]) - users who rated enough
//!    of the target's watched items
//! 3. **Similarity Engine** ([`SimilarityEngine`]) - Pearson correlation with
//!    the target over the watched items, filtered by a cutoff
//!
//! Each stage is a pure function of its inputs and a [`RecommenderConfig`].
//!
//! ## Example Usage
//!
//! ```ignore
//! use neighborhood::{NeighborSelector, RecommenderConfig, SimilarityEngine, UserItemMatrix};
//!
//! let config = RecommenderConfig::default();
//! let matrix = UserItemMatrix::from_index(&data_index, &config);
//! let neighborhood = NeighborSelector::new(&config).select(&matrix, user_id)?;
//! let neighbors = SimilarityEngine::new(&config).similar_neighbors(&matrix, &neighborhood);
//! ```
//!
//! ## Capacity
//!
//! The matrix holds one `f32` per kept rating. On MovieLens 20M with the
//! default popularity threshold that is roughly 18M cells.

pub mod config;
pub mod error;
pub mod matrix;
pub mod selector;
pub mod similarity;
pub mod user_context;

pub use config::RecommenderConfig;
pub use error::{RecommendError, Result};
pub use matrix::{UserItemMatrix, UserRow};
pub use selector::{NeighborCandidate, NeighborSelector, Neighborhood};
pub use similarity::{pairwise_pearson, rank_neighbors, Neighbor, SimilarityEngine};
pub use user_context::{build_user_context, UserContext};
