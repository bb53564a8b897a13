//! Fatal errors of the recommendation pipeline.
//!
//! Only conditions that make a recommendation impossible live here. A neighbor
//! whose correlation is undefined, or a neighborhood that turns out empty, is
//! not an error: those shrink the result instead.

use data_loader::UserId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecommendError {
    /// The target user has no row in the user-item matrix
    #[error("User {0} not found in the ratings table")]
    UserNotFound(UserId),

    /// The target user exists but rated none of the kept items
    #[error("User {0} has no ratings on any item that passed the popularity threshold")]
    NoRatingsForUser(UserId),

    /// A configuration value is out of its allowed range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A post-aggregation filter failed
    #[error("Filter {filter} failed: {reason}")]
    FilterFailed { filter: String, reason: String },
}

pub type Result<T> = std::result::Result<T, RecommendError>;
