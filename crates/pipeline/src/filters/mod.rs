//! Filter implementations for the scoring pipeline.

pub mod already_watched;
pub mod minimum_score;

// Re-export for convenience
pub use already_watched::AlreadyWatchedFilter;
pub use minimum_score::MinimumScoreFilter;
