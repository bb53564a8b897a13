//! # Data Loader Crate
//!
//! This crate loads the MovieLens ratings and movie tables into memory.
//! It is the collaborator that hands the recommender its two inputs: the
//! ratings table (`userId, movieId, rating`) and the movie metadata table
//! (`movieId, title`).
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, Rating, DataIndex)
//! - **parser**: Parse the CSV files into Rust structs
//! - **index**: Load, index and validate
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use std::path::Path;
//!
//! let index = DataIndex::load_from_files(Path::new("data/ml-20m"))?;
//! let ratings = index.get_user_ratings(1);
//! println!("User 1 rated {} movies", ratings.len());
//! ```

pub mod error;
pub mod index;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{
    // Type aliases
    UserId,
    MovieId,
    // Core types
    Movie,
    Rating,
    DataIndex,
    // Bounds
    MIN_RATING,
    MAX_RATING,
};
