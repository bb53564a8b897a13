//! Core domain types for the MovieLens ratings dataset.
//!
//! This module defines the fundamental data structures used throughout the system.
//! Key Rust concepts demonstrated here:
//! - Type aliases for domain clarity (UserId, MovieId)
//! - HashMap indices that hand out borrowed slices

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up user IDs with movie IDs

/// Unique identifier for a user (`userId` column)
pub type UserId = u32;

/// Unique identifier for a movie (`movieId` column)
pub type MovieId = u32;

/// Lowest rating value MovieLens hands out
pub const MIN_RATING: f32 = 0.5;

/// Highest rating value MovieLens hands out
pub const MAX_RATING: f32 = 5.0;

// =============================================================================
// Movie-related Types
// =============================================================================

/// Item metadata. Only used for presentation, never for scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
}

// =============================================================================
// Rating Type
// =============================================================================

/// A single rating record: who rated what, and how much.
///
/// Rust concepts:
/// - Small, copyable struct (all fields are Copy)
/// - Immutable once loaded; the index only ever hands out `&Rating`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Rating value from 0.5 to 5.0 in half-star steps
    pub rating: f32,
}

// =============================================================================
// DataIndex - The In-Memory Ratings Table
// =============================================================================

/// Holds the loaded ratings table plus the movie metadata table.
///
/// Ratings are indexed both by user and by movie so that either side can be
/// fetched as a slice in O(1).
#[derive(Debug)]
pub struct DataIndex {
    pub(crate) movies: HashMap<MovieId, Movie>,

    /// All ratings made by each user
    pub(crate) user_ratings: HashMap<UserId, Vec<Rating>>,
    /// All ratings received by each movie
    pub(crate) movie_ratings: HashMap<MovieId, Vec<Rating>>,
}

impl DataIndex {
    /// Creates a new, empty DataIndex
    pub fn new() -> Self {
        Self {
            movies: HashMap::new(),
            user_ratings: HashMap::new(),
            movie_ratings: HashMap::new(),
        }
    }

    /// Get a movie by ID
    pub fn get_movie(&self, id: MovieId) -> Option<&Movie> {
        self.movies.get(&id)
    }

    /// Whether the ratings table contains at least one rating by this user
    pub fn has_user(&self, user_id: UserId) -> bool {
        self.user_ratings.contains_key(&user_id)
    }

    /// Get all ratings made by a user
    ///
    /// Returns an empty slice if user has no ratings
    ///
    /// Rust concept: `&[T]` is a slice (view into an array/vector)
    pub fn get_user_ratings(&self, user_id: UserId) -> &[Rating] {
        self.user_ratings
            .get(&user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Get all ratings for a movie
    pub fn get_movie_ratings(&self, movie_id: MovieId) -> &[Rating] {
        self.movie_ratings
            .get(&movie_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Per-user rating lists, keyed by user
    pub fn ratings_by_user(&self) -> &HashMap<UserId, Vec<Rating>> {
        &self.user_ratings
    }

    /// Every user that appears in the ratings table, ascending
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.user_ratings.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Item popularity: number of rating records per movie
    pub fn item_popularity(&self) -> HashMap<MovieId, u32> {
        self.movie_ratings
            .iter()
            .map(|(&movie_id, ratings)| (movie_id, ratings.len() as u32))
            .collect()
    }

    /// Insert a movie into the index
    pub fn insert_movie(&mut self, movie: Movie) {
        self.movies.insert(movie.id, movie);
    }

    /// Insert a rating and update both indices
    pub fn insert_rating(&mut self, rating: Rating) {
        self.user_ratings
            .entry(rating.user_id)
            .or_default()
            .push(rating);

        self.movie_ratings
            .entry(rating.movie_id)
            .or_default()
            .push(rating);
    }

    /// Get counts (users, movies, ratings) for debugging/validation
    pub fn counts(&self) -> (usize, usize, usize) {
        let total_ratings = self.user_ratings.values().map(|v| v.len()).sum();
        (self.user_ratings.len(), self.movies.len(), total_ratings)
    }
}

impl Default for DataIndex {
    fn default() -> Self {
        Self::new()
    }
}
