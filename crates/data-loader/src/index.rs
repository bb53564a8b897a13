//! DataIndex building and validation.
//!
//! Loads the two CSV files in parallel, fills the user and movie indices,
//! then checks that every rating is in range and points at a known movie.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::path::{Path, PathBuf};
use tracing::info;

/// Accepted file names, first match wins
const MOVIE_FILES: [&str; 2] = ["movie.csv", "movies.csv"];
const RATING_FILES: [&str; 2] = ["rating.csv", "ratings.csv"];

impl DataIndex {
    /// Load the ratings and movie tables from a directory
    ///
    /// Steps:
    /// 1. Locate `movie.csv` and `rating.csv` (plural names accepted too)
    /// 2. Parse both files in parallel
    /// 3. Insert everything into the indices
    /// 4. Validate data integrity
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading MovieLens dataset from {:?}", data_dir);

        let movies_path = resolve_file(data_dir, &MOVIE_FILES)?;
        let ratings_path = resolve_file(data_dir, &RATING_FILES)?;

        // Rayon's `join` runs two closures in parallel
        let (movies, ratings) = rayon::join(
            || parser::parse_movies(&movies_path),
            || parser::parse_ratings(&ratings_path),
        );
        let movies = movies?;
        let ratings = ratings?;

        info!("Parsed {} movies, {} ratings", movies.len(), ratings.len());

        let mut index = DataIndex::new();
        for movie in movies {
            index.insert_movie(movie);
        }
        for rating in ratings {
            index.insert_rating(rating);
        }

        index.validate()?;

        let (users, movies, ratings) = index.counts();
        info!(users, movies, ratings, "DataIndex built and validated");
        Ok(index)
    }

    /// Validate data integrity
    ///
    /// Check that:
    /// - Ratings are in the valid range (0.5 - 5.0)
    /// - Every rating references a movie in the metadata table, when one is loaded
    pub fn validate(&self) -> Result<()> {
        let check_movies = !self.movies.is_empty();

        for ratings in self.user_ratings.values() {
            for rating in ratings {
                if !(MIN_RATING..=MAX_RATING).contains(&rating.rating) {
                    return Err(DataLoadError::InvalidValue {
                        field: "rating".to_string(),
                        value: rating.rating.to_string(),
                    });
                }
                if check_movies && !self.movies.contains_key(&rating.movie_id) {
                    return Err(DataLoadError::MissingReference {
                        entity: "Movie".to_string(),
                        id: rating.movie_id,
                    });
                }
            }
        }
        Ok(())
    }
}

fn resolve_file(data_dir: &Path, candidates: &[&str]) -> Result<PathBuf> {
    candidates
        .iter()
        .map(|name| data_dir.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| DataLoadError::FileNotFound {
            path: data_dir.join(candidates[0]).display().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: MovieId) -> Movie {
        Movie {
            id,
            title: format!("Movie {}", id),
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut index = DataIndex::new();
        index.insert_movie(movie(1));
        index.insert_rating(Rating { user_id: 1, movie_id: 1, rating: 7.0 });

        assert!(matches!(
            index.validate(),
            Err(DataLoadError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_movie() {
        let mut index = DataIndex::new();
        index.insert_movie(movie(1));
        index.insert_rating(Rating { user_id: 1, movie_id: 2, rating: 4.0 });

        assert!(matches!(
            index.validate(),
            Err(DataLoadError::MissingReference { id: 2, .. })
        ));
    }

    #[test]
    fn test_validate_without_metadata() {
        let mut index = DataIndex::new();
        index.insert_rating(Rating { user_id: 1, movie_id: 2, rating: 0.5 });
        assert!(index.validate().is_ok());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = std::env::temp_dir().join(format!("data-loader-load-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("movies.csv"),
            "movieId,title,genres\n1,Toy Story (1995),Comedy\n2,Jumanji (1995),Adventure\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("rating.csv"),
            "userId,movieId,rating,timestamp\n1,1,4.0,1\n1,2,3.0,2\n2,1,5.0,3\n",
        )
        .unwrap();

        let index = DataIndex::load_from_files(&dir).unwrap();
        assert_eq!(index.counts(), (2, 2, 3));
        assert_eq!(index.item_popularity()[&1], 2);
    }

    #[test]
    fn test_load_missing_directory() {
        let err = DataIndex::load_from_files(Path::new("/nonexistent/ml-20m")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
