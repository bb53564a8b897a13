//! Parser for the MovieLens CSV files.
//!
//! This module handles two files:
//! - movie.csv: movieId,title,genres
//! - rating.csv: userId,movieId,rating,timestamp
//!
//! Rows are deserialized by header name with the `csv` crate, so quoted
//! titles (`"American President, The (1995)"`) and columns the recommender
//! never reads (`genres`, `timestamp`) need no special handling.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

/// One row of the movie metadata file
#[derive(Debug, Deserialize)]
struct MovieRecord {
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    title: String,
}

/// One row of the ratings file
///
/// The timestamp column is skipped, so both the integer and the
/// `YYYY-MM-DD hh:mm:ss` export variants load.
#[derive(Debug, Deserialize)]
struct RatingRecord {
    #[serde(rename = "userId")]
    user_id: UserId,
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    rating: f32,
}

impl From<MovieRecord> for Movie {
    fn from(record: MovieRecord) -> Self {
        Movie {
            id: record.movie_id,
            title: record.title,
        }
    }
}

impl From<RatingRecord> for Rating {
    fn from(record: RatingRecord) -> Self {
        Rating {
            user_id: record.user_id,
            movie_id: record.movie_id,
            rating: record.rating,
        }
    }
}

/// Open a data file, mapping "not found" to a dedicated error
fn open_reader(path: &Path) -> Result<csv::Reader<File>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| {
            let not_found =
                matches!(e.kind(), csv::ErrorKind::Io(io) if io.kind() == ErrorKind::NotFound);
            if not_found {
                DataLoadError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                DataLoadError::Csv(e)
            }
        })
}

/// Deserialize every row of `path` into `R`, then convert it
fn read_records<R, T>(path: &Path) -> Result<Vec<T>>
where
    R: DeserializeOwned,
    T: From<R>,
{
    let mut reader = open_reader(path)?;
    reader
        .deserialize::<R>()
        .map(|row| row.map(T::from).map_err(DataLoadError::from))
        .collect()
}

/// Parse the movie metadata file
///
/// Format: movieId,title,genres
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    read_records::<MovieRecord, Movie>(path)
}

/// Parse the ratings file
///
/// Format: userId,movieId,rating,timestamp
pub fn parse_ratings(path: &Path) -> Result<Vec<Rating>> {
    read_records::<RatingRecord, Rating>(path)
}
