//! Dataset loading and validation.
//!
//! This module builds the [`Dataset`] from parsed data:
//! - Parse ratings.csv and movies.csv (in parallel)
//! - Validate keys and value ranges
//!
//! Ratings that reference a movie missing from movies.csv are kept; the
//! join in the pipeline crate carries them with absent genres and year.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// File name of the ratings table inside a dataset directory
pub const RATINGS_FILE: &str = "ratings.csv";
/// File name of the movies table inside a dataset directory
pub const MOVIES_FILE: &str = "movies.csv";

impl Dataset {
    /// Load the dataset from a directory holding ratings.csv and movies.csv
    ///
    /// This is the main entry point for loading data.
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading MovieLens dataset from {:?}", data_dir);
        Self::load(&data_dir.join(RATINGS_FILE), &data_dir.join(MOVIES_FILE))
    }

    /// Load the dataset from explicit file locations
    ///
    /// Steps:
    /// 1. Parse both files in parallel
    /// 2. Validate data integrity
    pub fn load(ratings_path: &Path, movies_path: &Path) -> Result<Self> {
        // Rayon's `join` runs two closures in parallel
        let (ratings, movies) = rayon::join(
            || parser::parse_ratings(ratings_path),
            || parser::parse_movies(movies_path),
        );

        let ratings = ratings?;
        let movies = movies?;

        info!(
            "Loaded {} movies, {} ratings",
            movies.len(),
            ratings.len()
        );

        Self::from_parts(ratings, movies)
    }

    /// Build a dataset from already parsed records
    ///
    /// Returns an error if the records violate any of the checks in
    /// [`Dataset::validate`].
    pub fn from_parts(ratings: Vec<Rating>, movies: Vec<Movie>) -> Result<Self> {
        let dataset = Self { ratings, movies };
        dataset.validate()?;
        debug!("Dataset validated");
        Ok(dataset)
    }

    /// Validate data integrity
    ///
    /// Check that:
    /// - Movie ids are unique
    /// - Each (user, movie) pair is rated at most once
    /// - Ratings are in valid range (0.5 - 5.0)
    pub fn validate(&self) -> Result<()> {
        let mut movie_ids = HashSet::with_capacity(self.movies.len());
        for movie in &self.movies {
            if !movie_ids.insert(movie.id) {
                return Err(DataLoadError::DuplicateKey {
                    entity: "movieId".to_string(),
                    key: movie.id.to_string(),
                });
            }
        }

        let mut pairs = HashSet::with_capacity(self.ratings.len());
        for rating in &self.ratings {
            if !(Rating::MIN..=Rating::MAX).contains(&rating.rating) {
                return Err(DataLoadError::InvalidValue {
                    field: "rating".to_string(),
                    value: format!(
                        "{} (userId {}, movieId {})",
                        rating.rating, rating.user_id, rating.movie_id
                    ),
                });
            }
            if !pairs.insert((rating.user_id, rating.movie_id)) {
                return Err(DataLoadError::DuplicateKey {
                    entity: "rating".to_string(),
                    key: format!("userId {}, movieId {}", rating.user_id, rating.movie_id),
                });
            }
        }
        Ok(())
    }
}
