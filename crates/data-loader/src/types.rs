//! Core domain types for the MovieLens ratings dataset.
//!
//! The dataset is two tables, ratings and movies. Both are held as plain
//! vectors of typed records; derived tables live in the `pipeline` crate.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a rater
pub type UserId = u32;

/// Unique identifier for a movie
pub type MovieId = u32;

// =============================================================================
// Movie-related Types
// =============================================================================

/// A genre tag as it appears in `movies.csv` (e.g. "Comedy", "Sci-Fi").
///
/// MovieLens releases differ in their tag sets, so tags are kept as text
/// rather than a closed enum. `"(no genres listed)"` is an ordinary tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genre(String);

impl Genre {
    /// Placeholder tag MovieLens uses for movies without genres
    pub const NONE_LISTED: &'static str = "(no genres listed)";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn none_listed() -> Self {
        Self(Self::NONE_LISTED.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_none_listed(&self) -> bool {
        self.0 == Self::NONE_LISTED
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Genre {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// Represents a movie in the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Genre tags in source order; never empty
    pub genres: Vec<Genre>,
    /// Year extracted from title (e.g., "Toy Story (1995)")
    ///
    /// `None` when the title carries no parenthesized 4-digit year.
    pub year: Option<u16>,
}

// =============================================================================
// Rating Type
// =============================================================================

/// Represents a single rating from a user for a movie
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Rating value from 0.5 to 5.0
    pub rating: f64,
    /// Unix timestamp when rating was made
    pub timestamp: i64,
}

impl Rating {
    /// Lowest rating value accepted at load time
    pub const MIN: f64 = 0.5;
    /// Highest rating value accepted at load time
    pub const MAX: f64 = 5.0;
}

// =============================================================================
// Dataset - the two loaded tables
// =============================================================================

/// The validated ratings and movies tables.
///
/// Construct through [`Dataset::load_from_files`], [`Dataset::load`] or
/// [`Dataset::from_parts`], all of which validate before returning, so a
/// `Dataset` value always satisfies the key and range constraints.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub(crate) ratings: Vec<Rating>,
    pub(crate) movies: Vec<Movie>,
}

impl Dataset {
    /// All ratings, in file order
    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    /// All movies, in file order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Get counts for debugging/validation: (movies, ratings)
    pub fn counts(&self) -> (usize, usize) {
        (self.movies.len(), self.ratings.len())
    }
}
