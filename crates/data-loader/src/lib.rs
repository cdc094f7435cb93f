//! # Data Loader Crate
//!
//! This crate handles loading the MovieLens `ml-latest` ratings dataset
//! (ratings.csv and movies.csv) into typed, validated records.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Rating, Movie, Genre, Dataset)
//! - **parser**: Parse CSV files into Rust structs, derive genre lists and release years
//! - **dataset**: Load both files and validate data integrity
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Dataset;
//! use std::path::Path;
//!
//! let dataset = Dataset::load_from_files(Path::new("data/ml-latest-small"))?;
//! let (movies, ratings) = dataset.counts();
//!
//! println!("{} ratings over {} movies", ratings, movies);
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod dataset;

// Re-export commonly used types for convenience
pub use dataset::{MOVIES_FILE, RATINGS_FILE};
pub use error::{DataLoadError, Result};
pub use types::{
    // Type aliases
    UserId,
    MovieId,
    // Core types
    Rating,
    Movie,
    Genre,
    Dataset,
};
