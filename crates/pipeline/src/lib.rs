//! Data-transformation pipeline for the MovieLens ratings report.
//!
//! This crate provides:
//! - The left join of ratings with movie metadata, and genre explosion
//! - Grouped statistics per genre and per release year
//! - Per-rater statistics, extremes and rank correlation
//! - Report assembly for the presentation layer
//!
//! ## Architecture
//! The pipeline processes the dataset in stages:
//! 1. `join_movies` attaches genre list and release year to every rating
//! 2. `genre_stats` explodes genres and aggregates; `year_stats` aggregates the joined rows
//! 3. `summarize_raters` works on the raw ratings table
//! 4. `build_report` runs all of the above and bundles the results
//!
//! ## Example Usage
//! ```ignore
//! use data_loader::Dataset;
//! use pipeline::build_report;
//!
//! let dataset = Dataset::load_from_files(Path::new("data/ml-latest-small"))?;
//! let report = build_report(&dataset)?;
//!
//! // or load and build in one step
//! let report = pipeline::report_from_dir(Path::new("data/ml-latest-small"))?;
//!
//! for genre in &report.genres {
//!     println!("{}: {:.2}", genre.key, genre.stats.avg_rating);
//! }
//! ```

pub mod error;
pub mod stats;
pub mod join;
pub mod aggregate;
pub mod raters;
pub mod report;

// Re-export main types
pub use aggregate::{
    genre_stats, group_stats, release_counts, sort_groups, top_release_years, unique_genres,
    year_stats, GroupOrder, GroupStats, ReleaseCount, YearBreakdown,
};
pub use error::{PipelineError, Result};
pub use join::{explode_genres, join_movies, EnrichedRating, ExplodedRating};
pub use raters::{
    rater_stats, rating_count_correlation, summarize_rater_table, summarize_raters, RaterStats,
    RaterSummary,
};
pub use report::{build_report, overview, report_from_dir, Overview, Report};
pub use stats::{kendall_tau, round_to, RatingAccumulator, RatingStats};
