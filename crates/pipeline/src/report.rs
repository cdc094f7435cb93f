//! Assembles every derived table and metric of the report.
//!
//! The join is computed once and shared by the genre and year aggregations.
//! The independent aggregations are run with `rayon::join`; each is a pure
//! function of the dataset, so the result does not depend on scheduling.

use crate::aggregate::{
    genre_stats, release_counts, unique_genres, year_stats, GroupStats, ReleaseCount,
    YearBreakdown,
};
use crate::error::Result;
use crate::join::join_movies;
use crate::raters::{summarize_raters, RaterSummary};
use data_loader::{Dataset, Genre, MovieId, UserId};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// Dataset-level counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Overview {
    /// Distinct raters in the ratings table
    pub unique_raters: usize,
    /// Distinct movies that received at least one rating
    pub movies_rated: usize,
    /// Distinct genre tags across the movies table
    pub unique_genres: usize,
    pub total_ratings: usize,
    pub total_movies: usize,
}

/// Everything the presentation layer renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub overview: Overview,
    pub genres: Vec<GroupStats<Genre>>,
    pub years: YearBreakdown,
    pub releases: Vec<ReleaseCount>,
    pub raters: RaterSummary,
}

/// Compute the dataset-level counts
pub fn overview(dataset: &Dataset) -> Overview {
    let ratings = dataset.ratings();
    let raters: HashSet<UserId> = ratings.iter().map(|r| r.user_id).collect();
    let movies_rated: HashSet<MovieId> = ratings.iter().map(|r| r.movie_id).collect();

    Overview {
        unique_raters: raters.len(),
        movies_rated: movies_rated.len(),
        unique_genres: unique_genres(dataset.movies()),
        total_ratings: ratings.len(),
        total_movies: dataset.movies().len(),
    }
}

/// Build the full report
///
/// Fails with `InsufficientData` when the ratings table is empty.
pub fn build_report(dataset: &Dataset) -> Result<Report> {
    let joined = join_movies(dataset.ratings(), dataset.movies());

    let ((genres, years), (raters, (overview, releases))) = rayon::join(
        || rayon::join(|| genre_stats(&joined), || year_stats(&joined)),
        || {
            rayon::join(
                || summarize_raters(dataset.ratings()),
                || (overview(dataset), release_counts(dataset.movies())),
            )
        },
    );
    let raters = raters?;

    info!(
        "Report built: {} raters, {} genres, {} years",
        overview.unique_raters,
        genres.len(),
        years.by_year.len()
    );

    Ok(Report {
        overview,
        genres,
        years,
        releases,
        raters,
    })
}

/// Load `ratings.csv` and `movies.csv` from `data_dir` and build the report
pub fn report_from_dir(data_dir: &Path) -> Result<Report> {
    let dataset = Dataset::load_from_files(data_dir)?;
    build_report(&dataset)
}
