//! Per-rater behavior: average rating, rating count and the whole-dataset
//! rater metrics built on them.

use crate::error::{PipelineError, Result};
use crate::stats::{kendall_tau, RatingAccumulator};
use data_loader::{Rating, UserId};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Average rating and rating count of one rater
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RaterStats {
    pub user_id: UserId,
    pub avg_rating: f64,
    pub num_of_ratings: usize,
}

/// Whole-dataset rater metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaterSummary {
    /// Rater with the highest average rating
    pub highest: RaterStats,
    /// Rater with the lowest average rating
    pub lowest: RaterStats,
    /// Mean over all ratings (not weighted per rater)
    pub overall_avg_rating: f64,
    /// Kendall tau-b between a rater's average rating and rating count;
    /// `None` when it is undefined for this dataset
    pub rating_count_correlation: Option<f64>,
}

/// Per-rater statistics, highest average first.
///
/// Raters with equal averages are ordered by user id ascending, so the
/// first and last entries are deterministic.
pub fn rater_stats(ratings: &[Rating]) -> Vec<RaterStats> {
    let mut per_user: HashMap<UserId, RatingAccumulator> = HashMap::new();
    for rating in ratings {
        per_user.entry(rating.user_id).or_default().push(rating.rating);
    }

    let mut raters: Vec<RaterStats> = per_user
        .into_iter()
        .filter_map(|(user_id, acc)| {
            Some(RaterStats {
                user_id,
                avg_rating: acc.mean()?,
                num_of_ratings: acc.count(),
            })
        })
        .collect();

    raters.sort_by(|a, b| {
        b.avg_rating
            .total_cmp(&a.avg_rating)
            .then(a.user_id.cmp(&b.user_id))
    });
    raters
}

/// Kendall correlation between per-rater average and per-rater count
pub fn rating_count_correlation(raters: &[RaterStats]) -> Result<f64> {
    if raters.len() < 2 {
        return Err(PipelineError::InsufficientData {
            metric: "rating count correlation",
            reason: format!("need at least 2 raters, found {}", raters.len()),
        });
    }

    let averages: Vec<f64> = raters.iter().map(|r| r.avg_rating).collect();
    let counts: Vec<f64> = raters.iter().map(|r| r.num_of_ratings as f64).collect();

    kendall_tau(&averages, &counts).ok_or_else(|| PipelineError::InsufficientData {
        metric: "rating count correlation",
        reason: "average rating or rating count is the same for every rater".to_string(),
    })
}

/// Compute the rater extremes, overall average and rank correlation
///
/// Fails only when there are no ratings at all. An undefined correlation
/// is logged and left absent.
pub fn summarize_raters(ratings: &[Rating]) -> Result<RaterSummary> {
    let raters = rater_stats(ratings);
    debug!("Computed statistics for {} raters", raters.len());
    summarize_rater_table(&raters, ratings)
}

/// Same as [`summarize_raters`], reusing a table already built by
/// [`rater_stats`] from the same `ratings`
pub fn summarize_rater_table(raters: &[RaterStats], ratings: &[Rating]) -> Result<RaterSummary> {
    let (Some(&highest), Some(&lowest)) = (raters.first(), raters.last()) else {
        return Err(PipelineError::InsufficientData {
            metric: "rater extremes",
            reason: "no ratings".to_string(),
        });
    };

    let overall: RatingAccumulator = ratings.iter().map(|r| r.rating).collect();
    let overall_avg_rating = overall.mean().ok_or_else(|| PipelineError::InsufficientData {
        metric: "overall average rating",
        reason: "no ratings".to_string(),
    })?;

    let rating_count_correlation = match rating_count_correlation(raters) {
        Ok(tau) => Some(tau),
        Err(e) => {
            warn!("{}", e);
            None
        }
    };

    Ok(RaterSummary {
        highest,
        lowest,
        overall_avg_rating,
        rating_count_correlation,
    })
}
