//! Grouped rating statistics along the genre and release-year dimensions.
//!
//! Groups come out ordered by key ascending. Any group with a single rating
//! carries `var_of_ratings: None`; this never fails the aggregation.

use crate::join::{explode_genres, EnrichedRating};
use crate::stats::{RatingAccumulator, RatingStats};
use data_loader::{Genre, Movie};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Statistics for one group key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats<K> {
    pub key: K,
    #[serde(flatten)]
    pub stats: RatingStats,
}

/// Per-year statistics plus the ratings whose movie has no known year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearBreakdown {
    pub by_year: Vec<GroupStats<u16>>,
    /// Ratings of movies without a parseable year or without a movie record
    pub unknown_year: Option<RatingStats>,
}

/// Number of movies released in one year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReleaseCount {
    pub year: u16,
    pub movies: usize,
}

/// Display orderings for grouped tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupOrder {
    /// Group key ascending (the natural output order)
    #[default]
    Key,
    /// Most ratings first
    Count,
    /// Highest average first
    AvgRating,
}

/// Group `(key, rating)` pairs and compute statistics per key
pub fn group_stats<K, I>(rows: I) -> Vec<GroupStats<K>>
where
    K: Ord,
    I: IntoIterator<Item = (K, f64)>,
{
    let mut groups: BTreeMap<K, RatingAccumulator> = BTreeMap::new();
    for (key, value) in rows {
        groups.entry(key).or_default().push(value);
    }

    groups
        .into_iter()
        .filter_map(|(key, acc)| acc.finish().map(|stats| GroupStats { key, stats }))
        .collect()
}

/// Rating statistics per genre, over the exploded joined table
pub fn genre_stats(rows: &[EnrichedRating<'_>]) -> Vec<GroupStats<Genre>> {
    let exploded = explode_genres(rows);
    let groups = group_stats(
        exploded
            .iter()
            .map(|row| (row.genre.clone(), row.rating.rating)),
    );

    debug!("Computed statistics for {} genres", groups.len());
    groups
}

/// Rating statistics per release year, over the joined (non-exploded) table
pub fn year_stats(rows: &[EnrichedRating<'_>]) -> YearBreakdown {
    let mut unknown = RatingAccumulator::new();
    let by_year = group_stats(rows.iter().filter_map(|row| match row.year {
        Some(year) => Some((year, row.rating.rating)),
        None => {
            unknown.push(row.rating.rating);
            None
        }
    }));

    debug!(
        "Computed statistics for {} years ({} ratings without a year)",
        by_year.len(),
        unknown.count()
    );
    YearBreakdown {
        by_year,
        unknown_year: unknown.finish(),
    }
}

/// Number of movies released per year, ascending by year
///
/// Movies without a year are not counted.
pub fn release_counts(movies: &[Movie]) -> Vec<ReleaseCount> {
    let mut counts: BTreeMap<u16, usize> = BTreeMap::new();
    for year in movies.iter().filter_map(|m| m.year) {
        *counts.entry(year).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(year, movies)| ReleaseCount { year, movies })
        .collect()
}

/// The `n` years with the most releases; ties go to the earlier year
pub fn top_release_years(counts: &[ReleaseCount], n: usize) -> Vec<ReleaseCount> {
    let mut sorted = counts.to_vec();
    sorted.sort_by(|a, b| b.movies.cmp(&a.movies).then(a.year.cmp(&b.year)));
    sorted.truncate(n);
    sorted
}

/// Number of distinct genre tags across the whole movies table
pub fn unique_genres(movies: &[Movie]) -> usize {
    movies
        .iter()
        .flat_map(|m| m.genres.iter())
        .collect::<HashSet<_>>()
        .len()
}

/// Reorder a grouped table for display; ties fall back to key order
pub fn sort_groups<K: Ord>(groups: &mut [GroupStats<K>], order: GroupOrder) {
    match order {
        GroupOrder::Key => groups.sort_by(|a, b| a.key.cmp(&b.key)),
        GroupOrder::Count => groups.sort_by(|a, b| {
            b.stats
                .num_of_ratings
                .cmp(&a.stats.num_of_ratings)
                .then_with(|| a.key.cmp(&b.key))
        }),
        GroupOrder::AvgRating => groups.sort_by(|a, b| {
            b.stats
                .avg_rating
                .total_cmp(&a.stats.avg_rating)
                .then_with(|| a.key.cmp(&b.key))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::join::join_movies;
    use data_loader::Rating;

    fn rating(user_id: u32, movie_id: u32, value: f64) -> Rating {
        Rating {
            user_id,
            movie_id,
            rating: value,
            timestamp: 0,
        }
    }

    fn movie(id: u32, year: Option<u16>, genres: &[&str]) -> Movie {
        Movie {
            id,
            title: format!("Movie {id}"),
            genres: genres.iter().map(|g| Genre::from(*g)).collect(),
            year,
        }
    }

    #[test]
    fn test_group_stats_sorted_by_key() {
        let groups = group_stats(vec![("b", 1.0), ("a", 2.0), ("b", 3.0)]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "a");
        assert_eq!(groups[0].stats.var_of_ratings, None);
        assert_eq!(groups[1].key, "b");
        assert_eq!(groups[1].stats.avg_rating, 2.0);
        assert_eq!(groups[1].stats.var_of_ratings, Some(2.0));
    }

    #[test]
    fn test_genre_stats_skip_unknown_movies() {
        let ratings = vec![rating(1, 1, 4.0), rating(2, 1, 2.0), rating(3, 42, 5.0)];
        let movies = vec![movie(1, Some(1999), &["Horror", "Thriller"])];

        let joined = join_movies(&ratings, &movies);
        let genres = genre_stats(&joined);

        assert_eq!(genres.len(), 2);
        for group in &genres {
            assert_eq!(group.stats.num_of_ratings, 2);
            assert_eq!(group.stats.avg_rating, 3.0);
        }
    }

    #[test]
    fn test_year_stats_reports_unknown_separately() {
        let ratings = vec![
            rating(1, 1, 4.0),
            rating(1, 2, 3.0),
            rating(2, 2, 5.0),
            rating(2, 3, 1.0),
        ];
        let movies = vec![
            movie(1, Some(1995), &["Drama"]),
            movie(2, None, &["Drama"]),
        ];

        let joined = join_movies(&ratings, &movies);
        let years = year_stats(&joined);

        assert_eq!(years.by_year.len(), 1);
        assert_eq!(years.by_year[0].key, 1995);
        assert_eq!(years.by_year[0].stats.num_of_ratings, 1);

        let unknown = years.unknown_year.unwrap();
        assert_eq!(unknown.num_of_ratings, 3);
        assert_eq!(unknown.avg_rating, 3.0);
    }

    #[test]
    fn test_year_stats_without_unknown() {
        let ratings = vec![rating(1, 1, 4.0)];
        let movies = vec![movie(1, Some(2010), &["Drama"])];

        let years = year_stats(&join_movies(&ratings, &movies));
        assert!(years.unknown_year.is_none());
    }

    #[test]
    fn test_release_counts() {
        let movies = vec![
            movie(1, Some(1995), &["Drama"]),
            movie(2, Some(1994), &["Drama"]),
            movie(3, Some(1995), &["Comedy"]),
            movie(4, None, &["Comedy"]),
        ];

        let counts = release_counts(&movies);
        assert_eq!(
            counts,
            vec![
                ReleaseCount { year: 1994, movies: 1 },
                ReleaseCount { year: 1995, movies: 2 },
            ]
        );

        let top = top_release_years(&counts, 1);
        assert_eq!(top, vec![ReleaseCount { year: 1995, movies: 2 }]);
    }

    #[test]
    fn test_unique_genres_counts_sentinel() {
        let movies = vec![
            movie(1, None, &["Drama", "War"]),
            movie(2, None, &["Drama"]),
            movie(3, None, &[Genre::NONE_LISTED]),
        ];

        assert_eq!(unique_genres(&movies), 3);
    }

    #[test]
    fn test_sort_groups() {
        let mut groups = group_stats(vec![
            ("Action", 5.0),
            ("Comedy", 3.0),
            ("Comedy", 4.0),
            ("Drama", 2.0),
        ]);

        sort_groups(&mut groups, GroupOrder::Count);
        assert_eq!(groups[0].key, "Comedy");
        assert_eq!(groups[1].key, "Action");

        sort_groups(&mut groups, GroupOrder::AvgRating);
        assert_eq!(groups[0].key, "Action");
        assert_eq!(groups[2].key, "Drama");

        sort_groups(&mut groups, GroupOrder::Key);
        assert_eq!(groups[0].key, "Action");
        assert_eq!(groups[2].key, "Drama");
    }
}
