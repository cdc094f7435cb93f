//! Ratings joined with movie metadata.
//!
//! The joined rows borrow from the [`Dataset`](data_loader::Dataset); nothing
//! is copied except the rating values themselves.

use data_loader::{Genre, Movie, MovieId, Rating};
use std::collections::HashMap;
use tracing::debug;

/// A rating together with its movie's genre list and release year.
///
/// Both movie-side fields are `None` when the rated movie is not in the
/// movies table.
#[derive(Debug, Clone, Copy)]
pub struct EnrichedRating<'a> {
    pub rating: &'a Rating,
    pub genres: Option<&'a [Genre]>,
    pub year: Option<u16>,
}

/// One (rating, genre) pair of an exploded genre list
#[derive(Debug, Clone, Copy)]
pub struct ExplodedRating<'a> {
    pub rating: &'a Rating,
    pub genre: &'a Genre,
}

/// Left-join ratings to movies on movie id.
///
/// Every rating yields exactly one row, in ratings order.
pub fn join_movies<'a>(ratings: &'a [Rating], movies: &'a [Movie]) -> Vec<EnrichedRating<'a>> {
    let by_id: HashMap<MovieId, &Movie> = movies.iter().map(|m| (m.id, m)).collect();

    let joined: Vec<EnrichedRating<'a>> = ratings
        .iter()
        .map(|rating| {
            let movie = by_id.get(&rating.movie_id).copied();
            EnrichedRating {
                rating,
                genres: movie.map(|m| m.genres.as_slice()),
                year: movie.and_then(|m| m.year),
            }
        })
        .collect();

    let unmatched = joined.iter().filter(|row| row.genres.is_none()).count();
    debug!(
        "Joined {} ratings with {} movies ({} without a movie record)",
        joined.len(),
        movies.len(),
        unmatched
    );
    joined
}

/// Expand each joined row into one row per genre tag.
///
/// Rows whose movie is unknown have no genre list and contribute no rows.
pub fn explode_genres<'a>(rows: &[EnrichedRating<'a>]) -> Vec<ExplodedRating<'a>> {
    let exploded: Vec<ExplodedRating<'a>> = rows
        .iter()
        .flat_map(|row| {
            let rating = row.rating;
            row.genres
                .unwrap_or_default()
                .iter()
                .map(move |genre| ExplodedRating { rating, genre })
        })
        .collect();

    debug!("Exploded {} joined rows into {} genre rows", rows.len(), exploded.len());
    exploded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(user_id: u32, movie_id: MovieId, value: f64) -> Rating {
        Rating {
            user_id,
            movie_id,
            rating: value,
            timestamp: 0,
        }
    }

    fn movie(id: MovieId, year: Option<u16>, genres: &[&str]) -> Movie {
        Movie {
            id,
            title: format!("Movie {id}"),
            genres: genres.iter().map(|g| Genre::from(*g)).collect(),
            year,
        }
    }

    #[test]
    fn test_left_join_keeps_every_rating() {
        let ratings = vec![rating(1, 1, 4.0), rating(1, 7, 2.0), rating(2, 2, 3.5)];
        let movies = vec![
            movie(1, Some(1995), &["Comedy"]),
            movie(2, None, &["Drama", "War"]),
        ];

        let joined = join_movies(&ratings, &movies);

        assert_eq!(joined.len(), ratings.len());
        assert_eq!(joined[0].year, Some(1995));
        assert!(joined[1].genres.is_none());
        assert!(joined[1].year.is_none());
        assert_eq!(joined[2].year, None);
        assert_eq!(joined[2].genres.map(|g| g.len()), Some(2));
        assert_eq!(joined[2].rating.user_id, 2);
    }

    #[test]
    fn test_explode_conserves_rows() {
        let ratings = vec![rating(1, 1, 4.0), rating(2, 1, 3.0), rating(3, 2, 5.0), rating(3, 9, 1.0)];
        let movies = vec![
            movie(1, Some(2000), &["Action", "Comedy", "Crime"]),
            movie(2, Some(2001), &["Comedy"]),
        ];

        let joined = join_movies(&ratings, &movies);
        let exploded = explode_genres(&joined);

        let expected: usize = joined.iter().map(|r| r.genres.map_or(0, |g| g.len())).sum();
        assert_eq!(exploded.len(), expected);
        assert_eq!(exploded.len(), 7);

        assert_eq!(exploded[0].genre.as_str(), "Action");
        assert_eq!(exploded[2].genre.as_str(), "Crime");
        assert_eq!(exploded[3].rating.user_id, 2);
    }
}
