//! Parser for MovieLens CSV files.
//!
//! This module handles the two files of the `ml-latest` family of datasets:
//! - ratings.csv: userId,movieId,rating,timestamp
//! - movies.csv: movieId,title,genres
//!
//! Both files must start with a header row. Columns are matched by name, so
//! their order does not matter and extra columns are ignored.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use csv::StringRecord;
use regex::Regex;
use serde::Deserialize;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::sync::LazyLock;

/// Parenthesized 4-digit year anywhere in a title
static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([0-9]{4})\)").expect("year pattern is valid"));

const RATING_COLUMNS: &[&str] = &["userId", "movieId", "rating", "timestamp"];
const MOVIE_COLUMNS: &[&str] = &["movieId", "title", "genres"];

/// One row of ratings.csv
#[derive(Debug, Deserialize)]
struct RatingRecord {
    #[serde(rename = "userId")]
    user_id: UserId,
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    rating: f64,
    timestamp: i64,
}

/// One row of movies.csv
#[derive(Debug, Deserialize)]
struct MovieRecord {
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    title: String,
    genres: String,
}

impl From<RatingRecord> for Rating {
    fn from(record: RatingRecord) -> Self {
        Rating {
            user_id: record.user_id,
            movie_id: record.movie_id,
            rating: record.rating,
            timestamp: record.timestamp,
        }
    }
}

impl From<MovieRecord> for Movie {
    fn from(record: MovieRecord) -> Self {
        Movie {
            id: record.movie_id,
            year: extract_year_from_title(&record.title),
            genres: parse_genres(&record.genres),
            title: record.title,
        }
    }
}

/// Open a data file, reporting a missing file as [`DataLoadError::FileNotFound`]
fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse the ratings.csv file
pub fn parse_ratings(path: &Path) -> Result<Vec<Rating>> {
    let file = open_file(path)?;
    parse_ratings_from_reader(file, &file_label(path))
}

/// Parse ratings from any reader; `file` names the source in error messages
pub fn parse_ratings_from_reader<R: Read>(reader: R, file: &str) -> Result<Vec<Rating>> {
    let records: Vec<RatingRecord> = read_records(reader, file, RATING_COLUMNS)?;
    Ok(records.into_iter().map(Rating::from).collect())
}

/// Parse the movies.csv file
///
/// The title often includes year in parentheses: "Toy Story (1995)"
/// Genres are pipe-separated: "Adventure|Animation|Children|Comedy|Fantasy"
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    let file = open_file(path)?;
    parse_movies_from_reader(file, &file_label(path))
}

/// Parse movies from any reader; `file` names the source in error messages
pub fn parse_movies_from_reader<R: Read>(reader: R, file: &str) -> Result<Vec<Movie>> {
    let records: Vec<MovieRecord> = read_records(reader, file, MOVIE_COLUMNS)?;
    Ok(records.into_iter().map(Movie::from).collect())
}

/// Read every row of a headered CSV source into `T`
fn read_records<R, T>(reader: R, file: &str, columns: &[&str]) -> Result<Vec<T>>
where
    R: Read,
    T: for<'de> Deserialize<'de>,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| csv_error(file, e))?
        .clone();
    require_columns(file, &headers, columns)?;

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    loop {
        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => return Err(csv_error(file, e)),
        }
        let line = record.position().map_or(0, |p| p.line() as usize);
        let row = record
            .deserialize(Some(&headers))
            .map_err(|e| DataLoadError::ParseError {
                file: file.to_string(),
                line,
                reason: deserialize_reason(&e),
            })?;
        rows.push(row);
    }
    Ok(rows)
}

fn require_columns(file: &str, headers: &StringRecord, columns: &[&str]) -> Result<()> {
    for column in columns {
        if !headers.iter().any(|h| h == *column) {
            return Err(DataLoadError::ParseError {
                file: file.to_string(),
                line: 1,
                reason: format!("Missing column '{}'", column),
            });
        }
    }
    Ok(())
}

/// Map a csv reader error onto the loader's error kinds
fn csv_error(file: &str, err: csv::Error) -> DataLoadError {
    let line = err.position().map_or(0, |p| p.line() as usize);
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => DataLoadError::IoError(e),
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => DataLoadError::FieldCountMismatch {
            expected: expected_len as usize,
            found: len as usize,
            line,
        },
        _ => DataLoadError::ParseError {
            file: file.to_string(),
            line,
            reason,
        },
    }
}

fn deserialize_reason(err: &csv::Error) -> String {
    match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => match err.field() {
            Some(field) => format!("field {}: {}", field + 1, err.kind()),
            None => err.kind().to_string(),
        },
        _ => err.to_string(),
    }
}

/// Extract year from movie title
///
/// Takes the first parenthesized 4-digit group anywhere in the title.
///
/// Example: "Toy Story (1995)" -> Some(1995)
///          "Movie Title" -> None
pub fn extract_year_from_title(title: &str) -> Option<u16> {
    YEAR_PATTERN
        .captures(title)
        .and_then(|caps| caps.get(1))
        .and_then(|year| year.as_str().parse().ok())
}

/// Parse pipe-separated genres
///
/// Example: "Action|Adventure|Sci-Fi" -> [Action, Adventure, Sci-Fi]
///
/// An empty field yields the "(no genres listed)" tag, the same value
/// MovieLens writes for such movies.
pub fn parse_genres(s: &str) -> Vec<Genre> {
    let genres: Vec<Genre> = s
        .split('|')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(Genre::from)
        .collect();

    if genres.is_empty() {
        vec![Genre::none_listed()]
    } else {
        genres
    }
}
