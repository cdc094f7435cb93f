mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use data_loader::{Dataset, MOVIES_FILE, RATINGS_FILE};
use pipeline::{
    build_report, genre_stats, join_movies, overview, rater_stats, release_counts, sort_groups,
    summarize_rater_table, top_release_years, unique_genres, year_stats, GroupOrder, RaterStats,
    ReleaseCount, YearBreakdown,
};
use serde_json::json;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// movielens-report - Exploratory analysis of MovieLens ratings
#[derive(Parser)]
#[command(name = "movielens-report")]
#[command(about = "Rating statistics per genre, per release year and per rater", long_about = None)]
struct Cli {
    /// Path to MovieLens dataset directory (holding ratings.csv and movies.csv)
    #[arg(short, long, default_value = "data/ml-latest-small")]
    data_dir: PathBuf,

    /// Ratings file, overrides <DATA_DIR>/ratings.csv
    #[arg(long)]
    ratings: Option<PathBuf>,

    /// Movies file, overrides <DATA_DIR>/movies.csv
    #[arg(long)]
    movies: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Section to show; the full report when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum GenreSort {
    /// Alphabetical by genre tag
    Name,
    /// Most ratings first
    Count,
    /// Highest average rating first
    Rating,
}

impl From<GenreSort> for GroupOrder {
    fn from(sort: GenreSort) -> Self {
        match sort {
            GenreSort::Name => GroupOrder::Key,
            GenreSort::Count => GroupOrder::Count,
            GenreSort::Rating => GroupOrder::AvgRating,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show every section of the report
    Report,

    /// Count raters, rated movies and genres
    Overview,

    /// Average, variance and number of ratings per genre
    Genres {
        /// Row order of the genre table
        #[arg(long, value_enum, default_value_t = GenreSort::Name)]
        sort: GenreSort,
    },

    /// Average, variance and number of ratings per release year
    Years {
        /// Only show years from this one on
        #[arg(long)]
        since: Option<u16>,

        /// Number of busiest release years to list
        #[arg(long, default_value = "5")]
        releases: usize,
    },

    /// Highest and lowest average raters and the rating-count correlation
    Raters {
        /// Number of raters to list at each end
        #[arg(long, default_value = "5")]
        top: usize,
    },
}

fn main() -> Result<()> {
    // Initialize tracing; logs go to stderr so stdout stays clean for --format json
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let ratings_path = cli
        .ratings
        .clone()
        .unwrap_or_else(|| cli.data_dir.join(RATINGS_FILE));
    let movies_path = cli
        .movies
        .clone()
        .unwrap_or_else(|| cli.data_dir.join(MOVIES_FILE));

    let start = Instant::now();
    let dataset = Dataset::load(&ratings_path, &movies_path).with_context(|| {
        format!(
            "Failed to load MovieLens dataset ({}, {})",
            ratings_path.display(),
            movies_path.display()
        )
    })?;
    info!("Loaded dataset in {:?}", start.elapsed());

    // Dispatch to appropriate command handler
    match cli.command.unwrap_or(Commands::Report) {
        Commands::Report => handle_report(&dataset, cli.format)?,
        Commands::Overview => handle_overview(&dataset, cli.format)?,
        Commands::Genres { sort } => handle_genres(&dataset, sort, cli.format)?,
        Commands::Years { since, releases } => {
            handle_years(&dataset, since, releases, cli.format)?
        }
        Commands::Raters { top } => handle_raters(&dataset, top, cli.format)?,
    }

    Ok(())
}

/// Handle the 'report' command
fn handle_report(dataset: &Dataset, format: Format) -> Result<()> {
    let report = build_report(dataset).context("Failed to build report")?;

    match format {
        Format::Json => print_json(&report)?,
        Format::Text => render::print_report(&report),
    }
    Ok(())
}

/// Handle the 'overview' command
fn handle_overview(dataset: &Dataset, format: Format) -> Result<()> {
    let overview = overview(dataset);

    match format {
        Format::Json => print_json(&overview)?,
        Format::Text => render::print_overview(&overview),
    }
    Ok(())
}

/// Handle the 'genres' command
fn handle_genres(dataset: &Dataset, sort: GenreSort, format: Format) -> Result<()> {
    let joined = join_movies(dataset.ratings(), dataset.movies());
    let mut genres = genre_stats(&joined);
    sort_groups(&mut genres, sort.into());

    match format {
        Format::Json => print_json(&genres)?,
        Format::Text => render::print_genres(&genres, unique_genres(dataset.movies())),
    }
    Ok(())
}

/// Handle the 'years' command
fn handle_years(
    dataset: &Dataset,
    since: Option<u16>,
    releases: usize,
    format: Format,
) -> Result<()> {
    let joined = join_movies(dataset.ratings(), dataset.movies());
    let mut years = year_stats(&joined);
    let mut counts = release_counts(dataset.movies());
    if let Some(since) = since {
        retain_since(&mut years, &mut counts, since);
    }
    let busiest = top_release_years(&counts, releases);

    match format {
        Format::Json => print_json(&json!({
            "years": years,
            "busiest_release_years": busiest,
        }))?,
        Format::Text => {
            render::print_releases(&busiest);
            render::print_years(&years);
        }
    }
    Ok(())
}

/// Handle the 'raters' command
fn handle_raters(dataset: &Dataset, top: usize, format: Format) -> Result<()> {
    let raters = rater_stats(dataset.ratings());
    let summary = summarize_rater_table(&raters, dataset.ratings())
        .context("Failed to summarize raters")?;
    let (highest, lowest) = rater_ends(&raters, top);

    match format {
        Format::Json => print_json(&json!({
            "summary": summary,
            "highest": highest,
            "lowest": lowest,
        }))?,
        Format::Text => {
            render::print_rater_summary(&summary);
            render::print_rater_table("Highest average raters", &highest);
            render::print_rater_table("Lowest average raters", &lowest);
        }
    }
    Ok(())
}

/// Drop keyed years and release counts before `since`; ratings without a
/// known year stay in `unknown_year`
fn retain_since(years: &mut YearBreakdown, counts: &mut Vec<ReleaseCount>, since: u16) {
    years.by_year.retain(|group| group.key >= since);
    counts.retain(|count| count.year >= since);
}

/// Up to `top` raters from each end of a table ordered highest average first.
/// The lowest end is listed lowest first.
fn rater_ends(raters: &[RaterStats], top: usize) -> (Vec<RaterStats>, Vec<RaterStats>) {
    let highest = raters.iter().take(top).copied().collect();
    let lowest = raters.iter().rev().take(top).copied().collect();
    (highest, lowest)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", text);
    Ok(())
}
