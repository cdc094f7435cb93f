//! Text rendering of the report sections.

use colored::Colorize;
use pipeline::{
    round_to, GroupStats, Overview, RaterStats, RaterSummary, ReleaseCount, Report,
    YearBreakdown,
};
use std::fmt::Display;

/// Print every section of the report
pub fn print_report(report: &Report) {
    print_overview(&report.overview);
    println!();
    print_genres(&report.genres, report.overview.unique_genres);
    println!();
    print_releases(&pipeline::top_release_years(&report.releases, 5));
    print_years(&report.years);
    println!();
    print_rater_summary(&report.raters);
}

pub fn print_overview(overview: &Overview) {
    println!("{}", "Raters and movies by the numbers".bold().blue());
    println!(
        "There are {} raters that have rated {} different movies.",
        overview.unique_raters.to_string().green(),
        overview.movies_rated.to_string().green()
    );
    println!(
        "{}{} ratings in total, {} movies listed, {} genres.",
        "• ".cyan(),
        overview.total_ratings,
        overview.total_movies,
        overview.unique_genres
    );
}

/// `unique_genres` counts tags across the whole movies table, which can
/// exceed the rows of `genres` when some movies were never rated
pub fn print_genres<K: Display>(genres: &[GroupStats<K>], unique_genres: usize) {
    println!("{}", "Ratings per genre".bold().blue());
    println!("{}", genre_count_line(unique_genres));
    print_group_table("genre", genres);
}

fn genre_count_line(unique_genres: usize) -> String {
    format!(
        "There are {} genres the movies can be categorized into.",
        unique_genres.to_string().green()
    )
}

pub fn print_years(years: &YearBreakdown) {
    println!("{}", "Ratings per release year".bold().blue());
    print_group_table("year", &years.by_year);

    if let Some(unknown) = &years.unknown_year {
        println!(
            "{}{} ratings are for movies without a known release year (avg {:.3}).",
            "• ".cyan(),
            unknown.num_of_ratings,
            unknown.avg_rating
        );
    }
}

pub fn print_releases(busiest: &[ReleaseCount]) {
    if busiest.is_empty() {
        return;
    }
    println!("{}", "Years with the most movies released".bold().blue());
    for (rank, count) in busiest.iter().enumerate() {
        println!(
            "{}. {} - {} movies",
            (rank + 1).to_string().green(),
            count.year,
            count.movies
        );
    }
    println!();
}

pub fn print_rater_summary(summary: &RaterSummary) {
    println!("{}", "About the raters".bold().blue());
    println!(
        "{}Highest average rating: {} (user {})",
        "• ".green(),
        summary.highest.avg_rating,
        summary.highest.user_id
    );
    println!(
        "{}Lowest average rating: {} (user {})",
        "• ".green(),
        summary.lowest.avg_rating,
        summary.lowest.user_id
    );
    println!(
        "{}Average rating overall: {}",
        "• ".green(),
        round_to(summary.overall_avg_rating, 3)
    );

    match summary.rating_count_correlation {
        Some(tau) => println!(
            "The correlation between average rating and the number of ratings is {}.",
            round_to(tau, 3).to_string().bold()
        ),
        None => println!(
            "The correlation between average rating and the number of ratings is undefined for this dataset."
        ),
    }
}

pub fn print_rater_table(title: &str, raters: &[RaterStats]) {
    println!();
    println!("{}", title.bold().blue());
    println!("{:>8} {:>10} {:>8}", "user", "avg", "ratings");
    for rater in raters {
        println!(
            "{:>8} {:>10.3} {:>8}",
            rater.user_id, rater.avg_rating, rater.num_of_ratings
        );
    }
}

fn print_group_table<K: Display>(label: &str, groups: &[GroupStats<K>]) {
    println!(
        "{:<20} {:>10} {:>14} {:>14}",
        label, "avg_rating", "var_of_ratings", "num_of_ratings"
    );
    for group in groups {
        println!(
            "{:<20} {:>10.3} {:>14} {:>14}",
            group.key.to_string(),
            group.stats.avg_rating,
            format_variance(group.stats.var_of_ratings),
            group.stats.num_of_ratings
        );
    }
}

fn format_variance(variance: Option<f64>) -> String {
    variance.map_or_else(|| "-".to_string(), |v| format!("{:.3}", v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_variance() {
        assert_eq!(format_variance(None), "-");
        assert_eq!(format_variance(Some(0.98765)), "0.988");
    }

    #[test]
    fn test_genre_count_line() {
        colored::control::set_override(false);
        assert_eq!(
            genre_count_line(20),
            "There are 20 genres the movies can be categorized into."
        );
    }
}
