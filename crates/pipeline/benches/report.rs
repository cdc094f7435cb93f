//! Benchmarks for the report pipeline
//!
//! Run with: cargo bench --package pipeline
//!
//! Uses a synthetic dataset about the size of ml-latest-small
//! (600 raters, 9,000 movies, 100,000 ratings).

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{Dataset, Genre, Movie, Rating};
use pipeline::{build_report, genre_stats, join_movies, rater_stats, year_stats};

const GENRES: &[&str] = &[
    "Action", "Adventure", "Animation", "Children", "Comedy", "Crime", "Documentary",
    "Drama", "Fantasy", "Film-Noir", "Horror", "IMAX", "Musical", "Mystery", "Romance",
    "Sci-Fi", "Thriller", "War", "Western",
];

/// Small deterministic generator so runs are comparable
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

fn synthetic_dataset() -> Dataset {
    let mut rng = Lcg(42);

    let movies: Vec<Movie> = (1..=9_000u32)
        .map(|id| {
            let genre_count = 1 + (rng.next() % 3) as usize;
            let genres = (0..genre_count)
                .map(|_| Genre::from(GENRES[(rng.next() as usize) % GENRES.len()]))
                .collect();
            let year = (id % 50 != 0).then(|| 1920 + (rng.next() % 100) as u16);
            Movie {
                id,
                title: format!("Movie {id}"),
                genres,
                year,
            }
        })
        .collect();

    let mut ratings = Vec::with_capacity(100_000);
    for user_id in 1..=600u32 {
        let offset = (rng.next() % 9_000) as u32;
        let count = 20 + (rng.next() % 300) as u32;
        for i in 0..count.min(9_000) {
            ratings.push(Rating {
                user_id,
                movie_id: 1 + (offset + i * 7) % 9_000,
                rating: 0.5 * (1 + rng.next() % 10) as f64,
                timestamp: 964_982_703 + i as i64,
            });
        }
    }

    Dataset::from_parts(ratings, movies).expect("synthetic dataset is valid")
}

fn bench_stages(c: &mut Criterion) {
    let dataset = synthetic_dataset();

    c.bench_function("join_movies", |b| {
        b.iter(|| black_box(join_movies(dataset.ratings(), dataset.movies())))
    });

    let joined = join_movies(dataset.ratings(), dataset.movies());

    c.bench_function("genre_stats", |b| {
        b.iter(|| black_box(genre_stats(black_box(&joined))))
    });

    c.bench_function("year_stats", |b| {
        b.iter(|| black_box(year_stats(black_box(&joined))))
    });

    c.bench_function("rater_stats", |b| {
        b.iter(|| black_box(rater_stats(black_box(dataset.ratings()))))
    });
}

fn bench_build_report(c: &mut Criterion) {
    let dataset = synthetic_dataset();

    c.bench_function("build_report", |b| {
        b.iter(|| black_box(build_report(black_box(&dataset)).unwrap()))
    });
}

criterion_group!(benches, bench_stages, bench_build_report);
criterion_main!(benches);
