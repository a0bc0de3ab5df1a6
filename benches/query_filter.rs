//! Benchmarks for the query filter pipeline
//!
//! Measures the genre/country/avg_vote narrowing over synthetic stores of
//! increasing size. The pipeline is the only per-request work the service
//! does, so this is the hot path.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use movie_web::store::{Movie, MovieQuery};

const GENRES: &[&str] = &[
    "Action, Adventure",
    "Comedy",
    "Comedy, Romance",
    "Drama",
    "Horror, Thriller",
    "Sci-Fi",
];

const COUNTRIES: &[&str] = &["USA", "UK, USA", "France", "Italy", "Japan", "Germany"];

fn synthetic_movies(count: usize) -> Vec<Movie> {
    (0..count)
        .map(|i| Movie {
            genre: GENRES[i % GENRES.len()].to_string(),
            country: COUNTRIES[i % COUNTRIES.len()].to_string(),
            avg_vote: 1.0 + (i % 90) as f64 / 10.0,
            extra: serde_json::Map::new(),
        })
        .collect()
}

fn bench_single_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("genre_filter");

    for size in [100, 1_000, 10_000] {
        let movies = synthetic_movies(size);
        let query = MovieQuery {
            genre: Some("comedy".to_string()),
            ..Default::default()
        };

        group.bench_with_input(BenchmarkId::from_parameter(size), &movies, |b, movies| {
            b.iter(|| {
                let matches = query.apply(black_box(movies)).unwrap();
                black_box(matches.len())
            });
        });
    }

    group.finish();
}

fn bench_combined_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("combined_filters");

    for size in [100, 1_000, 10_000] {
        let movies = synthetic_movies(size);
        let query = MovieQuery {
            genre: Some("comedy".to_string()),
            country: Some("usa".to_string()),
            avg_vote: Some("7".to_string()),
        };

        group.bench_with_input(BenchmarkId::from_parameter(size), &movies, |b, movies| {
            b.iter(|| {
                let matches = query.apply(black_box(movies)).unwrap();
                black_box(matches.len())
            });
        });
    }

    group.finish();
}

fn bench_query_parsing(c: &mut Criterion) {
    c.bench_function("query_parsing", |b| {
        b.iter(|| {
            MovieQuery::from_query_str(black_box(
                "genre=comedy&country=new%20zealand&avg_vote=7.5",
            ))
        });
    });
}

criterion_group!(
    benches,
    bench_single_filter,
    bench_combined_filters,
    bench_query_parsing
);
criterion_main!(benches);
