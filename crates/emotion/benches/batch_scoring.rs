//! Benchmarks for mood vector scoring
//!
//! Run with: cargo bench --package emotion
//!
//! Uses a synthetic batch so the benchmark does not depend on a dataset
//! being present on disk.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::MovieRecord;
use emotion::EmotionEngine;

const GENRES: [&str; 6] = [
    "Adventure, Action, Fantasy",
    "Drama|Romance|History",
    "Comedy, Family",
    "Thriller, Mystery, Crime",
    "Science Fiction, Adventure",
    "Documentary",
];

fn synthetic_records(n: usize) -> Vec<MovieRecord> {
    (0..n)
        .map(|i| MovieRecord {
            title: Some(format!("Movie {i}")),
            overview: Some(
                "A grieving detective uncovers a secret conspiracy while falling in love \
                 on a dangerous journey through a magical kingdom."
                    .to_string(),
            ),
            tagline: Some("Some memories never fade".to_string()),
            genres: Some(GENRES[i % GENRES.len()].to_string()),
            keywords: Some("investigation, love, sword fight, quest, friendship".to_string()),
            runtime: Some(70.0 + (i % 110) as f64),
            vote_average: Some(5.0 + (i % 50) as f64 / 10.0),
            vote_count: Some((i as u64 * 37) % 20_000),
            popularity: Some((i % 180) as f64),
            release_date: Some(format!("{}-06-01", 1930 + i % 95)),
            adult: Some(false),
        })
        .collect()
}

fn bench_score_one(c: &mut Criterion) {
    let engine = EmotionEngine::with_default_rules().expect("Failed to compile rules");
    let records = synthetic_records(1);

    c.bench_function("score_one", |b| {
        b.iter(|| black_box(engine.score_one(black_box(&records[0]))))
    });
}

fn bench_score_many(c: &mut Criterion) {
    let engine = EmotionEngine::with_default_rules().expect("Failed to compile rules");
    let records = synthetic_records(10_000);

    c.bench_function("score_many_10k", |b| {
        b.iter(|| black_box(engine.score_many(black_box(&records))))
    });
}

fn bench_compile_rules(c: &mut Criterion) {
    c.bench_function("compile_rules", |b| {
        b.iter(|| black_box(EmotionEngine::with_default_rules().expect("Failed to compile rules")))
    });
}

criterion_group!(benches, bench_score_one, bench_score_many, bench_compile_rules);
criterion_main!(benches);
