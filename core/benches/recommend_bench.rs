use criterion::{criterion_group, criterion_main, Criterion};
use recommender_core::tokenizer::tokenize;
use recommender_core::{Catalog, Recommender};

const SAMPLE: &str = include_str!("../../data/assessments.json");
const QUERY: &str = "I am hiring for Java developers who can also collaborate effectively with my business teams. \
                     Looking for an assessment that can be completed in 40 minutes.";

fn bench_tokenize(c: &mut Criterion) {
    c.bench_function("tokenize_query", |b| b.iter(|| tokenize(QUERY)));
}

fn bench_recommend(c: &mut Criterion) {
    let engine = Recommender::new(Catalog::from_json_str(SAMPLE).expect("sample catalog"));
    c.bench_function("recommend_top10", |b| b.iter(|| engine.recommend(QUERY, 10).map(|r| r.len())));
    c.bench_function("build_recommender", |b| {
        b.iter(|| Recommender::new(Catalog::from_json_str(SAMPLE).expect("sample catalog")))
    });
}

criterion_group!(benches, bench_tokenize, bench_recommend);
criterion_main!(benches);
