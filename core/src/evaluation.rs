//! Offline retrieval metrics over a labelled set of queries.
//!
//! Relevance is judged by assessment name, the way hiring managers label the
//! expected assessments for a job description.

use crate::engine::{RecommendOptions, Recommender, DEFAULT_K};
use crate::error::EvaluationError;
use crate::Recommendation;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub query: String,
    pub relevant_assessments: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvaluationSummary {
    pub mean_recall: f64,
    pub mean_average_precision: f64,
    pub k: usize,
    pub num_cases: usize,
}

pub fn load_test_cases<P: AsRef<Path>>(path: P) -> Result<Vec<TestCase>, EvaluationError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| EvaluationError::Io { path: path.to_path_buf(), source })?;
    Ok(serde_json::from_str(&text)?)
}

fn is_relevant(rec: &Recommendation<'_>, relevant: &[String]) -> bool {
    relevant.iter().any(|name| *name == rec.assessment.name)
}

/// Fraction of the relevant assessments that appear in the top `k`.
pub fn recall_at_k(recs: &[Recommendation<'_>], relevant: &[String], k: usize) -> f64 {
    if relevant.is_empty() {
        return 1.0;
    }
    let hits = recs.iter().take(k).filter(|r| is_relevant(r, relevant)).count();
    hits as f64 / relevant.len() as f64
}

/// Average of precision@i over each relevant hit within the top `k`,
/// normalized by `min(|relevant|, k)`.
pub fn average_precision_at_k(recs: &[Recommendation<'_>], relevant: &[String], k: usize) -> f64 {
    if relevant.is_empty() {
        return 1.0;
    }
    let mut found = 0usize;
    let mut precision_sum = 0.0;
    for (i, rec) in recs.iter().take(k).enumerate() {
        if is_relevant(rec, relevant) {
            found += 1;
            precision_sum += found as f64 / (i + 1) as f64;
        }
    }
    if found == 0 {
        return 0.0;
    }
    precision_sum / relevant.len().min(k) as f64
}

/// Run every case the way it is served (default result count, time budget read from
/// the query) and average recall@k and AP@k.
pub fn evaluate(recommender: &Recommender, cases: &[TestCase], k: usize) -> Result<EvaluationSummary, EvaluationError> {
    let mut recall_sum = 0.0;
    let mut ap_sum = 0.0;
    for (index, case) in cases.iter().enumerate() {
        let recs = recommender
            .recommend_with(&case.query, &RecommendOptions::infer(&case.query, DEFAULT_K))
            .map_err(|source| EvaluationError::InvalidCase { index, source })?;
        let recall = recall_at_k(&recs, &case.relevant_assessments, k);
        let ap = average_precision_at_k(&recs, &case.relevant_assessments, k);
        tracing::debug!(index, recall, ap, "evaluated case");
        recall_sum += recall;
        ap_sum += ap;
    }
    let n = cases.len();
    let mean = |sum: f64| if n == 0 { 0.0 } else { sum / n as f64 };
    Ok(EvaluationSummary { mean_recall: mean(recall_sum), mean_average_precision: mean(ap_sum), k, num_cases: n })
}
