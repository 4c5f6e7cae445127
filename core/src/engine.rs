use crate::catalog::Catalog;
use crate::duration;
use crate::error::{CatalogLoadError, InvalidInputError};
use crate::ranker;
use crate::vectorizer::{SparseVector, Vectorizer};
use crate::Recommendation;
use std::path::Path;

pub const DEFAULT_K: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendOptions {
    pub k: usize,
    /// Skip assessments longer than this many minutes.
    pub max_duration_minutes: Option<u32>,
}

impl Default for RecommendOptions {
    fn default() -> Self { Self { k: DEFAULT_K, max_duration_minutes: None } }
}

impl RecommendOptions {
    pub fn new(k: usize) -> Self { Self { k, ..Self::default() } }

    /// Pick up a time budget written in the query itself ("within 40 minutes").
    pub fn infer(text: &str, k: usize) -> Self {
        Self { k, max_duration_minutes: duration::extract_limit(text) }
    }
}

/// Catalog plus its precomputed TF-IDF vectors. Built once, read-only afterwards;
/// share it across request handlers behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Catalog,
    vectorizer: Vectorizer,
    doc_vectors: Vec<SparseVector>,
}

impl Recommender {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogLoadError> {
        Ok(Self::new(Catalog::load(path)?))
    }

    pub fn new(catalog: Catalog) -> Self {
        let (vectorizer, doc_vectors) = Vectorizer::fit_transform(catalog.iter().map(|a| a.description.as_str()));
        tracing::info!(
            assessments = catalog.len(),
            vocabulary = vectorizer.vocabulary().len(),
            "recommender ready"
        );
        Self { catalog, vectorizer, doc_vectors }
    }

    pub fn catalog(&self) -> &Catalog { &self.catalog }
    pub fn vectorizer(&self) -> &Vectorizer { &self.vectorizer }

    /// Top-`k` assessments for `text`, best first. A query with no known terms is not an
    /// error: every score is 0 and the result is the first `k` entries in catalog order.
    pub fn recommend(&self, text: &str, k: usize) -> Result<Vec<Recommendation<'_>>, InvalidInputError> {
        self.recommend_with(text, &RecommendOptions::new(k))
    }

    pub fn recommend_with(&self, text: &str, opts: &RecommendOptions) -> Result<Vec<Recommendation<'_>>, InvalidInputError> {
        let text = validate(text, opts.k)?;
        let query = self.vectorizer.transform(text);

        let recs = match opts.max_duration_minutes {
            None => ranker::rank(&query, &self.doc_vectors, opts.k)
                .into_iter()
                .filter_map(|(doc_id, score)| self.to_recommendation(doc_id, score))
                .collect(),
            Some(limit) => self.rank_within(&query, opts.k, limit),
        };
        tracing::debug!(k = opts.k, hits = recs.len(), no_match = query.is_zero(), "recommend");
        Ok(recs)
    }

    /// Whether `text` contains at least one vocabulary term.
    pub fn has_signal(&self, text: &str) -> bool {
        !self.vectorizer.transform(text).is_zero()
    }

    // Walk the full ranking, skipping assessments over the time budget. If nothing fits,
    // the single best assessment is returned regardless.
    fn rank_within(&self, query: &SparseVector, k: usize, limit: u32) -> Vec<Recommendation<'_>> {
        let ranked = ranker::rank(query, &self.doc_vectors, self.doc_vectors.len());
        let mut recs: Vec<Recommendation<'_>> = ranked
            .iter()
            .filter_map(|&(doc_id, score)| self.to_recommendation(doc_id, score))
            .filter(|r| duration::fits(r.assessment, limit))
            .take(k)
            .collect();
        if recs.is_empty() {
            if let Some(&(doc_id, score)) = ranked.first() {
                recs.extend(self.to_recommendation(doc_id, score));
            }
        }
        recs
    }

    fn to_recommendation(&self, doc_id: crate::DocId, score: f32) -> Option<Recommendation<'_>> {
        self.catalog.doc(doc_id).map(|assessment| Recommendation { assessment, score })
    }
}

fn validate(text: &str, k: usize) -> Result<&str, InvalidInputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InvalidInputError::EmptyText);
    }
    if k == 0 {
        return Err(InvalidInputError::NonPositiveK);
    }
    Ok(trimmed)
}
