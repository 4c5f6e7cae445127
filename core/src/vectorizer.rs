use crate::tokenizer::tokenize;
use crate::TermId;
use std::collections::{HashMap, HashSet};

/// Term -> index mapping, assigned in first-seen order over the catalog.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    dictionary: HashMap<String, TermId>,
    terms: Vec<String>,
}

impl Vocabulary {
    pub fn len(&self) -> usize { self.terms.len() }
    pub fn is_empty(&self) -> bool { self.terms.is_empty() }
    pub fn get(&self, term: &str) -> Option<TermId> { self.dictionary.get(term).copied() }
    pub fn term(&self, id: TermId) -> Option<&str> { self.terms.get(id as usize).map(String::as_str) }
    pub fn terms(&self) -> &[String] { &self.terms }

    fn intern(&mut self, term: &str) -> TermId {
        if let Some(&id) = self.dictionary.get(term) {
            return id;
        }
        let id = self.terms.len() as TermId;
        self.dictionary.insert(term.to_string(), id);
        self.terms.push(term.to_string());
        id
    }
}

/// Sparse, L2-normalized (or all-zero) weight vector, entries sorted by term id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(TermId, f32)>,
}

impl SparseVector {
    fn from_weights(weights: HashMap<TermId, f32>) -> Self {
        let mut entries: Vec<(TermId, f32)> = weights.into_iter().filter(|(_, w)| *w > 0.0).collect();
        entries.sort_by_key(|(tid, _)| *tid);
        let norm = entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in entries.iter_mut() { *w /= norm; }
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[(TermId, f32)] { &self.entries }
    pub fn is_zero(&self) -> bool { self.entries.is_empty() }
    pub fn nnz(&self) -> usize { self.entries.len() }

    pub fn weight(&self, term: TermId) -> f32 {
        self.entries
            .binary_search_by_key(&term, |(tid, _)| *tid)
            .map(|i| self.entries[i].1)
            .unwrap_or(0.0)
    }

    /// Dot product over the intersection of non-zero dimensions.
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (a, b) = (&self.entries, &other.entries);
        let (mut i, mut j, mut sum) = (0, 0, 0.0f32);
        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a[i].1 * b[j].1;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// TF-IDF vectorizer fitted once over the catalog descriptions.
///
/// `tf = count / total tokens`, `idf = ln((1 + N) / (1 + df)) + 1`.
#[derive(Debug, Clone, Default)]
pub struct Vectorizer {
    vocabulary: Vocabulary,
    idf: Vec<f32>,
    num_docs: u32,
}

impl Vectorizer {
    /// Fit over `docs` and return the vectorizer together with one vector per doc, in input order.
    pub fn fit_transform<'a, I>(docs: I) -> (Self, Vec<SparseVector>)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut vocabulary = Vocabulary::default();
        let mut df: Vec<u32> = Vec::new();
        let mut doc_counts: Vec<(HashMap<TermId, u32>, usize)> = Vec::new();

        for text in docs {
            let tokens = tokenize(text);
            let total = tokens.len();
            let mut counts: HashMap<TermId, u32> = HashMap::new();
            let mut seen_in_doc: HashSet<TermId> = HashSet::new();
            for term in tokens {
                let tid = vocabulary.intern(&term);
                if df.len() <= tid as usize { df.resize(tid as usize + 1, 0); }
                *counts.entry(tid).or_insert(0) += 1;
                if seen_in_doc.insert(tid) {
                    df[tid as usize] += 1;
                }
            }
            doc_counts.push((counts, total));
        }

        let num_docs = doc_counts.len() as u32;
        let n = num_docs as f32;
        let idf = df.iter().map(|&d| ((1.0 + n) / (1.0 + d as f32)).ln() + 1.0).collect();
        let vectorizer = Self { vocabulary, idf, num_docs };
        let vectors = doc_counts
            .into_iter()
            .map(|(counts, total)| vectorizer.weigh(counts, total))
            .collect();
        tracing::debug!(num_docs, vocabulary = vectorizer.vocabulary.len(), "fitted tf-idf vectorizer");
        (vectorizer, vectors)
    }

    /// Vectorize text against the fitted vocabulary. Out-of-vocabulary terms are dropped;
    /// text with no known terms yields the zero vector.
    pub fn transform(&self, text: &str) -> SparseVector {
        let tokens = tokenize(text);
        let total = tokens.len();
        let mut counts: HashMap<TermId, u32> = HashMap::new();
        for term in tokens {
            if let Some(tid) = self.vocabulary.get(&term) {
                *counts.entry(tid).or_insert(0) += 1;
            }
        }
        self.weigh(counts, total)
    }

    fn weigh(&self, counts: HashMap<TermId, u32>, total: usize) -> SparseVector {
        if total == 0 {
            return SparseVector::default();
        }
        let weights = counts
            .into_iter()
            .map(|(tid, c)| (tid, (c as f32 / total as f32) * self.idf[tid as usize]))
            .collect();
        SparseVector::from_weights(weights)
    }

    pub fn vocabulary(&self) -> &Vocabulary { &self.vocabulary }
    pub fn num_docs(&self) -> u32 { self.num_docs }
    pub fn idf(&self, term: TermId) -> Option<f32> { self.idf.get(term as usize).copied() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool { (a - b).abs() < 1e-5 }

    #[test]
    fn vocabulary_is_first_seen_order() {
        let (v, _) = Vectorizer::fit_transform(["java test", "sales java manager"]);
        let terms: Vec<&str> = v.vocabulary().terms().iter().map(String::as_str).collect();
        assert_eq!(terms, vec!["java", "test", "sale", "manag"]);
        assert_eq!(v.vocabulary().get("java"), Some(0));
        assert_eq!(v.vocabulary().term(2), Some("sale"));
    }

    #[test]
    fn smoothed_idf_matches_formula() {
        let (v, _) = Vectorizer::fit_transform(["java test", "java sales"]);
        let java = v.vocabulary().get("java").unwrap();
        let test = v.vocabulary().get("test").unwrap();
        // present in every doc: ln(3/3) + 1
        assert!(approx(v.idf(java).unwrap(), 1.0));
        assert!(approx(v.idf(test).unwrap(), (3.0f32 / 2.0).ln() + 1.0));
    }

    #[test]
    fn doc_vectors_are_unit_length() {
        let (_, vecs) = Vectorizer::fit_transform(["java java test", "leadership for managers"]);
        for vec in &vecs {
            let norm: f32 = vec.entries().iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
            assert!(approx(norm, 1.0));
            assert!(approx(vec.dot(vec), 1.0));
        }
    }

    #[test]
    fn weights_follow_tf_times_idf_before_normalization() {
        let (v, vecs) = Vectorizer::fit_transform(["java java test", "test"]);
        let java = v.vocabulary().get("java").unwrap();
        let test = v.vocabulary().get("test").unwrap();
        let raw_java = (2.0 / 3.0) * v.idf(java).unwrap();
        let raw_test = (1.0 / 3.0) * v.idf(test).unwrap();
        let ratio = vecs[0].weight(java) / vecs[0].weight(test);
        assert!(approx(ratio, raw_java / raw_test));
    }

    #[test]
    fn unknown_terms_give_zero_vector() {
        let (v, _) = Vectorizer::fit_transform(["java test"]);
        assert!(v.transform("the a an of").is_zero());
        assert!(v.transform("kubernetes").is_zero());
        assert!(!v.transform("java kubernetes").is_zero());
    }

    #[test]
    fn dot_only_counts_shared_terms() {
        let (v, vecs) = Vectorizer::fit_transform(["java test", "leadership managers"]);
        let q = v.transform("java");
        assert!(q.dot(&vecs[0]) > 0.0);
        assert_eq!(q.dot(&vecs[1]), 0.0);
    }
}
