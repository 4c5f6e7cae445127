use crate::vectorizer::SparseVector;
use crate::DocId;

/// Score every document against `query` and return at most `k` `(doc_id, score)` pairs,
/// best first. Equal scores keep catalog order.
pub fn rank(query: &SparseVector, docs: &[SparseVector], k: usize) -> Vec<(DocId, f32)> {
    let mut scored = score_all(query, docs);
    // stable: ties stay in insertion order
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);
    scored
}

/// Cosine similarity per document, in catalog order. Both sides are pre-normalized,
/// so this is the dot product, clamped to [0, 1].
pub fn score_all(query: &SparseVector, docs: &[SparseVector]) -> Vec<(DocId, f32)> {
    docs.iter()
        .enumerate()
        .map(|(i, doc)| {
            let score = if query.is_zero() { 0.0 } else { query.dot(doc).clamp(0.0, 1.0) };
            (i as DocId, score)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::Vectorizer;

    #[test]
    fn ranks_descending_with_stable_ties() {
        let (v, docs) = Vectorizer::fit_transform(["sales manager", "java developer", "sales manager"]);
        let q = v.transform("sales");
        let ranked = rank(&q, &docs, 3);
        assert_eq!(ranked.iter().map(|(d, _)| *d).collect::<Vec<_>>(), vec![0, 2, 1]);
        assert_eq!(ranked[0].1, ranked[1].1);
        assert_eq!(ranked[2].1, 0.0);
    }

    #[test]
    fn k_larger_than_catalog_returns_all() {
        let (v, docs) = Vectorizer::fit_transform(["a java", "b python"]);
        assert_eq!(rank(&v.transform("java"), &docs, 50).len(), 2);
        assert_eq!(rank(&v.transform("java"), &docs, 1).len(), 1);
    }

    #[test]
    fn zero_query_falls_back_to_catalog_order() {
        let (_, docs) = Vectorizer::fit_transform(["java", "python", "rust"]);
        let ranked = rank(&SparseVector::default(), &docs, 2);
        assert_eq!(ranked, vec![(0, 0.0), (1, 0.0)]);
    }
}
