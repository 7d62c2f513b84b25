use crate::tokenizer::{ngrams, tokenize};
use crate::TermId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sparse L2-normalized feature vector, entries sorted by term id.
pub type SparseVec = Vec<(TermId, f32)>;

/// A fitted TF-IDF feature space: vocabulary plus per-term IDF weights.
///
/// The space is built once by [`Vectorizer::fit`] and is immutable after
/// that; every vector compared against another must come from the same
/// fitted instance, otherwise dimensions do not line up.
#[derive(Debug, Serialize, Deserialize)]
pub struct Vectorizer {
    vocabulary: HashMap<String, TermId>,
    idf: Vec<f32>,
    ngram_max: usize,
}

impl Vectorizer {
    /// Build the feature space from a document collection.
    ///
    /// Terms are n-grams for n in 1..=ngram_max over the tokenized text.
    /// When `max_features` is set, only the highest-document-frequency
    /// terms are kept, ties broken by term order. Term ids are assigned in
    /// lexicographic term order so fitting is deterministic.
    pub fn fit<S: AsRef<str>>(docs: &[S], ngram_max: usize, max_features: Option<usize>) -> Self {
        let mut df: HashMap<String, u32> = HashMap::new();
        for doc in docs {
            let tokens = tokenize(doc.as_ref());
            let mut seen: Vec<String> = ngrams(&tokens, ngram_max);
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        let mut terms: Vec<(String, u32)> = df.into_iter().collect();
        if let Some(cap) = max_features {
            terms.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            terms.truncate(cap);
        }
        terms.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        let n = docs.len() as f32;
        let mut vocabulary = HashMap::with_capacity(terms.len());
        let mut idf = Vec::with_capacity(terms.len());
        for (term_id, (term, df_t)) in terms.into_iter().enumerate() {
            vocabulary.insert(term, term_id as TermId);
            idf.push(((1.0 + n) / (1.0 + df_t as f32)).ln() + 1.0);
        }

        Self { vocabulary, idf, ngram_max }
    }

    /// Map a text into the fitted space: raw term frequency times IDF,
    /// L2-normalized. Out-of-vocabulary terms are ignored, so a fully
    /// unmatched text yields an empty (all-zero) vector.
    pub fn transform(&self, text: &str) -> SparseVec {
        let tokens = tokenize(text);
        let mut tf: HashMap<TermId, f32> = HashMap::new();
        for term in ngrams(&tokens, self.ngram_max) {
            if let Some(&tid) = self.vocabulary.get(&term) {
                *tf.entry(tid).or_insert(0.0) += 1.0;
            }
        }

        let mut vec: SparseVec = tf
            .into_iter()
            .map(|(tid, count)| (tid, count * self.idf[tid as usize]))
            .collect();
        vec.sort_unstable_by_key(|(tid, _)| *tid);

        let norm = vec.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in vec.iter_mut() {
                *w /= norm;
            }
        }
        vec
    }

    pub fn num_features(&self) -> usize {
        self.idf.len()
    }
}

/// Dot product of two sorted sparse vectors. Both sides are L2-normalized
/// by `transform`, so this is their cosine similarity.
pub fn cosine(a: &SparseVec, b: &SparseVec) -> f32 {
    let (mut i, mut j) = (0, 0);
    let mut dot = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot
}
