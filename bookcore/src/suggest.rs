use crate::catalog::read_catalog;
use crate::error::{Error, Result};
use crate::vectorizer::{cosine, SparseVec, Vectorizer};
use std::path::Path;

/// Catalog similarity index: a fixed set of titles, their TF-IDF vectors,
/// and the feature space they were fitted in.
///
/// Built once at process start and never mutated, so any number of
/// request handlers can share it behind an `Arc` without locking.
pub struct SuggestIndex {
    titles: Vec<String>,
    vectors: Vec<SparseVec>,
    vectorizer: Vectorizer,
}

impl SuggestIndex {
    /// Build the index from a catalog CSV: rows without a title are
    /// dropped, the feature space (unigrams + bigrams, English stopwords
    /// removed) is fitted on the surviving titles, and one item vector is
    /// retained per row.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let titles: Vec<String> = read_catalog(path)?
            .iter()
            .filter_map(|row| row.title().map(str::to_string))
            .collect();
        if titles.is_empty() {
            return Err(Error::data_load(path, "no rows with a non-empty title"));
        }
        let index = Self::from_titles(titles)?;
        tracing::info!(
            num_titles = index.len(),
            num_features = index.vectorizer.num_features(),
            "suggestion index built"
        );
        Ok(index)
    }

    /// Build the index from an in-memory title list (one item per entry,
    /// in catalog row order).
    pub fn from_titles(titles: Vec<String>) -> Result<Self> {
        if titles.is_empty() {
            return Err(Error::InvalidArgument("title list is empty".into()));
        }
        let vectorizer = Vectorizer::fit(&titles, 2, None);
        let vectors = titles.iter().map(|t| vectorizer.transform(t)).collect();
        Ok(Self { titles, vectors, vectorizer })
    }

    /// Return up to `top_n` catalog titles ranked by cosine similarity to
    /// the query, highest first, ties broken by catalog row order.
    ///
    /// An empty or whitespace-only query yields an empty result without
    /// touching the feature space. A query whose terms are all out of
    /// vocabulary scores zero everywhere, so the tie-break returns the
    /// first `top_n` rows. `top_n` must be positive.
    pub fn suggest(&self, query: &str, top_n: usize) -> Result<Vec<String>> {
        if top_n == 0 {
            return Err(Error::InvalidArgument("top_n must be positive".into()));
        }
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let query_vec = self.vectorizer.transform(query);
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .map(|item| cosine(&query_vec, item))
            .enumerate()
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        scored.truncate(top_n);

        Ok(scored.into_iter().map(|(i, _)| self.titles[i].clone()).collect())
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_index() -> SuggestIndex {
        SuggestIndex::from_titles(vec![
            "Harry Potter and the Sorcerer's Stone".into(),
            "Harry Potter and the Chamber of Secrets".into(),
            "The Hobbit".into(),
        ])
        .unwrap()
    }

    #[test]
    fn ranks_matching_titles_first() {
        let index = tiny_index();
        let got = index.suggest("Harry Potter", 2).unwrap();
        assert_eq!(
            got,
            vec![
                "Harry Potter and the Sorcerer's Stone".to_string(),
                "Harry Potter and the Chamber of Secrets".to_string(),
            ]
        );
    }

    #[test]
    fn exact_title_is_its_own_best_match() {
        let index = tiny_index();
        let got = index.suggest("The Hobbit", 1).unwrap();
        assert_eq!(got, vec!["The Hobbit".to_string()]);
    }

    #[test]
    fn empty_query_yields_empty_result() {
        let index = tiny_index();
        assert!(index.suggest("", 5).unwrap().is_empty());
        assert!(index.suggest("   \t", 5).unwrap().is_empty());
    }

    #[test]
    fn zero_top_n_is_invalid() {
        let index = tiny_index();
        assert!(matches!(
            index.suggest("Hobbit", 0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn top_n_larger_than_catalog_returns_everything() {
        let index = tiny_index();
        let got = index.suggest("Hobbit", 50).unwrap();
        assert_eq!(got.len(), index.len());
        assert_eq!(got[0], "The Hobbit");
    }

    #[test]
    fn out_of_vocabulary_query_falls_back_to_row_order() {
        let index = tiny_index();
        let got = index.suggest("zzzz qqqq", 2).unwrap();
        assert_eq!(
            got,
            vec![
                "Harry Potter and the Sorcerer's Stone".to_string(),
                "Harry Potter and the Chamber of Secrets".to_string(),
            ]
        );
    }

    #[test]
    fn repeated_queries_are_deterministic() {
        let index = tiny_index();
        let a = index.suggest("secrets of the chamber", 3).unwrap();
        let b = index.suggest("secrets of the chamber", 3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_title_list_is_rejected() {
        assert!(SuggestIndex::from_titles(Vec::new()).is_err());
    }
}
