use crate::tokenizer::is_stopword;
use std::collections::{HashMap, HashSet};
use unicode_normalization::UnicodeNormalization;

/// Unsupervised keyword extraction over a single text, no corpus state.
///
/// RAKE-style: candidate phrases are the runs of content words between
/// stopwords and punctuation; each word is scored by degree/frequency over
/// the candidate set and a phrase scores the sum of its word scores.
pub struct KeywordExtractor {
    max_phrase_words: usize,
    top_k: usize,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordExtractor {
    pub fn new() -> Self {
        Self { max_phrase_words: 3, top_k: 10 }
    }

    /// Cap candidate phrases at `words` words; longer runs are chunked.
    /// With 1, every content word is its own candidate.
    pub fn with_max_phrase_words(mut self, words: usize) -> Self {
        self.max_phrase_words = words.max(1);
        self
    }

    /// Maximum number of keywords returned.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Extract up to `top_k` keywords, highest score first, ties broken by
    /// first occurrence in the text. Empty input yields an empty list.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let phrases = self.candidate_phrases(text);
        if phrases.is_empty() {
            return Vec::new();
        }

        // Degree/frequency word scores over the candidate set.
        let mut freq: HashMap<&str, f32> = HashMap::new();
        let mut degree: HashMap<&str, f32> = HashMap::new();
        for phrase in &phrases {
            for word in phrase.iter().map(String::as_str) {
                *freq.entry(word).or_insert(0.0) += 1.0;
                *degree.entry(word).or_insert(0.0) += phrase.len() as f32;
            }
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut ranked: Vec<(String, f32, usize)> = Vec::new();
        for phrase in &phrases {
            let joined = phrase.join(" ");
            if !seen.insert(joined.clone()) {
                continue;
            }
            let score: f32 = phrase
                .iter()
                .map(|w| degree[w.as_str()] / freq[w.as_str()])
                .sum();
            ranked.push((joined, score, ranked.len()));
        }

        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.2.cmp(&b.2)));
        ranked.truncate(self.top_k);
        ranked.into_iter().map(|(phrase, _, _)| phrase).collect()
    }

    /// Split the text into runs of content words, breaking at stopwords,
    /// short tokens, and any punctuation between words.
    fn candidate_phrases(&self, text: &str) -> Vec<Vec<String>> {
        let normalized = text.nfkc().collect::<String>().to_lowercase();
        let mut phrases: Vec<Vec<String>> = Vec::new();
        let mut current: Vec<String> = Vec::new();

        for segment in normalized.split(|c: char| !(c.is_alphanumeric() || c == '\'')) {
            let word = segment.trim_matches('\'');
            let boundary = word.len() < 2 || is_stopword(word);
            if boundary || current.len() == self.max_phrase_words {
                if !current.is_empty() {
                    phrases.push(std::mem::take(&mut current));
                }
            }
            if !boundary {
                current.push(word.to_string());
            }
        }
        if !current.is_empty() {
            phrases.push(current);
        }
        phrases
    }
}
