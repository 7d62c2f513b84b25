//! Core library for the book ML service: TF-IDF feature space, catalog
//! title suggestion, genre classification, keyword extraction, and the
//! artifact persistence that ties the offline trainer to the server.

pub mod catalog;
pub mod error;
pub mod genre;
pub mod persist;
pub mod suggest;
pub mod tags;
pub mod tokenizer;
pub mod vectorizer;

pub type TermId = u32;

pub use error::{Error, Result};
pub use genre::{GenreModel, GenrePredictor};
pub use suggest::SuggestIndex;
pub use tags::KeywordExtractor;
pub use vectorizer::{cosine, SparseVec, Vectorizer};
