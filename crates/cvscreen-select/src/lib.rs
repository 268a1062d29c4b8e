//! Scoring pipeline: cosine scoring of embeddings and the batch selector
//! that applies it to a directory of resumes.
pub mod selector;
pub mod similarity;

pub use selector::{select_applicants, SelectionPolicy, Selector};
pub use similarity::{cosine_similarity, is_selected, score, to_score};
