use crate::error::Result;

/// Maps text to a fixed-length dense vector.
///
/// One instance is built at startup and passed by reference to whatever
/// needs it; vectors are only comparable when they come from the same
/// instance.
pub trait Embedder: Send + Sync {
    /// Stable identifier for the model/backend (e.g. `bert:bge-large-en-v1.5:d1024`).
    fn model_id(&self) -> &str;
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    fn embed_text(&self, text: &str) -> Result<Vec<f32>>;

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed_text(t)).collect()
    }
}
