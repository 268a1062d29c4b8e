use std::path::{Path, PathBuf};

use cvscreen_core::config::{EmbeddingBackend, EmbeddingConfig};
use cvscreen_core::traits::Embedder;
use cvscreen_core::{Error, Result};

pub mod device;
pub mod hash;
pub mod model;
pub mod pool;
pub mod tokenize;

pub use hash::HashEmbedder;
pub use model::BertEmbedder;
pub use pool::{l2_normalize, masked_mean};

pub const DEFAULT_MODEL: &str = "bge-large-en-v1.5";

/// Build the process-wide embedder. Called once at startup; the result is
/// passed by reference to everything that embeds.
pub fn load_embedder(config: &EmbeddingConfig) -> Result<Box<dyn Embedder>> {
    match config.backend {
        EmbeddingBackend::Hash => {
            tracing::info!("🧪 Using HashEmbedder (dim={})", config.hash_dim);
            Ok(Box::new(HashEmbedder::new(config.hash_dim)))
        }
        EmbeddingBackend::Bert => {
            let dir = resolve_model_dir(config.model_dir.as_deref())?;
            Ok(Box::new(BertEmbedder::load(&dir, config.max_len, config.normalize)?))
        }
    }
}

fn resolve_model_dir(configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = configured {
        if p.exists() { tracing::info!("📦 Using model dir: {}", p.display()); return Ok(p.to_path_buf()); }
        return Err(Error::ModelInference(format!("Model directory {} does not exist", p.display())));
    }
    for candidate in [Path::new("models").join(DEFAULT_MODEL), Path::new("../models").join(DEFAULT_MODEL)] {
        if candidate.exists() { tracing::info!("📦 Using model dir: {}", candidate.display()); return Ok(candidate); }
    }
    Err(Error::ModelInference(format!("Could not locate {} model directory", DEFAULT_MODEL)))
}
