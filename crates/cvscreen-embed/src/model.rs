use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;

use cvscreen_core::traits::Embedder;
use cvscreen_core::{Error, Result};

use crate::device::select_device;
use crate::pool::{l2_normalize, masked_mean};
use crate::tokenize::{load_tokenizer, tokenize_batch};

/// BERT-family sentence embedder (BGE, MiniLM, e5) with masked mean pooling.
pub struct BertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    model_id: String,
    dim: usize,
    max_len: usize,
    normalize: bool,
    pad_id: u32,
}

impl BertEmbedder {
    /// Load `config.json`, `tokenizer.json` and weights (`model.safetensors`,
    /// else `pytorch_model.bin`) from `model_dir`.
    pub fn load(model_dir: &Path, max_len: usize, normalize: bool) -> Result<Self> {
        let device = select_device();
        tracing::info!("🔄 Loading embedding model from {}", model_dir.display());

        let config_path = model_dir.join("config.json");
        let raw = std::fs::read_to_string(&config_path).map_err(|e| Error::io(&config_path, e))?;
        let config: BertConfig = serde_json::from_str(&raw)
            .map_err(|e| Error::ModelInference(format!("Bad model config {}: {}", config_path.display(), e)))?;
        let max_len = max_len.min(config.max_position_embeddings);

        tracing::info!("📥 Loading tokenizer...");
        let (tokenizer, pad_id) = load_tokenizer(&model_dir.join("tokenizer.json"), max_len)?;

        tracing::info!("📥 Loading model weights...");
        let vb = load_weights(model_dir, &device)?;
        let model = BertModel::load(vb, &config).map_err(Error::inference)?;

        let name = model_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "bert".to_string());
        let dim = config.hidden_size;
        tracing::info!("✅ Model {} loaded (dim={}, max_len={})", name, dim, max_len);
        Ok(Self { model, tokenizer, device, model_id: format!("bert:{name}:d{dim}"), dim, max_len, normalize, pad_id })
    }

    fn embed_many(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.iter().any(|t| t.trim().is_empty()) {
            return Err(Error::ModelInference("empty input".into()));
        }
        let start = Instant::now();
        let batch = tokenize_batch(&self.tokenizer, texts, self.pad_id, &self.device)?;
        let hidden = self
            .model
            .forward(&batch.input_ids, &batch.token_type_ids, Some(&batch.attention_mask))
            .map_err(Error::inference)?;
        let pooled = self.pool(&hidden, &batch.attention_mask).map_err(Error::inference)?;
        let rows: Vec<Vec<f32>> = pooled.to_vec2().map_err(Error::inference)?;
        tracing::debug!("embedded {} text(s) in {:?}", texts.len(), start.elapsed());
        Ok(rows)
    }

    fn pool(&self, hidden: &Tensor, attention_mask: &Tensor) -> candle_core::Result<Tensor> {
        let pooled = masked_mean(hidden, attention_mask)?;
        let pooled = if self.normalize { l2_normalize(&pooled)? } else { pooled };
        pooled.to_dtype(DType::F32)?.to_device(&Device::Cpu)
    }
}

fn load_weights(model_dir: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let safetensors = model_dir.join("model.safetensors");
    if safetensors.exists() {
        // SAFETY: the weights file is memory-mapped read-only and not modified while loaded.
        return unsafe { VarBuilder::from_mmaped_safetensors(&[safetensors], DType::F32, device) }
            .map_err(Error::inference);
    }
    let pickle = model_dir.join("pytorch_model.bin");
    if pickle.exists() {
        let weights = candle_core::pickle::read_all(&pickle).map_err(Error::inference)?;
        let weights: HashMap<String, Tensor> = weights.into_iter().collect();
        return Ok(VarBuilder::from_tensors(weights, DType::F32, device));
    }
    Err(Error::ModelInference(format!("No model.safetensors or pytorch_model.bin in {}", model_dir.display())))
}

impl Embedder for BertEmbedder {
    fn model_id(&self) -> &str { &self.model_id }
    fn dim(&self) -> usize { self.dim }
    fn max_len(&self) -> usize { self.max_len }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_many(&[text])?
            .pop()
            .ok_or_else(|| Error::ModelInference("model returned no embedding".into()))
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() { return Ok(vec![]); }
        let texts: Vec<&str> = texts.iter().map(String::as_str).collect();
        self.embed_many(&texts)
    }
}
