use std::path::Path;

use candle_core::{Device, Tensor};
use tokenizers::{Tokenizer, TruncationParams};

use cvscreen_core::{Error, Result};

pub struct TokenBatch {
    pub input_ids: Tensor,
    pub token_type_ids: Tensor,
    pub attention_mask: Tensor,
}

/// Load `tokenizer.json` truncating to `max_len` tokens, special tokens
/// included, with padding disabled. Returns the tokenizer and its pad id.
pub fn load_tokenizer(path: &Path, max_len: usize) -> Result<(Tokenizer, u32)> {
    let mut tokenizer = Tokenizer::from_file(path).map_err(|e| {
        Error::ModelInference(format!("Failed to load tokenizer from {}: {}", path.display(), e))
    })?;
    tokenizer
        .with_truncation(Some(TruncationParams { max_length: max_len, ..Default::default() }))
        .map_err(Error::inference)?;
    tokenizer.with_padding(None);
    let pad_id = tokenizer.token_to_id("[PAD]").unwrap_or(0);
    Ok((tokenizer, pad_id))
}

/// Encode `texts` with special tokens and pad to the longest member.
///
/// Truncation is configured on the tokenizer itself so the closing special
/// token survives; a single text is never padded.
pub fn tokenize_batch(tokenizer: &Tokenizer, texts: &[&str], pad_id: u32, device: &Device) -> Result<TokenBatch> {
    let encodings = tokenizer
        .encode_batch(texts.to_vec(), true)
        .map_err(|e| Error::ModelInference(format!("Tokenization failed: {}", e)))?;
    let max_len = encodings.iter().map(|e| e.get_ids().len()).max().unwrap_or(0);
    if max_len == 0 {
        return Err(Error::ModelInference("Tokenization produced no tokens".into()));
    }

    let batch = encodings.len();
    let mut ids = Vec::with_capacity(batch * max_len);
    let mut type_ids = Vec::with_capacity(batch * max_len);
    let mut mask = Vec::with_capacity(batch * max_len);
    for enc in &encodings {
        let pad = max_len - enc.get_ids().len();
        ids.extend_from_slice(enc.get_ids());
        ids.extend(std::iter::repeat(pad_id).take(pad));
        type_ids.extend_from_slice(enc.get_type_ids());
        type_ids.extend(std::iter::repeat(0u32).take(pad));
        mask.extend_from_slice(enc.get_attention_mask());
        mask.extend(std::iter::repeat(0u32).take(pad));
    }

    let shape = (batch, max_len);
    Ok(TokenBatch {
        input_ids: Tensor::from_vec(ids, shape, device).map_err(Error::inference)?,
        token_type_ids: Tensor::from_vec(type_ids, shape, device).map_err(Error::inference)?,
        attention_mask: Tensor::from_vec(mask, shape, device).map_err(Error::inference)?,
    })
}
