use candle_core::{Result, Tensor};

/// Mean over the token axis of `hidden` `[B, T, H]`, counting only positions
/// where `attention_mask` `[B, T]` is 1. Special tokens carry mask 1 and are
/// included; batch padding carries 0 and is not.
pub fn masked_mean(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
    let (_batch, _tokens, _hidden_dim) = hidden.dims3()?;
    let mask = attention_mask
        .to_device(hidden.device())?
        .to_dtype(hidden.dtype())?
        .unsqueeze(2)?;
    let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
    let lengths = mask.sum(1)?.clamp(1e-9, f64::MAX)?;
    summed.broadcast_div(&lengths)
}

/// Row-wise L2 normalization of `[B, H]`; all-zero rows stay zero.
pub fn l2_normalize(pooled: &Tensor) -> Result<Tensor> {
    let norm = pooled.sqr()?.sum_keepdim(1)?.sqrt()?.clamp(1e-12, f64::MAX)?;
    pooled.broadcast_div(&norm)
}
