use cvscreen_core::{Error, Result};

/// Cosine noise absorbed before truncation, so parallel vectors reach 100.
const TRUNCATION_SLACK: f64 = 1e-6;

/// Cosine of the angle between `a` and `b`, clamped to `[-1, 1]`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch { left: a.len(), right: b.len() });
    }
    if a.is_empty() {
        return Err(Error::DegenerateVector("empty vector".into()));
    }
    let (mut dot, mut norm_a, mut norm_b) = (0f64, 0f64, 0f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if !(dot.is_finite() && norm_a.is_finite() && norm_b.is_finite()) {
        return Err(Error::DegenerateVector("non-finite component".into()));
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(Error::DegenerateVector("zero magnitude".into()));
    }
    Ok((dot / (norm_a * norm_b).sqrt()).clamp(-1.0, 1.0))
}

/// Scale to percent and truncate toward zero: 0.699 -> 69, -0.001 -> 0.
pub fn to_score(cosine: f64) -> i32 {
    let nudged = cosine + TRUNCATION_SLACK.copysign(cosine);
    (nudged.clamp(-1.0, 1.0) * 100.0).trunc() as i32
}

pub fn score(a: &[f32], b: &[f32]) -> Result<i32> {
    cosine_similarity(a, b).map(to_score)
}

/// Threshold is inclusive.
pub fn is_selected(score: i32, threshold: i32) -> bool { score >= threshold }
