use crate::error::EmbedError;
use crate::result::FeatureVector;

/// Computes the cosine similarity between two feature vectors.
///
/// Returns a value in `[-1, 1]` where 1 means identical direction and -1
/// means opposite direction.
///
/// Both vectors must use the same representation and length. Quantized
/// vectors are dequantized with their own parameters, so two quantized
/// vectors with different scales compare correctly. Accumulation is done in
/// f64.
///
/// Non-finite values (or quantization params that are not finite and
/// positive) are rejected, so an `Ok` result is never NaN.
pub fn cosine_similarity(u: &FeatureVector, v: &FeatureVector) -> Result<f64, EmbedError> {
    if u.is_quantized() != v.is_quantized() {
        return Err(EmbedError::TypeMismatch);
    }
    if u.len() != v.len() {
        return Err(EmbedError::DimensionMismatch {
            left: u.len(),
            right: v.len(),
        });
    }

    let (dot, norm_u, norm_v) = match (u, v) {
        (FeatureVector::Float(a), FeatureVector::Float(b)) => {
            accumulate(a.iter().map(|&x| x as f64).zip(b.iter().map(|&y| y as f64)))
        }
        (FeatureVector::Quantized(a), FeatureVector::Quantized(b)) => {
            a.params.validate()?;
            b.params.validate()?;
            accumulate((0..a.values.len()).map(|i| (a.dequantize_at(i), b.dequantize_at(i))))
        }
        _ => return Err(EmbedError::TypeMismatch),
    };

    if !(dot.is_finite() && norm_u.is_finite() && norm_v.is_finite()) {
        return Err(EmbedError::InvalidInput("feature vector has non-finite values".into()));
    }
    if norm_u == 0.0 || norm_v == 0.0 {
        return Err(EmbedError::ZeroNorm);
    }

    let similarity = dot / (norm_u.sqrt() * norm_v.sqrt());
    // Clamp to [-1, 1] to handle floating point errors.
    Ok(similarity.clamp(-1.0, 1.0))
}

/// Returns (dot, squared norm of left, squared norm of right).
fn accumulate(pairs: impl Iterator<Item = (f64, f64)>) -> (f64, f64, f64) {
    let mut dot: f64 = 0.0;
    let mut norm_a: f64 = 0.0;
    let mut norm_b: f64 = 0.0;
    for (a, b) in pairs {
        dot += a * b;
        norm_a += a * a;
        norm_b += b * b;
    }
    (dot, norm_a, norm_b)
}
