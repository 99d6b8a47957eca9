//! Turns raw output tensors into feature vectors.
//!
//! Per head, exactly one of three paths runs:
//!
//! ```text
//! quantize      -> int8 vector, q = round(x / scale) + zero_point, clamped
//! l2_normalize  -> float vector scaled to unit length
//! (neither)     -> float vector, unchanged
//! ```
//!
//! Quantization wins when both flags are set.

use crate::engine::QuantizationParams;
use crate::error::EmbedError;
use crate::options::EmbeddingOptions;
use crate::result::{FeatureVector, QuantizedVector};

/// Converts one raw output head into a [`FeatureVector`].
///
/// `quantization` is the head's own parameter pair as reported by the
/// engine. When a quantized output is requested and the head has none,
/// [`QuantizationParams::default`] is used.
pub fn process(
    raw: &[f32],
    quantization: Option<QuantizationParams>,
    options: &EmbeddingOptions,
) -> Result<FeatureVector, EmbedError> {
    if options.quantize {
        let params = quantization.unwrap_or_default();
        return Ok(FeatureVector::Quantized(quantize(raw, params)?));
    }

    let mut values = raw.to_vec();
    if options.l2_normalize {
        l2_normalize(&mut values);
    }
    Ok(FeatureVector::Float(values))
}

/// Scales `v` in place to unit Euclidean length.
///
/// A zero vector is left unchanged.
pub fn l2_normalize(v: &mut [f32]) {
    let mut norm: f64 = 0.0;
    for &x in v.iter() {
        norm += (x as f64) * (x as f64);
    }
    norm = norm.sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x = (*x as f64 / norm) as f32;
        }
    }
}

/// Quantizes `raw` to int8 with the given parameters.
///
/// Rounds half away from zero and saturates at `[-128, 127]`. NaN and
/// infinite inputs have no int8 image and are rejected.
pub fn quantize(raw: &[f32], params: QuantizationParams) -> Result<QuantizedVector, EmbedError> {
    params.validate()?;
    if let Some(i) = raw.iter().position(|x| !x.is_finite()) {
        return Err(EmbedError::InvalidInput(format!(
            "cannot quantize non-finite value {} at index {i}",
            raw[i]
        )));
    }
    let zp = params.zero_point as f32;
    let values = raw
        .iter()
        .map(|&x| ((x / params.scale).round() + zp).clamp(i8::MIN as f32, i8::MAX as f32) as i8)
        .collect();
    Ok(QuantizedVector { values, params })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(l2_normalize: bool, quantize: bool) -> EmbeddingOptions {
        EmbeddingOptions {
            l2_normalize,
            quantize,
        }
    }

    fn norm(v: &[f32]) -> f64 {
        v.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>().sqrt()
    }

    #[test]
    fn pass_through_without_options() {
        let fv = process(&[3.0, -4.0, 0.5], None, &opts(false, false)).unwrap();
        assert_eq!(fv, FeatureVector::Float(vec![3.0, -4.0, 0.5]));
    }

    #[test]
    fn l2_normalize_three_four() {
        let fv = process(&[3.0, 4.0], None, &opts(true, false)).unwrap();
        let FeatureVector::Float(v) = fv else {
            panic!("expected float vector");
        };
        assert!((v[0] - 0.6).abs() < 1e-6, "got {v:?}");
        assert!((v[1] - 0.8).abs() < 1e-6, "got {v:?}");
    }

    #[test]
    fn l2_normalize_zero_vector_is_unchanged() {
        let mut v = vec![0.0f32, 0.0, 0.0];
        l2_normalize(&mut v);
        assert_eq!(v, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn l2_normalize_is_idempotent() {
        let mut once: Vec<f32> = (0..1024).map(|i| ((i * 37) % 101) as f32 - 50.0).collect();
        l2_normalize(&mut once);
        let mut twice = once.clone();
        l2_normalize(&mut twice);
        assert!((norm(&once) - 1.0).abs() < 1e-5);
        for (a, b) in once.iter().zip(&twice) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn quantize_clamps_to_max() {
        let q = quantize(&[1.0], QuantizationParams::new(1.0 / 127.0, 0)).unwrap();
        assert_eq!(q.values, vec![127]);
    }

    #[test]
    fn quantize_saturates_both_ends() {
        let q = quantize(&[1000.0, -1000.0], QuantizationParams::default()).unwrap();
        assert_eq!(q.values, vec![127, -128]);
    }

    #[test]
    fn quantize_rounds_half_away_from_zero() {
        let q = quantize(&[0.5, -0.5, 1.5, -1.5, 0.49], QuantizationParams::new(1.0, 0)).unwrap();
        assert_eq!(q.values, vec![1, -1, 2, -2, 0]);
    }

    #[test]
    fn quantize_applies_zero_point() {
        let q = quantize(&[0.0, 2.0, -2.0], QuantizationParams::new(0.5, 10)).unwrap();
        assert_eq!(q.values, vec![10, 14, 6]);
        assert_eq!(q.params, QuantizationParams::new(0.5, 10));
    }

    #[test]
    fn quantize_rejects_bad_scale() {
        let err = quantize(&[1.0], QuantizationParams::new(0.0, 0)).unwrap_err();
        assert!(matches!(err, EmbedError::InvalidQuantization { .. }));
    }

    #[test]
    fn quantize_rejects_non_finite_values() {
        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let err = quantize(&[0.5, bad], QuantizationParams::default()).unwrap_err();
            assert!(matches!(err, EmbedError::InvalidInput(_)), "{bad}: got {err:?}");
        }
        assert!(process(&[f32::NAN], None, &opts(false, true)).is_err());
    }

    #[test]
    fn quantize_takes_precedence_over_normalize() {
        let fv = process(&[0.25, -0.5], None, &opts(true, true)).unwrap();
        let FeatureVector::Quantized(q) = fv else {
            panic!("expected quantized vector");
        };
        // Default scale 1/128, no normalization applied first.
        assert_eq!(q.values, vec![32, -64]);
    }

    #[test]
    fn quantize_uses_engine_params_when_present() {
        let fv = process(&[1.0], Some(QuantizationParams::new(0.1, -5)), &opts(false, true)).unwrap();
        assert_eq!(
            fv,
            FeatureVector::Quantized(QuantizedVector {
                values: vec![5],
                params: QuantizationParams::new(0.1, -5),
            })
        );
    }
}
