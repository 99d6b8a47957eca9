use serde::{Deserialize, Serialize};

use crate::error::EmbedError;
use crate::format::SampleBuffer;
use crate::region::BoundingBox;

/// Linear quantization parameters of a model output.
///
/// A quantized value `q` represents `(q - zero_point) * scale`. The scale
/// must be finite and positive; deserialization enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuantizationParamsRepr")]
pub struct QuantizationParams {
    pub scale: f32,
    pub zero_point: i8,
}

#[derive(Deserialize)]
struct QuantizationParamsRepr {
    scale: f32,
    zero_point: i8,
}

impl TryFrom<QuantizationParamsRepr> for QuantizationParams {
    type Error = EmbedError;

    fn try_from(r: QuantizationParamsRepr) -> Result<Self, Self::Error> {
        let params = Self::new(r.scale, r.zero_point);
        params.validate()?;
        Ok(params)
    }
}

impl QuantizationParams {
    pub fn new(scale: f32, zero_point: i8) -> Self {
        Self { scale, zero_point }
    }

    pub(crate) fn validate(&self) -> Result<(), EmbedError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(EmbedError::InvalidQuantization {
                scale: self.scale,
                zero_point: self.zero_point,
            });
        }
        Ok(())
    }
}

impl Default for QuantizationParams {
    /// Maps `[-1, 1)` onto the full int8 range; used for float models that
    /// are asked for quantized output.
    fn default() -> Self {
        Self {
            scale: 1.0 / 128.0,
            zero_point: 0,
        }
    }
}

/// One raw output head as produced by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputTensor {
    /// Dequantized float values of the head.
    pub data: Vec<f32>,

    /// Quantization parameters of the head, when the model declares them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantization: Option<QuantizationParams>,
}

impl OutputTensor {
    pub fn new(data: Vec<f32>) -> Self {
        Self {
            data,
            quantization: None,
        }
    }

    pub fn with_quantization(mut self, params: QuantizationParams) -> Self {
        self.quantization = Some(params);
        self
    }
}

/// Runs a loaded model on a prepared sample.
///
/// The engine is an opaque collaborator: loading the model, choosing a
/// device and executing the graph all happen behind this trait.
///
/// # Thread Safety
///
/// Implementations must be safe for concurrent use. An engine backed by a
/// single accelerator context serializes calls internally.
pub trait InferenceEngine: Send + Sync {
    /// Runs inference restricted to `region` and returns one tensor per
    /// output head, in model order.
    fn run(&self, sample: &SampleBuffer<'_>, region: &BoundingBox) -> Result<Vec<OutputTensor>, EmbedError>;

    /// Returns the length of every output head, in model order.
    fn output_dimensions(&self) -> Vec<usize>;
}

impl<E: InferenceEngine + ?Sized> InferenceEngine for Box<E> {
    fn run(&self, sample: &SampleBuffer<'_>, region: &BoundingBox) -> Result<Vec<OutputTensor>, EmbedError> {
        (**self).run(sample, region)
    }

    fn output_dimensions(&self) -> Vec<usize> {
        (**self).output_dimensions()
    }
}

impl<E: InferenceEngine + ?Sized> InferenceEngine for std::sync::Arc<E> {
    fn run(&self, sample: &SampleBuffer<'_>, region: &BoundingBox) -> Result<Vec<OutputTensor>, EmbedError> {
        (**self).run(sample, region)
    }

    fn output_dimensions(&self) -> Vec<usize> {
        (**self).output_dimensions()
    }
}
