use thiserror::Error;

use crate::region::{BoundingBox, Extent};

/// Errors returned by embedder operations.
///
/// Every variant describes a caller-side input problem or an engine failure.
/// None of them is worth retrying with the same input.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EmbedError {
    #[error("embedder: region {region:?} is out of bounds for input {extent:?}")]
    OutOfBounds { region: BoundingBox, extent: Extent },

    #[error("embedder: index {index} out of range for {len} embeddings")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("embedder: cannot compare a float feature vector with a quantized one")]
    TypeMismatch,

    #[error("embedder: dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("embedder: cosine similarity is undefined for a zero-norm vector")]
    ZeroNorm,

    #[error("embedder: invalid sample format: {0}")]
    InvalidFormat(String),

    #[error("embedder: invalid input: {0}")]
    InvalidInput(String),

    #[error("embedder: invalid quantization parameters: scale={scale}, zero_point={zero_point}")]
    InvalidQuantization { scale: f32, zero_point: i8 },

    #[error("embedder: invalid options: {0}")]
    InvalidOptions(String),

    #[error("embedder: engine returned {got} output tensors, expected {expected}")]
    OutputCountMismatch { expected: usize, got: usize },

    #[error("embedder: output {index} has {got} values, expected {expected}")]
    OutputDimensionMismatch { index: usize, expected: usize, got: usize },

    #[error("embedder: engine error: {0}")]
    Engine(String),
}
