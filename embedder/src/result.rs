use serde::{Deserialize, Serialize};

use crate::engine::QuantizationParams;
use crate::error::EmbedError;

/// Int8 feature values together with the parameters needed to read them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantizedVector {
    pub values: Vec<i8>,
    pub params: QuantizationParams,
}

impl QuantizedVector {
    /// Returns the real value represented by element `i`.
    pub fn dequantize_at(&self, i: usize) -> f64 {
        (self.values[i] as f64 - self.params.zero_point as f64) * self.params.scale as f64
    }

    /// Returns all values mapped back to floats.
    pub fn dequantize(&self) -> Vec<f32> {
        (0..self.values.len()).map(|i| self.dequantize_at(i) as f32).collect()
    }
}

/// Numeric payload of an embedding: exactly one representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureVector {
    Float(Vec<f32>),
    Quantized(QuantizedVector),
}

impl FeatureVector {
    pub fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::Quantized(q) => q.values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_quantized(&self) -> bool {
        matches!(self, Self::Quantized(_))
    }

    pub fn as_float(&self) -> Option<&[f32]> {
        match self {
            Self::Float(v) => Some(v),
            Self::Quantized(_) => None,
        }
    }

    pub fn as_quantized(&self) -> Option<&QuantizedVector> {
        match self {
            Self::Quantized(q) => Some(q),
            Self::Float(_) => None,
        }
    }
}

/// Embedding produced by one model output head.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    pub feature_vector: FeatureVector,

    /// Index of the output head this embedding comes from.
    pub output_index: usize,
}

impl Embedding {
    /// Length of the feature vector, whatever its representation.
    pub fn dimension(&self) -> usize {
        self.feature_vector.len()
    }
}

/// All embeddings of one inference call, in output-head order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EmbeddingResult {
    pub embeddings: Vec<Embedding>,
}

impl EmbeddingResult {
    pub fn new(embeddings: Vec<Embedding>) -> Self {
        Self { embeddings }
    }

    /// Returns the embedding at `index`.
    pub fn get_embedding_by_index(&self, index: usize) -> Result<&Embedding, EmbedError> {
        self.embeddings.get(index).ok_or(EmbedError::IndexOutOfRange {
            index,
            len: self.embeddings.len(),
        })
    }

    pub fn number_of_output_layers(&self) -> usize {
        self.embeddings.len()
    }
}
