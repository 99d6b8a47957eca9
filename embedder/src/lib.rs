//! Embedding extraction on top of an opaque inference engine.
//!
//! # Architecture
//!
//! A call flows through four stages:
//!
//! 1. [`select_region`]: optional bounding box -> validated window
//! 2. [`InferenceEngine::run`]: sample + window -> raw tensor per output head
//! 3. [`process`]: raw tensor -> [`FeatureVector`] (L2 normalized or int8)
//! 4. [`EmbeddingResult`]: embeddings in head order, with index lookup
//!
//! [`cosine_similarity`] then compares any two feature vectors of the same
//! representation and length, possibly produced by different calls.
//!
//! [`Embedder`] wires stages 1 to 4 together. Every stage except the engine
//! is a pure function over values and is safe to call from any thread.
//!
//! # Post-processing
//!
//! ```text
//! quantize = true      -> Quantized { values: [i8], params }   (wins over l2)
//! l2_normalize = true  -> Float, unit length (zero vector kept as is)
//! otherwise            -> Float, unchanged
//! ```

mod embedder;
mod engine;
mod error;
pub mod format;
pub mod options;
pub mod postprocess;
mod region;
mod result;
mod similarity;

pub use embedder::Embedder;
pub use engine::{InferenceEngine, OutputTensor, QuantizationParams};
pub use error::EmbedError;
pub use format::{AudioFormat, ImageFormat, PixelFormat, SampleBuffer, SampleDescriptor};
pub use options::{BaseOptions, Delegate, EmbedderOptions, EmbeddingOptions, ModelFile};
pub use postprocess::{l2_normalize, process, quantize};
pub use region::{select_region, BoundingBox, Extent};
pub use result::{Embedding, EmbeddingResult, FeatureVector, QuantizedVector};
pub use similarity::cosine_similarity;
