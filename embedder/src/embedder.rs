//! [`Embedder`]: runs the engine and turns every output head into an
//! embedding.

use tracing::debug;

use crate::engine::InferenceEngine;
use crate::error::EmbedError;
use crate::format::{SampleBuffer, SampleDescriptor};
use crate::options::EmbedderOptions;
use crate::postprocess::process;
use crate::region::{select_region, BoundingBox, Extent};
use crate::result::{Embedding, EmbeddingResult};

/// Extracts embeddings from image or audio samples.
///
/// # Pipeline
///
/// 1. [`select_region`] validates the optional region against the input
/// 2. [`InferenceEngine::run`] produces one raw tensor per output head
/// 3. [`process`] applies each head's [`EmbeddingOptions`](crate::EmbeddingOptions)
/// 4. The embeddings are collected in head order into an [`EmbeddingResult`]
///
/// # Thread Safety
///
/// The embedder holds no mutable state. It is `Send + Sync` and can be
/// shared across threads as long as its engine is.
pub struct Embedder<E> {
    engine: E,
    options: EmbedderOptions,
    dims: Vec<usize>,
}

impl<E: InferenceEngine> Embedder<E> {
    /// Creates an embedder over an initialized engine.
    ///
    /// Fails with [`EmbedError::InvalidOptions`] when the options do not fit
    /// the engine's output heads.
    pub fn new(engine: E, options: EmbedderOptions) -> Result<Self, EmbedError> {
        options.validate()?;
        let dims = engine.output_dimensions();
        if dims.is_empty() {
            return Err(EmbedError::InvalidOptions("engine declares no output heads".into()));
        }
        options.validate_heads(dims.len())?;
        debug!(heads = dims.len(), ?dims, "embedder: created");
        Ok(Self { engine, options, dims })
    }

    /// Runs inference on `sample`, optionally restricted to `region`, and
    /// returns one embedding per output head.
    ///
    /// Regions only apply to images; an audio sample with a region is
    /// rejected with [`EmbedError::InvalidInput`]. Every head the engine
    /// returns must match the length it declared in `output_dimensions`.
    pub fn embed(&self, sample: &SampleBuffer<'_>, region: Option<&BoundingBox>) -> Result<EmbeddingResult, EmbedError> {
        let roi = match sample.descriptor() {
            SampleDescriptor::Image(format) => select_region(format.extent(), region)?,
            SampleDescriptor::Audio(_) => {
                if region.is_some() {
                    return Err(EmbedError::InvalidInput("regions are not supported for audio samples".into()));
                }
                let frames = u32::try_from(sample.frame_count()).map_err(|_| {
                    EmbedError::InvalidInput(format!("audio buffer too long: {} frames", sample.frame_count()))
                })?;
                BoundingBox::full(Extent::new(frames, 1))
            }
        };

        debug!(?roi, "embedder: running inference");
        let outputs = self.engine.run(sample, &roi)?;
        if outputs.len() != self.dims.len() {
            return Err(EmbedError::OutputCountMismatch {
                expected: self.dims.len(),
                got: outputs.len(),
            });
        }

        let embeddings = outputs
            .iter()
            .enumerate()
            .map(|(i, tensor)| {
                if tensor.data.len() != self.dims[i] {
                    return Err(EmbedError::OutputDimensionMismatch {
                        index: i,
                        expected: self.dims[i],
                        got: tensor.data.len(),
                    });
                }
                let feature_vector = process(&tensor.data, tensor.quantization, &self.options.options_for_head(i))?;
                Ok(Embedding {
                    feature_vector,
                    output_index: i,
                })
            })
            .collect::<Result<Vec<_>, EmbedError>>()?;

        debug!(heads = embeddings.len(), "embedder: done");
        Ok(EmbeddingResult::new(embeddings))
    }

    /// Returns the number of output heads of the model.
    pub fn number_of_output_layers(&self) -> usize {
        self.dims.len()
    }

    /// Returns the dimension of the embeddings produced by `output_index`.
    pub fn embedding_dimension(&self, output_index: usize) -> Result<usize, EmbedError> {
        self.dims.get(output_index).copied().ok_or(EmbedError::IndexOutOfRange {
            index: output_index,
            len: self.dims.len(),
        })
    }

    pub fn options(&self) -> &EmbedderOptions {
        &self.options
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}
