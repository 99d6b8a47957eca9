//! Raw output tensors -> embeddings.

use clap::Args;
use serde::Deserialize;

use embedkit_embedder::{process, Embedding, EmbeddingOptions, EmbeddingResult, EmbedderOptions, OutputTensor};

use super::{load_request, output_result, print_verbose, require_input_file};
use crate::Cli;

/// Post-process raw output tensors into embeddings.
///
/// The request file lists one tensor per output head:
///
///   outputs:
///     - data: [3.0, 4.0]
///     - data: [0.5, -0.5]
///       quantization: { scale: 0.0078125, zero_point: 0 }
///   embedding_options:
///     - l2_normalize: true
#[derive(Args)]
pub struct ProcessCommand {
    /// L2-normalize every head (used when the request has no embedding_options)
    #[arg(long)]
    l2_normalize: bool,

    /// Quantize every head to int8 (used when the request has no embedding_options)
    #[arg(long)]
    quantize: bool,
}

/// Request file format for `embedkit process`.
#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    pub outputs: Vec<OutputTensor>,
    #[serde(default)]
    pub embedding_options: Vec<EmbeddingOptions>,
}

impl ProcessCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let path = require_input_file(cli)?;
        let req: ProcessRequest = load_request(path)?;
        print_verbose(cli, &format!("loaded {} output tensors from {path}", req.outputs.len()));

        let result = self.process_request(req)?;
        output_result(cli, &result)
    }

    fn process_request(&self, req: ProcessRequest) -> anyhow::Result<EmbeddingResult> {
        let embedding_options = if req.embedding_options.is_empty() {
            vec![EmbeddingOptions {
                l2_normalize: self.l2_normalize,
                quantize: self.quantize,
            }]
        } else {
            req.embedding_options
        };
        let options = EmbedderOptions {
            embedding_options,
            ..EmbedderOptions::default()
        };
        options.validate_heads(req.outputs.len())?;

        let mut embeddings = Vec::with_capacity(req.outputs.len());
        for (i, tensor) in req.outputs.iter().enumerate() {
            let head_options = options.options_for_head(i);
            tracing::debug!(head = i, dim = tensor.data.len(), ?head_options, "process: head");
            embeddings.push(Embedding {
                feature_vector: process(&tensor.data, tensor.quantization, &head_options)?,
                output_index: i,
            });
        }
        Ok(EmbeddingResult::new(embeddings))
    }
}
