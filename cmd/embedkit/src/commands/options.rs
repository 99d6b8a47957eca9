//! Base options + embedding options -> embedder options.

use clap::Args;
use serde::Deserialize;

use embedkit_embedder::{BaseOptions, EmbedderOptions, EmbeddingOptions};

use super::{load_request, output_result, require_input_file};
use crate::Cli;

/// Resolve the embedder options a config file describes.
///
///   base_options:
///     model_file: { file_name: mobilenet_v3_small.tflite }
///     num_threads: 2
///     use_coral: false
///   embedding_options:
///     - l2_normalize: true
#[derive(Args)]
pub struct OptionsCommand {}

/// Config file format for `embedkit options`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EmbedderConfig {
    pub base_options: BaseOptions,
    pub embedding_options: Vec<EmbeddingOptions>,
}

impl EmbedderConfig {
    pub fn resolve(&self) -> anyhow::Result<EmbedderOptions> {
        Ok(EmbedderOptions::from_options(&self.base_options, &self.embedding_options)?)
    }
}

impl OptionsCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg: EmbedderConfig = load_request(require_input_file(cli)?)?;
        let options = cfg.resolve()?;
        tracing::debug!(num_threads = options.num_threads, delegate = ?options.delegate, "options: resolved");
        output_result(cli, &options)
    }
}
