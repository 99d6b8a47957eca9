//! Embedder configuration and its mapping from the generic base options.
//!
//! Glue layers hand over two plain structs: [`BaseOptions`] (where the model
//! is and how to run it) and one [`EmbeddingOptions`] per output head or one
//! for all heads. [`EmbedderOptions::from_options`] merges them field by
//! field:
//!
//! ```text
//! BaseOptions.model_file.file_name     -> EmbedderOptions.model_file.file_name
//! BaseOptions.model_file.file_content  -> EmbedderOptions.model_file.file_content
//! BaseOptions.num_threads              -> EmbedderOptions.num_threads
//! BaseOptions.use_coral                -> EmbedderOptions.delegate (EdgeTpuCoral / None)
//! [EmbeddingOptions]                   -> EmbedderOptions.embedding_options
//! ```

use serde::{Deserialize, Serialize};

use crate::error::EmbedError;

/// Thread count meaning "let the engine decide".
pub const DEFAULT_NUM_THREADS: i32 = -1;

/// Post-processing switches for one output head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingOptions {
    /// Scale the feature vector to unit L2 norm.
    pub l2_normalize: bool,
    /// Emit an int8 feature vector. Takes precedence over `l2_normalize`.
    pub quantize: bool,
}

/// Location of the model. Passed through to the engine, never opened here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_content: Option<Vec<u8>>,
}

/// Generic task options shared by every model-backed task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseOptions {
    pub model_file: ModelFile,
    pub num_threads: i32,
    pub use_coral: bool,
}

impl Default for BaseOptions {
    fn default() -> Self {
        Self {
            model_file: ModelFile::default(),
            num_threads: DEFAULT_NUM_THREADS,
            use_coral: false,
        }
    }
}

impl BaseOptions {
    pub fn from_file_name(file_name: &str) -> Self {
        Self {
            model_file: ModelFile {
                file_name: Some(file_name.to_string()),
                file_content: None,
            },
            ..Self::default()
        }
    }
}

/// Accelerator the engine should delegate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delegate {
    #[default]
    None,
    EdgeTpuCoral,
}

/// Options of an embedder instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedderOptions {
    pub model_file: ModelFile,
    pub num_threads: i32,
    pub delegate: Delegate,

    /// Empty: defaults for every head. One entry: applied to every head.
    /// Otherwise one entry per output head, in head order.
    pub embedding_options: Vec<EmbeddingOptions>,
}

impl Default for EmbedderOptions {
    fn default() -> Self {
        Self {
            model_file: ModelFile::default(),
            num_threads: DEFAULT_NUM_THREADS,
            delegate: Delegate::None,
            embedding_options: Vec::new(),
        }
    }
}

impl EmbedderOptions {
    /// Builds embedder options from the generic base options and the
    /// per-head embedding options. See the module docs for the mapping.
    pub fn from_options(base: &BaseOptions, embedding_options: &[EmbeddingOptions]) -> Result<Self, EmbedError> {
        let mut model_file = ModelFile::default();
        if let Some(content) = &base.model_file.file_content {
            model_file.file_content = Some(content.clone());
        }
        if let Some(name) = &base.model_file.file_name {
            model_file.file_name = Some(name.clone());
        }

        let opts = Self {
            model_file,
            num_threads: base.num_threads,
            delegate: if base.use_coral {
                Delegate::EdgeTpuCoral
            } else {
                Delegate::None
            },
            embedding_options: embedding_options.to_vec(),
        };
        opts.validate()?;
        Ok(opts)
    }

    /// Checks the fields that do not depend on the model.
    pub fn validate(&self) -> Result<(), EmbedError> {
        if self.num_threads == 0 || self.num_threads < DEFAULT_NUM_THREADS {
            return Err(EmbedError::InvalidOptions(format!(
                "num_threads must be -1 or positive, got {}",
                self.num_threads
            )));
        }
        Ok(())
    }

    /// Checks that the embedding options fit a model with `head_count`
    /// output heads.
    pub fn validate_heads(&self, head_count: usize) -> Result<(), EmbedError> {
        match self.embedding_options.len() {
            0 | 1 => Ok(()),
            n if n == head_count => Ok(()),
            n => Err(EmbedError::InvalidOptions(format!(
                "{n} embedding options given for a model with {head_count} output heads"
            ))),
        }
    }

    /// Returns the options that apply to output head `index`.
    pub fn options_for_head(&self, index: usize) -> EmbeddingOptions {
        match self.embedding_options.as_slice() {
            [] => EmbeddingOptions::default(),
            [only] => *only,
            all => all.get(index).copied().unwrap_or_default(),
        }
    }
}
