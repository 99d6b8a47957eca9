//! Cosine similarity between two stored embeddings.

use clap::Args;
use serde::{Deserialize, Serialize};

use embedkit_embedder::{cosine_similarity, EmbeddingResult, FeatureVector};

use super::{load_request, output_result, print_verbose};
use crate::Cli;

/// Compare two embeddings.
///
/// Each file holds either a bare feature vector (`float: [...]` or
/// `quantized: {values, params}`) or a full result as written by
/// `embedkit process`, in which case `--index` picks the output head.
#[derive(Args)]
pub struct SimilarityCommand {
    /// First embedding file (YAML or JSON)
    left: String,

    /// Second embedding file (YAML or JSON)
    right: String,

    /// Output head to read from result files
    #[arg(long, default_value_t = 0)]
    index: usize,
}

/// Either a bare feature vector or a whole embedding result.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EmbeddingFile {
    Result(EmbeddingResult),
    Vector(FeatureVector),
}

impl EmbeddingFile {
    fn into_feature_vector(self, index: usize) -> anyhow::Result<FeatureVector> {
        match self {
            Self::Vector(v) => Ok(v),
            Self::Result(r) => Ok(r.get_embedding_by_index(index)?.feature_vector.clone()),
        }
    }
}

#[derive(Debug, Serialize)]
struct SimilarityOutput {
    dimension: usize,
    cosine_similarity: f64,
}

impl SimilarityCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let u = load_request::<EmbeddingFile>(&self.left)?.into_feature_vector(self.index)?;
        let v = load_request::<EmbeddingFile>(&self.right)?.into_feature_vector(self.index)?;
        print_verbose(cli, &format!("comparing {} vs {} dims", u.len(), v.len()));

        let out = compare(&u, &v)?;
        output_result(cli, &out)
    }
}

fn compare(u: &FeatureVector, v: &FeatureVector) -> anyhow::Result<SimilarityOutput> {
    let similarity = cosine_similarity(u, v)?;
    Ok(SimilarityOutput {
        dimension: u.len(),
        cosine_similarity: similarity,
    })
}
