//! embedkit CLI - post-process raw model outputs and compare embeddings.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{OptionsCommand, ProcessCommand, RegionCommand, SimilarityCommand};

/// embedkit CLI - embedding post-processing and similarity.
///
/// Works on already-produced engine outputs stored as YAML or JSON:
///   - turn raw output tensors into embeddings (L2 / int8)
///   - compare two embeddings with cosine similarity
///   - validate a region against an input size
///   - resolve embedder options from base options
#[derive(Parser)]
#[command(name = "embedkit")]
#[command(about = "Embedding post-processing and similarity tool")]
#[command(version)]
pub struct Cli {
    /// Output file (default: stdout)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Input request file (YAML or JSON)
    #[arg(short = 'f', long = "file", global = true)]
    pub input: Option<String>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Turn raw output tensors into embeddings
    Process(ProcessCommand),
    /// Cosine similarity between two embeddings
    Similarity(SimilarityCommand),
    /// Validate a region against an input extent
    Region(RegionCommand),
    /// Resolve embedder options from base and embedding options
    Options(OptionsCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Process(cmd) => cmd.run(&cli),
        Commands::Similarity(cmd) => cmd.run(&cli),
        Commands::Region(cmd) => cmd.run(&cli),
        Commands::Options(cmd) => cmd.run(&cli),
    }
}
