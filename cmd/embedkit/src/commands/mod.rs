//! CLI commands module.

mod options;
mod process;
mod region;
mod similarity;
mod util;

pub use options::OptionsCommand;
pub use process::ProcessCommand;
pub use region::RegionCommand;
pub use similarity::SimilarityCommand;

pub(crate) use util::*;
