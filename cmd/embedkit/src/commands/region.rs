//! Region validation against an input extent.

use std::str::FromStr;

use clap::Args;

use embedkit_embedder::{select_region, BoundingBox, Extent};

use super::output_result;
use crate::Cli;

/// Validate a region against an input of the given size.
#[derive(Args)]
pub struct RegionCommand {
    /// Input width
    #[arg(long)]
    width: u32,

    /// Input height
    #[arg(long)]
    height: u32,

    /// Region as x,y,width,height (whole input when omitted)
    #[arg(long = "box", value_parser = parse_box)]
    region: Option<BoundingBox>,
}

impl RegionCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let selected = select_region(Extent::new(self.width, self.height), self.region.as_ref())?;
        output_result(cli, &selected)
    }
}

fn parse_box(s: &str) -> Result<BoundingBox, String> {
    let parts = s
        .split(',')
        .map(|p| u32::from_str(p.trim()).map_err(|e| format!("{p:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [x, y, w, h] => Ok(BoundingBox::new(*x, *y, *w, *h)),
        _ => Err(format!("expected x,y,width,height, got {s:?}")),
    }
}
