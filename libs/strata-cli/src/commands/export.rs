//! Export command

use super::{load_options, load_stack};
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use strata_mesh::{ExportOptions, F3GridExporter, ZoneKind};
use tracing::info;

/// Export arguments
#[derive(Args)]
pub struct ExportArgs {
    /// Layer stack JSON (`{ "layers": [...], "options": {...} }`)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output .f3grid path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Options JSON; replaces options embedded in the input
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Emit tetrahedral (T4) zones instead of bricks
    #[arg(long)]
    pub tetra: bool,

    /// Keep every n-th row and column
    #[arg(short, long)]
    pub downsample: Option<i64>,

    /// Shift coordinates near the origin
    #[arg(long)]
    pub normalize: bool,

    /// Drop degenerate brick zones
    #[arg(long)]
    pub filter: bool,

    /// Append a cap layer of this thickness above the top layer
    #[arg(long, value_name = "THICKNESS")]
    pub top_cap: Option<f64>,
}

/// Merges the command-line flags onto `options`. Flags only ever switch
/// features on or replace values; absent flags leave the options alone.
pub fn apply_overrides(args: &ExportArgs, mut options: ExportOptions) -> ExportOptions {
    if let Some(factor) = args.downsample {
        options.downsample_factor = factor;
    }
    if args.normalize {
        options.normalize_coords = true;
    }
    if args.filter {
        options.filter_bad_zones = true;
    }
    if let Some(thickness) = args.top_cap {
        options.add_top_cap = true;
        options.top_cap_thickness = thickness;
    }
    options
}

/// Runs the export command.
pub fn execute(args: ExportArgs) -> Result<()> {
    let stack = load_stack(&args.input)?;
    let base = match &args.options {
        Some(path) => load_options(path)?,
        None => stack.options.unwrap_or_default(),
    };
    let options = apply_overrides(&args, base);

    let kind = if args.tetra { ZoneKind::Tetra } else { ZoneKind::Brick };
    let summary = F3GridExporter::new(options)
        .export(&stack.layers, kind, &args.output)
        .with_context(|| format!("export to {} failed", args.output.display()))?;

    info!("=== Export summary ===");
    info!("Zone type:   {}", summary.kind);
    info!("Gridpoints:  {}", summary.gridpoints);
    info!("Zones:       {}", summary.zones);
    info!("Groups:      {}", summary.groups);
    info!(
        "Offset:      ({:.3}, {:.3}, {:.3})",
        summary.offset.x, summary.offset.y, summary.offset.z
    );
    if summary.degenerate.total() > 0 {
        info!(
            "Dropped:     {} tets, {} bricks, {} filtered",
            summary.degenerate.dropped_tets,
            summary.degenerate.dropped_bricks,
            summary.degenerate.filtered_zones
        );
    }
    info!("Written:     {} bytes", summary.bytes_written);
    Ok(())
}
