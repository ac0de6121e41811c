//! Inspect command
//!
//! Prints per-layer shapes and elevation ranges, and flags interface samples
//! that the monotonic repair would raise.

use super::load_stack;
use anyhow::Result;
use clap::Args;
use config::constants::MONOTONIC_EPSILON;
use std::path::PathBuf;
use strata_mesh::InterfaceStack;
use tracing::{info, warn};

/// Inspect arguments
#[derive(Args)]
pub struct InspectArgs {
    /// Layer stack JSON
    #[arg(short, long)]
    pub input: PathBuf,
}

/// Runs the inspect command.
pub fn execute(args: InspectArgs) -> Result<()> {
    let stack = load_stack(&args.input)?;
    info!("=== Layer stack: {} ===", args.input.display());
    println!("{} layers (bottom to top)", stack.layers.len());

    let mut valid = true;
    for (index, layer) in stack.layers.iter().enumerate() {
        if let Err(err) = layer.validate(index) {
            warn!("{}", err);
            valid = false;
            continue;
        }
        let (rows, cols) = layer.shape();
        let range = |grid: &strata_mesh::SurfaceGrid| match grid.finite_range() {
            Some((lo, hi)) => format!("{lo:.3} .. {hi:.3}"),
            None => "no finite samples".to_string(),
        };
        println!(
            "{index:>3}  {:<20} {cols}x{rows}  bottom {}  top {}",
            layer.name,
            range(&layer.bottom_surface_z),
            range(&layer.top_surface_z)
        );
    }

    if !valid || stack.layers.windows(2).any(|w| w[0].shape() != w[1].shape()) {
        warn!("Layers do not share one grid shape; export will fail");
        return Ok(());
    }

    let raised = InterfaceStack::from_layers(&stack.layers).repair_monotonic(MONOTONIC_EPSILON);
    if raised > 0 {
        warn!(
            "{} interface samples sit less than {} above the interface below; tetra export will raise them",
            raised, MONOTONIC_EPSILON
        );
    } else {
        info!("{} interfaces are monotonic", stack.layers.len() + 1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_crossing_stack() {
        let dir = std::env::temp_dir().join(format!("strata-cli-inspect-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("crossing.json");
        // The upper layer's top dips below its bottom at one sample
        std::fs::write(
            &input,
            r#"{
                "layers": [
                    {
                        "name": "A",
                        "grid_x": [[0.0, 1.0]],
                        "grid_y": [[0.0, 0.0]],
                        "top_surface_z": [[5.0, 5.0]],
                        "bottom_surface_z": [[0.0, 0.0]]
                    },
                    {
                        "name": "B",
                        "grid_x": [[0.0, 1.0]],
                        "grid_y": [[0.0, 0.0]],
                        "top_surface_z": [[9.0, 4.0]],
                        "bottom_surface_z": [[5.0, 5.0]]
                    }
                ]
            }"#,
        )
        .unwrap();
        assert!(execute(InspectArgs { input }).is_ok());
    }
}
