//! Subcommands and the shared input loader.

pub mod export;
pub mod inspect;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use strata_mesh::{ExportOptions, Layer};

/// Input document: the layer stack bottom to top, plus optional options.
#[derive(Debug, Deserialize)]
pub struct StackFile {
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub options: Option<ExportOptions>,
}

/// Reads a layer stack from a JSON file.
pub fn load_stack(path: &Path) -> Result<StackFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let stack: StackFile = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse layer stack {}", path.display()))?;
    if stack.layers.is_empty() {
        bail!("{} contains no layers", path.display());
    }
    Ok(stack)
}

/// Reads export options from a standalone JSON file.
pub fn load_options(path: &Path) -> Result<ExportOptions> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse options {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("strata-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_stack_rejects_empty_layers() {
        let path = write_temp("empty.json", r#"{ "layers": [] }"#);
        let err = load_stack(&path).unwrap_err();
        assert!(format!("{err}").contains("contains no layers"));
    }

    #[test]
    fn test_load_stack_reads_embedded_options() {
        let path = write_temp(
            "stack.json",
            r#"{
                "layers": [{
                    "name": "Sandstone",
                    "grid_x": [[0.0, 1.0]],
                    "grid_y": [[0.0, 0.0]],
                    "top_surface_z": [[1.0, 1.0]],
                    "bottom_surface_z": [[0.0, 0.0]]
                }],
                "options": { "downsample": 2 }
            }"#,
        );
        let stack = load_stack(&path).unwrap();
        assert_eq!(stack.layers.len(), 1);
        assert_eq!(stack.options.unwrap().downsample_factor, 2);
    }

    #[test]
    fn test_load_stack_reports_parse_errors() {
        let path = write_temp("broken.json", "{ not json");
        let err = load_stack(&path).unwrap_err();
        assert!(format!("{err}").contains("failed to parse layer stack"));
    }
}
