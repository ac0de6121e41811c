//! # F3GRID Writer
//!
//! Serializes a [`MeshModel`] to the FLAC3D native grid text format.
//!
//! ## Format
//!
//! ```text
//! * <comment>
//! G <id> <x> <y> <z>
//! Z B8 <id> <n0> ... <n7>          (brick exports)
//! Z T4 <id> <n0> <n1> <n2> <n3>    (tetra exports)
//! ZGROUP '<name>'
//! <zone id> <zone id> ...
//! ```
//!
//! Output depends only on the model, so identical input produces a
//! byte-identical file.

use crate::error::ExportResult;
use crate::model::{MeshModel, ZoneKind};
use config::constants::{ids_per_group_line, COORDINATE_DECIMALS, FALLBACK_GROUP_NAME, GENERATOR_NAME};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, warn};

const RULE: &str = "* ====================================";

/// Lithology terms transliterated before the ASCII filter.
///
/// Longer terms come first so compound names win over their parts.
const GROUP_NAME_TERMS: &[(&str, &str)] = &[
    ("高岭质泥岩", "kaolinite_mudstone"),
    ("砂质泥岩", "sandy_mudstone"),
    ("炭质泥岩", "carbonaceous_mudstone"),
    ("风化煤", "weathered_coal"),
    ("高岭岩", "kaolinite_rock"),
    ("含砾", "conglomeratic"),
    ("泥岩", "mudstone"),
    ("砂岩", "sandstone"),
    ("煤", "coal"),
];

/// Converts a layer name into a group name the simulator parses reliably.
///
/// Known lithology terms are transliterated, every character outside
/// `[0-9A-Za-z_ ]` is stripped and surrounding spaces are trimmed. An empty
/// result becomes `"group"`.
///
/// # Example
///
/// ```rust
/// use strata_mesh::writer::sanitize_group_name;
///
/// assert_eq!(sanitize_group_name("砂质泥岩"), "sandy_mudstone");
/// assert_eq!(sanitize_group_name("3#煤"), "3coal");
/// assert_eq!(sanitize_group_name("  ★  "), "group");
/// ```
pub fn sanitize_group_name(name: &str) -> String {
    let mut sanitized = name.to_string();
    for (term, ascii) in GROUP_NAME_TERMS {
        if sanitized.contains(term) {
            sanitized = sanitized.replace(term, ascii);
        }
    }
    let sanitized: String = sanitized
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == ' ')
        .collect();
    let trimmed = sanitized.trim();
    if trimmed.is_empty() {
        FALLBACK_GROUP_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// What [`GridWriter::write_file`] put on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrittenGrid {
    pub bytes: usize,
    /// Gridpoints actually written; non-finite ones are left out
    pub gridpoints: usize,
}

/// Writes grid models as `.f3grid` text.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridWriter;

impl GridWriter {
    pub fn new() -> Self {
        Self
    }

    /// Writes `model` to `out` and returns the number of gridpoints written.
    ///
    /// Gridpoints with non-finite coordinates are skipped; no surviving zone
    /// references them.
    pub fn write<W: Write>(&self, model: &MeshModel, out: &mut W) -> io::Result<usize> {
        let kind = model.kind();
        let finite: Vec<_> = model.gridpoints().iter().filter(|g| g.is_finite()).collect();
        let written = finite.len();
        let skipped = model.gridpoint_count() - written;
        if skipped > 0 {
            warn!("Skipped {} gridpoints with non-finite coordinates", skipped);
        }

        // Header
        writeln!(out, "{RULE}")?;
        match kind {
            ZoneKind::Brick => writeln!(out, "* FLAC3D Native Grid File")?,
            ZoneKind::Tetra => writeln!(out, "* FLAC3D Native Grid File (T4)")?,
        }
        writeln!(out, "* Generated by {GENERATOR_NAME}")?;
        writeln!(out, "{RULE}")?;
        writeln!(out, "* Total GridPoints: {written}")?;
        writeln!(out, "* Total Zones: {}", model.zone_count())?;
        writeln!(out, "* Total Groups: {}", model.group_count())?;
        writeln!(out, "{RULE}")?;
        writeln!(out)?;

        // Gridpoints
        writeln!(out, "* GRIDPOINTS")?;
        writeln!(out, "*   G <id> <x> <y> <z>")?;
        for gp in finite {
            let p = gp.position;
            writeln!(
                out,
                "G {} {:.prec$} {:.prec$} {:.prec$}",
                gp.id,
                p.x,
                p.y,
                p.z,
                prec = COORDINATE_DECIMALS
            )?;
        }
        writeln!(out)?;

        // Zones
        writeln!(out, "* ZONES ({kind})")?;
        let slots: Vec<String> = (0..kind.arity()).map(|n| format!("<gp{n}>")).collect();
        writeln!(out, "*   Z {} <id> {}", kind.tag(), slots.join(" "))?;
        for zone in model.zones() {
            write!(out, "Z {} {}", kind.tag(), zone.id)?;
            for id in zone.shape.node_ids() {
                write!(out, " {id}")?;
            }
            writeln!(out)?;
        }
        writeln!(out)?;

        // Groups
        if model.group_count() > 0 {
            writeln!(out, "* ZONE GROUPS")?;
            writeln!(out, "*   ZGROUP 'name'")?;
            writeln!(out, "*   <zone_id> <zone_id> ...")?;
            let per_line = ids_per_group_line(kind.arity());
            for group in model.groups() {
                writeln!(out, "ZGROUP '{}'", sanitize_group_name(&group.name))?;
                let mut ids = group.zone_ids.clone();
                ids.sort_unstable();
                for chunk in ids.chunks(per_line) {
                    let line: Vec<String> = chunk.iter().map(u32::to_string).collect();
                    writeln!(out, "{}", line.join(" "))?;
                }
                writeln!(out)?;
            }
        }

        // Footer
        writeln!(out, "{RULE}")?;
        writeln!(out, "* End of Grid File")?;
        writeln!(out, "{RULE}")?;
        Ok(written)
    }

    /// Renders `model` to a string.
    pub fn render(&self, model: &MeshModel) -> ExportResult<String> {
        let mut buffer = Vec::new();
        self.write(model, &mut buffer)?;
        let text = String::from_utf8(buffer)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        Ok(text)
    }

    /// Writes `model` to `path`.
    ///
    /// The file is rendered in memory first and written in one call, so a
    /// failure never leaves a half-written grid behind from this crate's
    /// side.
    pub fn write_file(&self, model: &MeshModel, path: impl AsRef<Path>) -> ExportResult<WrittenGrid> {
        let path = path.as_ref();
        let mut buffer = Vec::new();
        let gridpoints = self.write(model, &mut buffer)?;
        fs::write(path, &buffer)?;
        debug!("Written {} bytes to {}", buffer.len(), path.display());
        Ok(WrittenGrid {
            bytes: buffer.len(),
            gridpoints,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GridPoint, Zone, ZoneShape};
    use glam::DVec3;

    fn single_tet() -> MeshModel {
        let mut model = MeshModel::new(ZoneKind::Tetra);
        for (id, p) in [(1, DVec3::ZERO), (2, DVec3::X), (3, DVec3::Y), (4, DVec3::Z)] {
            model.add_gridpoint(GridPoint { id, position: p });
        }
        let group = model.add_group("煤");
        model.add_zone(Zone {
            id: 1,
            shape: ZoneShape::Tetra([1, 2, 3, 4]),
            group,
        });
        model
    }

    #[test]
    fn test_sanitize_transliterates_compounds_first() {
        assert_eq!(sanitize_group_name("风化煤"), "weathered_coal");
        assert_eq!(sanitize_group_name("高岭质泥岩"), "kaolinite_mudstone");
        assert_eq!(sanitize_group_name("含砾砂岩"), "conglomeraticsandstone");
        assert_eq!(sanitize_group_name("Upper Coal-2"), "Upper Coal2");
        assert_eq!(sanitize_group_name(""), "group");
    }

    #[test]
    fn test_render_tetra_file() {
        let text = GridWriter::new().render(&single_tet()).unwrap();
        let expected = "\
* ====================================
* FLAC3D Native Grid File (T4)
* Generated by strata-grid
* ====================================
* Total GridPoints: 4
* Total Zones: 1
* Total Groups: 1
* ====================================

* GRIDPOINTS
*   G <id> <x> <y> <z>
G 1 0.000000 0.000000 0.000000
G 2 1.000000 0.000000 0.000000
G 3 0.000000 1.000000 0.000000
G 4 0.000000 0.000000 1.000000

* ZONES (T4)
*   Z T4 <id> <gp0> <gp1> <gp2> <gp3>
Z T4 1 1 2 3 4

* ZONE GROUPS
*   ZGROUP 'name'
*   <zone_id> <zone_id> ...
ZGROUP 'coal'
1

* ====================================
* End of Grid File
* ====================================
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_group_lines_wrap() {
        let mut model = single_tet();
        for id in 2..=21 {
            model.add_zone(Zone {
                id,
                shape: ZoneShape::Tetra([1, 2, 3, 4]),
                group: 0,
            });
        }
        let text = GridWriter::new().render(&model).unwrap();
        assert!(text.contains(
            "ZGROUP 'coal'\n1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20\n21\n"
        ));
    }

    #[test]
    fn test_non_finite_gridpoints_skipped() {
        let mut model = single_tet();
        model.add_gridpoint(GridPoint {
            id: 5,
            position: DVec3::new(0.0, f64::NAN, 0.0),
        });
        let text = GridWriter::new().render(&model).unwrap();
        assert!(text.contains("* Total GridPoints: 4\n"));
        assert!(!text.contains("G 5 "));

        let path = std::env::temp_dir().join(format!("strata-mesh-writer-{}.f3grid", std::process::id()));
        let written = GridWriter::new().write_file(&model, &path).unwrap();
        assert_eq!(written.gridpoints, 4);
        assert_eq!(written.bytes, text.len());
    }

    #[test]
    fn test_write_file_reports_io_error() {
        let dir = std::env::temp_dir().join("strata-mesh-writer-missing-dir");
        let _ = std::fs::remove_dir_all(&dir);
        let err = GridWriter::new()
            .write_file(&single_tet(), dir.join("out.f3grid"))
            .unwrap_err();
        assert!(matches!(err, crate::ExportError::Io(_)));
    }
}
