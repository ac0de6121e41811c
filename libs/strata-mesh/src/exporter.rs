//! # F3GRID Exporter
//!
//! Runs one export call end to end:
//!
//! ```text
//! validate → top cap → offset → downsample → interfaces → strategy → write
//! ```
//!
//! The exporter only holds options. Every call builds its own allocator and
//! model, so an instance can be reused sequentially and separate instances
//! can run concurrently.

use crate::downsample::downsample_layer;
use crate::error::{ExportError, ExportResult};
use crate::layer::Layer;
use crate::model::{DegenerateReport, LatticeKey, MeshModel, ZoneKind};
use crate::normalize::compute_offset;
use crate::options::ExportOptions;
use crate::strategy::{BrickStrategy, PreparedStack, TetraStrategy, ZoneStrategy};
use crate::writer::GridWriter;
use config::constants::{MAX_GRIDPOINTS, MIN_LATTICE_SIDE, MONOTONIC_EPSILON};
use glam::DVec3;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What an export produced.
///
/// Counts describe the written file; gridpoints with non-finite
/// coordinates are not included.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub kind: ZoneKind,
    pub gridpoints: usize,
    pub zones: usize,
    pub groups: usize,
    pub offset: DVec3,
    pub degenerate: DegenerateReport,
    pub bytes_written: usize,
}

/// Layered `.f3grid` exporter.
///
/// # Example
///
/// ```rust
/// use strata_mesh::{ExportOptions, F3GridExporter, Layer, ZoneKind};
///
/// let layers = vec![
///     Layer::flat("Mudstone", (2, 2), (0.0, 0.0), 1.0, 0.0, 5.0),
///     Layer::flat("Coal", (2, 2), (0.0, 0.0), 1.0, 5.0, 9.0),
/// ];
/// let exporter = F3GridExporter::new(ExportOptions::default());
/// let model = exporter.build(&layers, ZoneKind::Brick).unwrap();
/// assert_eq!(model.gridpoint_count(), 12);
/// assert_eq!(model.zone_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct F3GridExporter {
    options: ExportOptions,
}

impl F3GridExporter {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    #[inline]
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Returns the strategy for `kind` configured from the options.
    pub fn strategy(&self, kind: ZoneKind) -> Box<dyn ZoneStrategy> {
        match kind {
            ZoneKind::Brick => Box::new(BrickStrategy {
                interface_tolerance: self.options.interface_tolerance,
                min_zone_thickness: self
                    .options
                    .filter_bad_zones
                    .then_some(self.options.min_zone_thickness),
            }),
            ZoneKind::Tetra => Box::new(TetraStrategy {
                min_tet_volume: self.options.min_tet_volume,
            }),
        }
    }

    /// Validates the input and prepares the interface stack.
    pub fn prepare(&self, layers: &[Layer], strategy: &dyn ZoneStrategy) -> ExportResult<PreparedStack> {
        self.options.validate()?;
        validate_layers(layers)?;

        let mut layers = layers.to_vec();
        if self.options.add_top_cap {
            let cap = top_cap_layer(&layers, &self.options);
            info!("Added top cap layer '{}'", cap.name);
            layers.push(cap);
        }

        let offset = compute_offset(
            &layers,
            self.options.coordinate_offset.as_deref(),
            self.options.normalize_coords,
        )?;
        if offset != DVec3::ZERO {
            info!("Coordinate offset: ({}, {}, {})", offset.x, offset.y, offset.z);
        }

        let stride = self.options.stride();
        let layers: Vec<Layer> = layers.iter().map(|l| downsample_layer(l, stride)).collect();
        validate_lattice(&layers)?;
        if strategy.kind() == ZoneKind::Tetra {
            // Bricks report misaligned layers as StructuralMismatch while merging
            validate_shared_xy(&layers)?;
        }

        let repair = self
            .options
            .repair_interfaces
            .unwrap_or_else(|| strategy.repairs_by_default());
        debug!("Interface repair: {}", repair);
        Ok(PreparedStack::new(
            layers,
            offset,
            repair.then_some(MONOTONIC_EPSILON),
        ))
    }

    /// Builds the grid model without writing anything.
    pub fn build(&self, layers: &[Layer], kind: ZoneKind) -> ExportResult<MeshModel> {
        let strategy = self.strategy(kind);
        let stack = self.prepare(layers, strategy.as_ref())?;
        self.build_prepared(&stack, strategy.as_ref())
    }

    /// Builds the grid model and writes it to `path`.
    ///
    /// Nothing is written unless the model was built successfully.
    pub fn export(
        &self,
        layers: &[Layer],
        kind: ZoneKind,
        path: impl AsRef<Path>,
    ) -> ExportResult<ExportSummary> {
        let path = path.as_ref();
        let strategy = self.strategy(kind);
        let stack = self.prepare(layers, strategy.as_ref())?;
        let offset = stack.offset();
        let model = self.build_prepared(&stack, strategy.as_ref())?;
        let written = GridWriter::new().write_file(&model, path)?;

        let summary = ExportSummary {
            path: path.to_path_buf(),
            kind,
            gridpoints: written.gridpoints,
            zones: model.zone_count(),
            groups: model.group_count(),
            offset,
            degenerate: *model.report(),
            bytes_written: written.bytes,
        };
        info!(
            "F3GRID export completed: {} gridpoints, {} zones, {} groups -> {}",
            summary.gridpoints,
            summary.zones,
            summary.groups,
            path.display()
        );
        Ok(summary)
    }

    /// Exports brick (B8) zones.
    pub fn export_bricks(&self, layers: &[Layer], path: impl AsRef<Path>) -> ExportResult<ExportSummary> {
        self.export(layers, ZoneKind::Brick, path)
    }

    /// Exports tetrahedral (T4) zones.
    pub fn export_tetra(&self, layers: &[Layer], path: impl AsRef<Path>) -> ExportResult<ExportSummary> {
        self.export(layers, ZoneKind::Tetra, path)
    }

    fn build_prepared(&self, stack: &PreparedStack, strategy: &dyn ZoneStrategy) -> ExportResult<MeshModel> {
        let (rows, cols) = stack.shape();
        info!(
            "F3GRID export started: {} layers, {}x{} lattice, {} zones, downsample {}",
            stack.layer_count(),
            cols,
            rows,
            strategy.kind(),
            self.options.stride()
        );
        let model = strategy.build(stack)?;
        let report = model.report();
        if report.total() > 0 {
            warn!(
                "Dropped {} degenerate elements ({} tets, {} bricks, {} filtered)",
                report.total(),
                report.dropped_tets,
                report.dropped_bricks,
                report.filtered_zones
            );
        }
        Ok(model)
    }
}

/// Checks the raw layer stack before anything is allocated.
fn validate_layers(layers: &[Layer]) -> ExportResult<()> {
    let first = layers
        .first()
        .ok_or_else(|| ExportError::validation("no layers to export"))?;
    for (index, layer) in layers.iter().enumerate() {
        layer.validate(index)?;
        if layer.shape() != first.shape() {
            return Err(ExportError::validation(format!(
                "layer {index} '{}' has grid shape {:?}, layer 0 has {:?}",
                layer.name,
                layer.shape(),
                first.shape()
            )));
        }
    }
    Ok(())
}

/// Checks the downsampled lattice: at least one cell, finite XY, and a
/// gridpoint budget the writer can handle.
///
/// Non-finite elevations only drop the elements that touch them, but a
/// non-finite `grid_x`/`grid_y` sample fails the whole export: without a
/// position there is no lattice key to match layers on.
fn validate_lattice(layers: &[Layer]) -> ExportResult<()> {
    let (rows, cols) = layers[0].shape();
    if rows < MIN_LATTICE_SIDE || cols < MIN_LATTICE_SIDE {
        return Err(ExportError::validation(format!(
            "lattice of {rows}x{cols} samples has no cells; reduce downsample_factor"
        )));
    }
    for (index, layer) in layers.iter().enumerate() {
        let finite_xy = layer
            .grid_x
            .values()
            .iter()
            .chain(layer.grid_y.values())
            .all(|v| v.is_finite());
        if !finite_xy {
            return Err(ExportError::validation(format!(
                "layer {index} '{}' has non-finite grid_x/grid_y samples",
                layer.name
            )));
        }
    }
    let budget = (layers.len() + 1) * rows * cols;
    if budget > MAX_GRIDPOINTS {
        return Err(ExportError::validation(format!(
            "{budget} gridpoints exceed the limit of {MAX_GRIDPOINTS}; increase downsample_factor"
        )));
    }
    Ok(())
}

/// Checks that every layer sits on layer 0's XY lattice.
fn validate_shared_xy(layers: &[Layer]) -> ExportResult<()> {
    let base = &layers[0];
    for (index, layer) in layers.iter().enumerate().skip(1) {
        let mismatch = base
            .grid_x
            .values()
            .iter()
            .zip(base.grid_y.values())
            .zip(layer.grid_x.values().iter().zip(layer.grid_y.values()))
            .find(|&((&bx, &by), (&x, &y))| LatticeKey::new(bx, by) != LatticeKey::new(x, y));
        if let Some((_, (x, y))) = mismatch {
            return Err(ExportError::validation(format!(
                "layer {index} '{}' sample ({x}, {y}) is not on the lattice of layer 0",
                layer.name
            )));
        }
    }
    Ok(())
}

/// Builds the synthetic flat cap above the topmost layer.
fn top_cap_layer(layers: &[Layer], options: &ExportOptions) -> Layer {
    let top = &layers[layers.len() - 1];
    let (rows, cols) = top.shape();
    let cap_top = match options.top_cap_z {
        Some(z) => crate::layer::SurfaceGrid::filled(rows, cols, z),
        None => top.top_surface_z.shifted(options.top_cap_thickness),
    };
    Layer {
        name: options.top_cap_name.clone(),
        grid_x: top.grid_x.clone(),
        grid_y: top.grid_y.clone(),
        top_surface_z: cap_top,
        bottom_surface_z: top.top_surface_z.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_layers() -> Vec<Layer> {
        vec![
            Layer::flat("A", (2, 2), (0.0, 0.0), 1.0, 0.0, 5.0),
            Layer::flat("B", (2, 2), (0.0, 0.0), 1.0, 5.0, 9.0),
        ]
    }

    #[test]
    fn test_empty_layers_rejected() {
        let err = F3GridExporter::default().build(&[], ZoneKind::Brick).unwrap_err();
        assert!(matches!(err, ExportError::Validation { .. }));
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let layers = vec![
            Layer::flat("A", (2, 2), (0.0, 0.0), 1.0, 0.0, 5.0),
            Layer::flat("B", (3, 2), (0.0, 0.0), 1.0, 5.0, 9.0),
        ];
        let err = F3GridExporter::default().build(&layers, ZoneKind::Tetra).unwrap_err();
        assert!(format!("{err}").contains("layer 1"));
    }

    #[test]
    fn test_downsample_below_one_cell_rejected() {
        let layers = vec![Layer::flat("A", (3, 3), (0.0, 0.0), 1.0, 0.0, 5.0)];
        let exporter = F3GridExporter::new(ExportOptions {
            downsample_factor: 3,
            ..ExportOptions::default()
        });
        assert!(exporter.build(&layers, ZoneKind::Brick).is_err());
    }

    #[test]
    fn test_non_finite_xy_rejected() {
        let mut layers = two_layers();
        layers[1].grid_x.set(0, 0, f64::NAN);
        let err = F3GridExporter::default().build(&layers, ZoneKind::Brick).unwrap_err();
        assert!(format!("{err}").contains("non-finite grid_x"));
    }

    #[test]
    fn test_tetra_rejects_misaligned_layers() {
        let layers = vec![
            Layer::flat("A", (2, 2), (0.0, 0.0), 1.0, 0.0, 5.0),
            Layer::flat("B", (2, 2), (0.5, 0.0), 1.0, 5.0, 9.0),
        ];
        let exporter = F3GridExporter::default();
        let err = exporter.build(&layers, ZoneKind::Tetra).unwrap_err();
        assert!(format!("{err}").contains("not on the lattice of layer 0"));
        let err = exporter.build(&layers, ZoneKind::Brick).unwrap_err();
        assert!(matches!(err, ExportError::StructuralMismatch { layer: 1, .. }));
    }

    #[test]
    fn test_top_cap_from_thickness() {
        let exporter = F3GridExporter::new(ExportOptions {
            add_top_cap: true,
            top_cap_thickness: 2.0,
            ..ExportOptions::default()
        });
        let model = exporter.build(&two_layers(), ZoneKind::Brick).unwrap();
        assert_eq!(model.group_count(), 3);
        assert_eq!(model.groups()[2].name, "TopCap");
        assert_eq!(model.gridpoint_count(), 16);
        let top_z = model.gridpoints().last().unwrap().position.z;
        assert_eq!(top_z, 11.0);
    }

    #[test]
    fn test_top_cap_at_absolute_elevation() {
        let exporter = F3GridExporter::new(ExportOptions {
            add_top_cap: true,
            top_cap_z: Some(20.0),
            top_cap_name: "Overburden".to_string(),
            ..ExportOptions::default()
        });
        let model = exporter.build(&two_layers(), ZoneKind::Tetra).unwrap();
        assert_eq!(model.groups()[2].name, "Overburden");
        assert_eq!(model.gridpoint_count(), 4 * 4);
        assert_eq!(model.gridpoints().last().unwrap().position.z, 20.0);
    }

    #[test]
    fn test_normalized_offset_applied() {
        let layers = vec![
            Layer::flat("A", (2, 2), (5.0e5, 4.2e6), 10.0, 100.0, 105.0),
            Layer::flat("B", (2, 2), (5.0e5, 4.2e6), 10.0, 105.0, 110.0),
        ];
        let exporter = F3GridExporter::new(ExportOptions {
            normalize_coords: true,
            ..ExportOptions::default()
        });
        let model = exporter.build(&layers, ZoneKind::Brick).unwrap();
        assert_eq!(model.position(1), DVec3::new(-5.0, -5.0, 0.0));
    }

    #[test]
    fn test_repair_override_on_brick_path() {
        let layers = vec![
            Layer::flat("A", (2, 2), (0.0, 0.0), 1.0, 0.0, 5.0),
            Layer::flat("B", (2, 2), (0.0, 0.0), 1.0, 5.0, 5.0),
        ];
        let exporter = F3GridExporter::new(ExportOptions {
            repair_interfaces: Some(true),
            ..ExportOptions::default()
        });
        let model = exporter.build(&layers, ZoneKind::Brick).unwrap();
        assert_eq!(model.gridpoints().last().unwrap().position.z, 5.0 + MONOTONIC_EPSILON);
    }

    #[test]
    fn test_sequential_reuse_gives_fresh_ids() {
        let exporter = F3GridExporter::default();
        let first = exporter.build(&two_layers(), ZoneKind::Brick).unwrap();
        let second = exporter.build(&two_layers(), ZoneKind::Brick).unwrap();
        assert_eq!(first.gridpoints()[0].id, 1);
        assert_eq!(second.gridpoints()[0].id, 1);
        assert_eq!(first.zones(), second.zones());
    }
}
