//! # Brick Strategy
//!
//! Builds one B8 brick per lattice cell per layer and stitches layers
//! together by reusing node ids.
//!
//! ## Node sharing
//!
//! Each layer is first built on its own ([`HexLayerBuilder`]) with local
//! node indices for a bottom grid and a top grid. [`HexMerger`] then walks
//! the layers bottom to top: layer 0 gets fresh ids for both grids, and
//! every later layer takes the ids of the layer below's top nodes for its
//! bottom nodes. Coincident but distinct nodes would leave an invisible
//! seam the simulator cannot transmit stress across.
//!
//! ## Corner order
//!
//! ```text
//!   NW(3) ---- NE(2)        bottom face: SW, SE, NE, NW  (ids 0..3)
//!     |          |          top face:    SW, SE, NE, NW  (ids 4..7)
//!   SW(0) ---- SE(1)        counter-clockwise seen from above
//! ```

use super::{PreparedStack, ZoneStrategy};
use crate::error::{ExportError, ExportResult};
use crate::filter::filter_degenerate_zones;
use crate::model::{GridPoint, LatticeKey, MeshModel, NodeAllocator, Zone, ZoneKind, ZoneShape};
use glam::DVec3;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// One layer's nodes and cells before ids are assigned.
///
/// Node `n` of the bottom grid has local index `n`; node `n` of the top
/// grid has local index `rows * cols + n`. Both grids are row-major.
#[derive(Debug, Clone)]
pub struct LayerGrid {
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    pub bottom: Vec<DVec3>,
    pub top: Vec<DVec3>,
    /// Local corner indices per cell, bottom face then top face
    pub cells: Vec<[usize; 8]>,
}

impl LayerGrid {
    /// Nodes per grid face.
    #[inline]
    pub fn face_len(&self) -> usize {
        self.rows * self.cols
    }
}

/// Builds the per-layer node grids and brick cells.
pub struct HexLayerBuilder;

impl HexLayerBuilder {
    /// Builds layer `k` of the stack.
    pub fn build(stack: &PreparedStack, k: usize) -> LayerGrid {
        let (rows, cols) = stack.shape();
        let bottom_z = stack.bottom_surface(k);
        let top_z = stack.top_surface(k);

        let mut bottom = Vec::with_capacity(rows * cols);
        let mut top = Vec::with_capacity(rows * cols);
        for j in 0..rows {
            for i in 0..cols {
                bottom.push(stack.position(k, j, i, bottom_z.get(j, i)));
                top.push(stack.position(k, j, i, top_z.get(j, i)));
            }
        }

        let face = rows * cols;
        let mut cells = Vec::with_capacity(rows.saturating_sub(1) * cols.saturating_sub(1));
        for j in 0..rows.saturating_sub(1) {
            for i in 0..cols.saturating_sub(1) {
                let sw = j * cols + i;
                let se = j * cols + i + 1;
                let ne = (j + 1) * cols + i + 1;
                let nw = (j + 1) * cols + i;
                cells.push([
                    sw,
                    se,
                    ne,
                    nw,
                    face + sw,
                    face + se,
                    face + ne,
                    face + nw,
                ]);
            }
        }

        LayerGrid {
            name: stack.layers()[k].name.clone(),
            rows,
            cols,
            bottom,
            top,
            cells,
        }
    }
}

/// Merges layer grids bottom to top into one model with shared interface
/// nodes.
pub struct HexMerger {
    tolerance: f64,
    alloc: NodeAllocator,
    model: MeshModel,
    /// Global ids of the most recently merged layer's top grid
    previous_top: Vec<u32>,
}

impl HexMerger {
    /// Creates a merger that accepts interface z-mismatches up to `tolerance`.
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            alloc: NodeAllocator::new(),
            model: MeshModel::new(ZoneKind::Brick),
            previous_top: Vec::new(),
        }
    }

    /// Merges all layers and returns the model.
    pub fn merge(mut self, layers: Vec<LayerGrid>) -> ExportResult<MeshModel> {
        for (index, layer) in layers.into_iter().enumerate() {
            self.push_layer(index, layer)?;
        }
        debug!(
            "Merge completed: {} nodes, {} zones, {} groups",
            self.model.gridpoint_count(),
            self.model.zone_count(),
            self.model.group_count()
        );
        Ok(self.model)
    }

    /// Adds one layer on top of everything merged so far.
    pub fn push_layer(&mut self, index: usize, layer: LayerGrid) -> ExportResult<()> {
        let bottom_ids = if index == 0 {
            self.add_nodes(&layer.bottom)
        } else {
            self.reuse_bottom(index, &layer)?
        };
        let top_ids = self.add_nodes(&layer.top);

        let face = layer.face_len();
        let group = self.model.add_group(layer.name.as_str());
        let mut added = 0;
        let mut dropped = 0;
        for cell in &layer.cells {
            let mut ids = [0u32; 8];
            for (slot, &local) in cell.iter().enumerate() {
                ids[slot] = if local < face {
                    bottom_ids[local]
                } else {
                    top_ids[local - face]
                };
            }
            if ids.iter().any(|&id| !self.model.position(id).is_finite()) {
                dropped += 1;
                continue;
            }
            let zone = Zone {
                id: self.alloc.zone(),
                shape: ZoneShape::Brick(ids),
                group,
            };
            self.model.add_zone(zone);
            added += 1;
        }

        if dropped > 0 {
            warn!(
                "Layer '{}': dropped {} bricks touching non-finite gridpoints",
                layer.name, dropped
            );
            self.model.report_mut().dropped_bricks += dropped;
        }
        info!(
            "Layer {} '{}': {}x{} nodes, {} zones",
            index, layer.name, layer.cols, layer.rows, added
        );

        self.previous_top = top_ids;
        Ok(())
    }

    /// Allocates fresh gridpoints for a node grid.
    fn add_nodes(&mut self, positions: &[DVec3]) -> Vec<u32> {
        positions
            .iter()
            .map(|&position| {
                let id = self.alloc.gridpoint();
                self.model.add_gridpoint(GridPoint { id, position });
                id
            })
            .collect()
    }

    /// Maps every bottom node of `layer` onto a top node of the layer below.
    fn reuse_bottom(&self, index: usize, layer: &LayerGrid) -> ExportResult<Vec<u32>> {
        let lookup: HashMap<LatticeKey, u32> = self
            .previous_top
            .iter()
            .filter_map(|&id| LatticeKey::from_position(self.model.position(id)).map(|key| (key, id)))
            .collect();

        let mut remap = Vec::with_capacity(layer.bottom.len());
        let mut max_diff = 0.0_f64;
        for old in &layer.bottom {
            let reused = LatticeKey::from_position(*old)
                .and_then(|key| lookup.get(&key).copied())
                .ok_or_else(|| ExportError::StructuralMismatch {
                    layer: index,
                    x: old.x,
                    y: old.y,
                })?;

            let diff = (old.z - self.model.position(reused).z).abs();
            if diff > self.tolerance {
                return Err(ExportError::LayerDiscontinuity {
                    layer: index,
                    x: old.x,
                    y: old.y,
                    diff,
                    tolerance: self.tolerance,
                });
            }
            if diff.is_finite() {
                max_diff = max_diff.max(diff);
            }
            remap.push(reused);
        }

        debug!(
            "Layer {} '{}': {} interface nodes reused, max z diff {:.6}",
            index,
            layer.name,
            remap.len(),
            max_diff
        );
        Ok(remap)
    }
}

/// Brick (B8) strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrickStrategy {
    /// Maximum z-mismatch for node reuse
    pub interface_tolerance: f64,
    /// Minimum zone thickness when degenerate-zone filtering is enabled
    pub min_zone_thickness: Option<f64>,
}

impl ZoneStrategy for BrickStrategy {
    fn kind(&self) -> ZoneKind {
        ZoneKind::Brick
    }

    fn repairs_by_default(&self) -> bool {
        false
    }

    fn build(&self, stack: &PreparedStack) -> ExportResult<MeshModel> {
        let grids = (0..stack.layer_count())
            .map(|k| HexLayerBuilder::build(stack, k))
            .collect();
        let mut model = HexMerger::new(self.interface_tolerance).merge(grids)?;

        if let Some(min_thickness) = self.min_zone_thickness {
            let removed = filter_degenerate_zones(&mut model, min_thickness);
            model.report_mut().filtered_zones += removed;
        }
        Ok(model)
    }
}
