//! # Tetra Strategy
//!
//! Fills every layer cell with six T4 tetrahedra over a single shared node
//! lattice.
//!
//! One gridpoint is allocated per `(interface k, row j, col i)`, so the top
//! of layer `k` and the bottom of layer `k + 1` are the same nodes by
//! construction and no cross-layer matching is needed.
//!
//! Each cell hexahedron (corners numbered as in the brick strategy: 0..3 on
//! interface `k`, 4..7 on interface `k + 1`, SW, SE, NE, NW) is split by a
//! fan around the 0–6 diagonal. Every tetrahedron's signed volume is
//! checked before it is kept, and negative ones are flipped.

use super::{PreparedStack, ZoneStrategy};
use crate::error::ExportResult;
use crate::model::{GridPoint, MeshModel, NodeAllocator, Zone, ZoneKind, ZoneShape};
use glam::{DMat3, DVec3};
use tracing::{info, warn};

/// Six tetrahedra around the 0–6 diagonal that tile a hexahedron.
pub const HEX_TET_FAN: [[usize; 4]; 6] = [
    [0, 1, 2, 6],
    [0, 2, 3, 6],
    [0, 3, 7, 6],
    [0, 7, 4, 6],
    [0, 4, 5, 6],
    [0, 5, 1, 6],
];

/// Signed volume of the tetrahedron `p0, p1, p2, p3`.
///
/// Positive when `p1 - p0`, `p2 - p0`, `p3 - p0` form a right-handed frame.
///
/// # Example
///
/// ```rust
/// use strata_mesh::strategy::signed_tet_volume;
/// use glam::DVec3;
///
/// let v = signed_tet_volume(DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z);
/// assert!((v - 1.0 / 6.0).abs() < 1e-12);
/// let flipped = signed_tet_volume(DVec3::ZERO, DVec3::Y, DVec3::X, DVec3::Z);
/// assert!((flipped + 1.0 / 6.0).abs() < 1e-12);
/// ```
#[inline]
pub fn signed_tet_volume(p0: DVec3, p1: DVec3, p2: DVec3, p3: DVec3) -> f64 {
    DMat3::from_cols(p1 - p0, p2 - p0, p3 - p0).determinant() / 6.0
}

/// Builds the shared lattice and tetrahedral zones.
pub struct TetraMeshBuilder {
    min_volume: f64,
    alloc: NodeAllocator,
    model: MeshModel,
}

impl TetraMeshBuilder {
    /// Creates a builder that drops tetrahedra with `|V| < min_volume`.
    pub fn new(min_volume: f64) -> Self {
        Self {
            min_volume,
            alloc: NodeAllocator::new(),
            model: MeshModel::new(ZoneKind::Tetra),
        }
    }

    /// Builds the whole stack.
    pub fn build(mut self, stack: &PreparedStack) -> MeshModel {
        let lattice = self.allocate_lattice(stack);
        let (rows, cols) = stack.shape();
        let node = |k: usize, j: usize, i: usize| lattice[(k * rows + j) * cols + i];

        for (k, layer) in stack.layers().iter().enumerate() {
            let group = self.model.add_group(layer.name.as_str());
            let mut added = 0;
            let mut dropped = 0;
            for j in 0..rows.saturating_sub(1) {
                for i in 0..cols.saturating_sub(1) {
                    let hex = [
                        node(k, j, i),
                        node(k, j, i + 1),
                        node(k, j + 1, i + 1),
                        node(k, j + 1, i),
                        node(k + 1, j, i),
                        node(k + 1, j, i + 1),
                        node(k + 1, j + 1, i + 1),
                        node(k + 1, j + 1, i),
                    ];
                    let (kept, skipped) = self.add_hex(hex, group);
                    added += kept;
                    dropped += skipped;
                }
            }
            if dropped > 0 {
                warn!(
                    "Layer '{}': skipped {} degenerate tetrahedra (|V| < {})",
                    layer.name, dropped, self.min_volume
                );
                self.model.report_mut().dropped_tets += dropped;
            }
            info!("Layer {} '{}': {} T4 zones", k, layer.name, added);
        }
        self.model
    }

    /// Allocates one gridpoint per interface sample, interface-major then
    /// row-major. Returns the ids in that order.
    fn allocate_lattice(&mut self, stack: &PreparedStack) -> Vec<u32> {
        let (rows, cols) = stack.shape();
        let interfaces = stack.interfaces();
        let mut ids = Vec::with_capacity(interfaces.len() * rows * cols);
        // XY comes from the bottom layer's lattice for every interface
        for surface in interfaces.surfaces() {
            for j in 0..rows {
                for i in 0..cols {
                    let id = self.alloc.gridpoint();
                    let position = stack.position(0, j, i, surface.get(j, i));
                    self.model.add_gridpoint(GridPoint { id, position });
                    ids.push(id);
                }
            }
        }
        ids
    }

    /// Adds the fan tetrahedra of one hexahedron. Returns `(kept, dropped)`.
    fn add_hex(&mut self, hex: [u32; 8], group: usize) -> (usize, usize) {
        let mut kept = 0;
        let mut dropped = 0;
        for [a, b, c, d] in HEX_TET_FAN {
            let (ga, mut gb, mut gc, gd) = (hex[a], hex[b], hex[c], hex[d]);
            let volume = signed_tet_volume(
                self.model.position(ga),
                self.model.position(gb),
                self.model.position(gc),
                self.model.position(gd),
            );
            if !volume.is_finite() || volume.abs() < self.min_volume {
                dropped += 1;
                continue;
            }
            if volume < 0.0 {
                std::mem::swap(&mut gb, &mut gc);
            }
            let zone = Zone {
                id: self.alloc.zone(),
                shape: ZoneShape::Tetra([ga, gb, gc, gd]),
                group,
            };
            self.model.add_zone(zone);
            kept += 1;
        }
        (kept, dropped)
    }
}

/// Tetra (T4) strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TetraStrategy {
    /// Minimum absolute tetrahedron volume
    pub min_tet_volume: f64,
}

impl ZoneStrategy for TetraStrategy {
    fn kind(&self) -> ZoneKind {
        ZoneKind::Tetra
    }

    fn repairs_by_default(&self) -> bool {
        true
    }

    fn build(&self, stack: &PreparedStack) -> ExportResult<MeshModel> {
        Ok(TetraMeshBuilder::new(self.min_tet_volume).build(stack))
    }
}
