//! # Zone Strategies
//!
//! The two interchangeable ways of filling the space between interfaces
//! with volumetric zones. Both consume the same [`PreparedStack`] and
//! produce a [`MeshModel`], so the writer and the tests do not care which
//! one ran.
//!
//! - [`BrickStrategy`]: one B8 brick per lattice cell per layer, with
//!   node ids reused across layer boundaries
//! - [`TetraStrategy`]: one shared node lattice, six T4 tetrahedra per cell

pub mod brick;
pub mod tetra;

pub use brick::{BrickStrategy, HexLayerBuilder, HexMerger, LayerGrid};
pub use tetra::{signed_tet_volume, TetraMeshBuilder, TetraStrategy, HEX_TET_FAN};

use crate::error::ExportResult;
use crate::interface::InterfaceStack;
use crate::layer::{Layer, SurfaceGrid};
use crate::model::{MeshModel, ZoneKind};
use glam::DVec3;

/// Downsampled layers plus their interfaces and the coordinate offset.
///
/// Built once per export call and only read by the strategies.
#[derive(Debug, Clone)]
pub struct PreparedStack {
    layers: Vec<Layer>,
    interfaces: InterfaceStack,
    offset: DVec3,
    repaired: bool,
}

impl PreparedStack {
    /// Creates a stack from validated, downsampled layers.
    ///
    /// When `repair_eps` is set the interfaces are made monotonic before
    /// any strategy sees them.
    pub fn new(layers: Vec<Layer>, offset: DVec3, repair_eps: Option<f64>) -> Self {
        let mut interfaces = InterfaceStack::from_layers(&layers);
        if let Some(eps) = repair_eps {
            interfaces.repair_monotonic(eps);
        }
        Self {
            layers,
            interfaces,
            offset,
            repaired: repair_eps.is_some(),
        }
    }

    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[inline]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn interfaces(&self) -> &InterfaceStack {
        &self.interfaces
    }

    #[inline]
    pub fn offset(&self) -> DVec3 {
        self.offset
    }

    /// Returns true if the interfaces went through monotonic repair.
    #[inline]
    pub fn is_repaired(&self) -> bool {
        self.repaired
    }

    /// Lattice shape `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        self.interfaces.shape()
    }

    /// Surface the bottom nodes of layer `k` are taken from.
    ///
    /// Layer 0 and repaired stacks use the shared interface; otherwise each
    /// layer keeps its own bottom so that gaps against the layer below can
    /// be detected.
    pub fn bottom_surface(&self, k: usize) -> &SurfaceGrid {
        if k == 0 || self.repaired {
            self.interfaces.surface(k)
        } else {
            &self.layers[k].bottom_surface_z
        }
    }

    /// Surface the top nodes of layer `k` are taken from.
    #[inline]
    pub fn top_surface(&self, k: usize) -> &SurfaceGrid {
        self.interfaces.surface(k + 1)
    }

    /// Offset-corrected position of lattice sample `(j, i)` of layer `k` at
    /// elevation `z`.
    #[inline]
    pub fn position(&self, k: usize, j: usize, i: usize, z: f64) -> DVec3 {
        let layer = &self.layers[k];
        DVec3::new(layer.grid_x.get(j, i), layer.grid_y.get(j, i), z) - self.offset
    }
}

/// A way of turning a prepared stack into zones.
pub trait ZoneStrategy {
    /// Element type this strategy emits.
    fn kind(&self) -> ZoneKind;

    /// Whether interfaces are repaired when the caller does not say.
    fn repairs_by_default(&self) -> bool;

    /// Builds gridpoints, zones and groups for the whole stack.
    fn build(&self, stack: &PreparedStack) -> ExportResult<MeshModel>;
}
