//! # Interface Stack
//!
//! Shared elevation surfaces between vertically adjacent layers.
//!
//! For `n` layers ordered bottom to top there are `n + 1` interfaces:
//! interface 0 is the bottom of layer 0 and interface `k ≥ 1` is the top of
//! layer `k - 1`. Layer `k` occupies the slab between interfaces `k` and
//! `k + 1`.

use crate::layer::{Layer, SurfaceGrid};
use tracing::debug;

/// The `n + 1` elevation interfaces of an `n`-layer stack.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceStack {
    surfaces: Vec<SurfaceGrid>,
}

impl InterfaceStack {
    /// Builds the interfaces of a non-empty, shape-consistent layer stack.
    ///
    /// # Example
    ///
    /// ```rust
    /// use strata_mesh::{InterfaceStack, Layer};
    ///
    /// let layers = vec![
    ///     Layer::flat("A", (2, 2), (0.0, 0.0), 1.0, 0.0, 5.0),
    ///     Layer::flat("B", (2, 2), (0.0, 0.0), 1.0, 5.0, 9.0),
    /// ];
    /// let stack = InterfaceStack::from_layers(&layers);
    /// assert_eq!(stack.len(), 3);
    /// assert_eq!(stack.surface(2).get(0, 0), 9.0);
    /// ```
    pub fn from_layers(layers: &[Layer]) -> Self {
        let mut surfaces = Vec::with_capacity(layers.len() + 1);
        if let Some(first) = layers.first() {
            surfaces.push(first.bottom_surface_z.clone());
        }
        surfaces.extend(layers.iter().map(|l| l.top_surface_z.clone()));
        Self { surfaces }
    }

    /// Number of interfaces (`layers + 1`).
    #[inline]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Number of layers between the interfaces.
    #[inline]
    pub fn layer_count(&self) -> usize {
        self.surfaces.len().saturating_sub(1)
    }

    /// Returns interface `k`.
    #[inline]
    pub fn surface(&self, k: usize) -> &SurfaceGrid {
        &self.surfaces[k]
    }

    /// Returns all interfaces, bottom first.
    #[inline]
    pub fn surfaces(&self) -> &[SurfaceGrid] {
        &self.surfaces
    }

    /// Lattice shape shared by every interface.
    pub fn shape(&self) -> (usize, usize) {
        self.surfaces.first().map_or((0, 0), SurfaceGrid::shape)
    }

    /// Enforces a minimum separation of `eps` between consecutive interfaces.
    ///
    /// Walks every column upward; whenever `interface[k] < interface[k-1] + eps`
    /// the sample is set to exactly `interface[k-1] + eps`. Samples are only
    /// ever raised, so columns that are already separated stay bit-identical.
    /// Comparisons against NaN are false, which leaves non-finite samples
    /// (and anything resting on them) untouched.
    ///
    /// Returns the number of raised samples.
    pub fn repair_monotonic(&mut self, eps: f64) -> usize {
        let (rows, cols) = self.shape();
        let mut repaired = 0;
        for j in 0..rows {
            for i in 0..cols {
                for k in 1..self.surfaces.len() {
                    let floor = self.surfaces[k - 1].get(j, i) + eps;
                    if self.surfaces[k].get(j, i) < floor {
                        self.surfaces[k].set(j, i, floor);
                        repaired += 1;
                    }
                }
            }
        }
        if repaired > 0 {
            debug!("Monotonic repair raised {} interface samples (eps {})", repaired, eps);
        }
        repaired
    }
}
