//! # Grid Downsampling
//!
//! Strides structured grids by an integer factor, keeping every array of a
//! layer aligned.

use crate::layer::{Layer, SurfaceGrid};

/// Keeps rows and columns `0, f, 2f, …` of `grid`.
///
/// A factor of 0 or 1 returns an unchanged copy.
///
/// # Example
///
/// ```rust
/// use strata_mesh::{downsample::downsample, SurfaceGrid};
///
/// let grid = SurfaceGrid::from_fn(5, 5, |j, i| (j * 10 + i) as f64);
/// let coarse = downsample(&grid, 2);
/// assert_eq!(coarse.shape(), (3, 3));
/// assert_eq!(coarse.get(1, 2), 24.0);
/// ```
pub fn downsample(grid: &SurfaceGrid, factor: usize) -> SurfaceGrid {
    let factor = factor.max(1);
    if factor == 1 {
        return grid.clone();
    }
    let rows = grid.rows().div_ceil(factor);
    let cols = grid.cols().div_ceil(factor);
    SurfaceGrid::from_fn(rows, cols, |j, i| grid.get(j * factor, i * factor))
}

/// Strides all four arrays of a layer by the same factor.
pub fn downsample_layer(layer: &Layer, factor: usize) -> Layer {
    Layer {
        name: layer.name.clone(),
        grid_x: downsample(&layer.grid_x, factor),
        grid_y: downsample(&layer.grid_y, factor),
        top_surface_z: downsample(&layer.top_surface_z, factor),
        bottom_surface_z: downsample(&layer.bottom_surface_z, factor),
    }
}
