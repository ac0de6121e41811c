//! # Layer Input
//!
//! Structured surface grids and the per-layer input record.
//!
//! Grids are row-major `rows × cols` arrays of `f64`. Row `j` runs along
//! +y and column `i` along +x, so cell `(j, i)` has its south-west corner
//! at `(j, i)` and its north-east corner at `(j + 1, i + 1)`.

use crate::error::{ExportError, ExportResult};
use serde::{Deserialize, Serialize};

/// A structured 2D grid of samples.
///
/// Serializes as nested arrays; `null` entries are read as NaN so masked
/// survey cells survive a JSON round trip.
///
/// # Example
///
/// ```rust
/// use strata_mesh::SurfaceGrid;
///
/// let grid = SurfaceGrid::from_rows(vec![vec![0.0, 1.0], vec![2.0, 3.0]]).unwrap();
/// assert_eq!(grid.shape(), (2, 2));
/// assert_eq!(grid.get(1, 0), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Option<f64>>>", into = "Vec<Vec<Option<f64>>>")]
pub struct SurfaceGrid {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl SurfaceGrid {
    /// Creates a grid from row-major values.
    pub fn new(rows: usize, cols: usize, values: Vec<f64>) -> ExportResult<Self> {
        if values.len() != rows * cols {
            return Err(ExportError::validation(format!(
                "grid of shape ({rows}, {cols}) needs {} values, got {}",
                rows * cols,
                values.len()
            )));
        }
        Ok(Self { rows, cols, values })
    }

    /// Creates a grid with every sample set to `value`.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            values: vec![value; rows * cols],
        }
    }

    /// Creates a grid by evaluating `f(j, i)` at every sample.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut values = Vec::with_capacity(rows * cols);
        for j in 0..rows {
            for i in 0..cols {
                values.push(f(j, i));
            }
        }
        Self { rows, cols, values }
    }

    /// Creates a grid from nested rows. Ragged input is rejected.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> ExportResult<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let row_count = rows.len();
        let mut values = Vec::with_capacity(row_count * cols);
        for (j, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(ExportError::validation(format!(
                    "ragged grid: row {j} has {} columns, expected {cols}",
                    row.len()
                )));
            }
            values.extend(row);
        }
        Ok(Self {
            rows: row_count,
            cols,
            values,
        })
    }

    /// Returns `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns true if the grid has no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the sample at row `j`, column `i`.
    #[inline]
    pub fn get(&self, j: usize, i: usize) -> f64 {
        self.values[j * self.cols + i]
    }

    /// Sets the sample at row `j`, column `i`.
    #[inline]
    pub fn set(&mut self, j: usize, i: usize, value: f64) {
        self.values[j * self.cols + i] = value;
    }

    /// Returns the samples in row-major order.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterates over the finite samples only.
    pub fn finite_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied().filter(|v| v.is_finite())
    }

    /// Returns a new grid with `offset` added to every sample.
    pub fn shifted(&self, offset: f64) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            values: self.values.iter().map(|v| v + offset).collect(),
        }
    }

    /// Returns `(min, max)` over finite samples, or `None` if there are none.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.finite_values().fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

impl TryFrom<Vec<Vec<Option<f64>>>> for SurfaceGrid {
    type Error = ExportError;

    fn try_from(rows: Vec<Vec<Option<f64>>>) -> Result<Self, Self::Error> {
        Self::from_rows(
            rows.into_iter()
                .map(|row| row.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
                .collect(),
        )
    }
}

impl From<SurfaceGrid> for Vec<Vec<Option<f64>>> {
    fn from(grid: SurfaceGrid) -> Self {
        if grid.cols == 0 {
            return vec![Vec::new(); grid.rows];
        }
        grid.values
            .chunks(grid.cols)
            .map(|row| {
                row.iter()
                    .map(|v| if v.is_finite() { Some(*v) } else { None })
                    .collect()
            })
            .collect()
    }
}

/// One geological stratum: top and bottom elevation surfaces over an XY
/// lattice.
///
/// Layers are supplied bottom to top. All layers of one stack share the
/// same lattice shape and XY values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Layer name, used as the zone group name after sanitization
    pub name: String,
    /// X coordinate of every lattice sample
    pub grid_x: SurfaceGrid,
    /// Y coordinate of every lattice sample
    pub grid_y: SurfaceGrid,
    /// Elevation of the layer's top surface
    pub top_surface_z: SurfaceGrid,
    /// Elevation of the layer's bottom surface
    pub bottom_surface_z: SurfaceGrid,
}

impl Layer {
    /// Creates a layer from its four grids.
    pub fn new(
        name: impl Into<String>,
        grid_x: SurfaceGrid,
        grid_y: SurfaceGrid,
        top_surface_z: SurfaceGrid,
        bottom_surface_z: SurfaceGrid,
    ) -> Self {
        Self {
            name: name.into(),
            grid_x,
            grid_y,
            top_surface_z,
            bottom_surface_z,
        }
    }

    /// Creates a layer over a regular lattice with constant top and bottom.
    ///
    /// Sample `(j, i)` sits at `(origin.0 + i * spacing, origin.1 + j * spacing)`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use strata_mesh::Layer;
    ///
    /// let layer = Layer::flat("Sandstone", (2, 3), (0.0, 0.0), 10.0, 0.0, 5.0);
    /// assert_eq!(layer.shape(), (2, 3));
    /// assert_eq!(layer.grid_x.get(0, 2), 20.0);
    /// ```
    pub fn flat(
        name: impl Into<String>,
        shape: (usize, usize),
        origin: (f64, f64),
        spacing: f64,
        bottom: f64,
        top: f64,
    ) -> Self {
        let (rows, cols) = shape;
        Self {
            name: name.into(),
            grid_x: SurfaceGrid::from_fn(rows, cols, |_, i| origin.0 + i as f64 * spacing),
            grid_y: SurfaceGrid::from_fn(rows, cols, |j, _| origin.1 + j as f64 * spacing),
            top_surface_z: SurfaceGrid::filled(rows, cols, top),
            bottom_surface_z: SurfaceGrid::filled(rows, cols, bottom),
        }
    }

    /// Returns the lattice shape `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.grid_x.shape()
    }

    /// Checks that the four grids of this layer share one non-empty shape.
    pub fn validate(&self, index: usize) -> ExportResult<()> {
        let shape = self.grid_x.shape();
        if shape.0 == 0 || shape.1 == 0 {
            return Err(ExportError::validation(format!(
                "layer {index} '{}' has an empty grid",
                self.name
            )));
        }
        for (field, grid) in [
            ("grid_y", &self.grid_y),
            ("top_surface_z", &self.top_surface_z),
            ("bottom_surface_z", &self.bottom_surface_z),
        ] {
            if grid.shape() != shape {
                return Err(ExportError::validation(format!(
                    "layer {index} '{}': {field} has shape {:?}, grid_x has {:?}",
                    self.name,
                    grid.shape(),
                    shape
                )));
            }
        }
        Ok(())
    }
}
