//! # Strata Mesh
//!
//! Converts a stack of geological layers into a FLAC3D native grid
//! (`.f3grid`) with one zone group per layer.
//!
//! ## Architecture
//!
//! ```text
//! Layer[] → offset/downsample → InterfaceStack → ZoneStrategy → MeshModel → GridWriter
//! ```
//!
//! ## Zone Strategies
//!
//! - **Brick (B8)**: one hexahedral zone per lattice cell per layer; nodes on
//!   a shared interface are reused by lattice lookup
//! - **Tetra (T4)**: one shared node lattice over all interfaces, six
//!   positive-volume tetrahedra per cell
//!
//! ## Usage
//!
//! ```rust
//! use strata_mesh::{ExportOptions, F3GridExporter, Layer, ZoneKind};
//!
//! let layers = vec![Layer::flat("Sandstone", (3, 3), (0.0, 0.0), 10.0, 0.0, 4.0)];
//! let model = F3GridExporter::new(ExportOptions::default())
//!     .build(&layers, ZoneKind::Tetra)
//!     .unwrap();
//! assert_eq!(model.zone_count(), 4 * 6);
//! ```

pub mod downsample;
pub mod error;
pub mod exporter;
pub mod filter;
pub mod interface;
pub mod layer;
pub mod model;
pub mod normalize;
pub mod options;
pub mod strategy;
pub mod writer;

pub use error::{ExportError, ExportResult};
pub use exporter::{ExportSummary, F3GridExporter};
pub use interface::InterfaceStack;
pub use layer::{Layer, SurfaceGrid};
pub use model::{DegenerateReport, MeshModel, ZoneKind};
pub use options::ExportOptions;
pub use strategy::ZoneStrategy;
pub use writer::{GridWriter, WrittenGrid};
