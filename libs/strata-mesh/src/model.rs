//! # Grid Model
//!
//! Gridpoints, zones and zone groups produced by one export call, plus the
//! id allocator and the integer lattice key used for cross-layer matching.

use config::constants::COORDINATE_SCALE;
use glam::DVec3;
use std::collections::HashSet;
use std::fmt;

/// Volumetric element type of an export. One export never mixes types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneKind {
    /// 8-node hexahedral brick (`Z B8`)
    Brick,
    /// 4-node tetrahedron (`Z T4`)
    Tetra,
}

impl ZoneKind {
    /// Format tag written after `Z`.
    pub fn tag(self) -> &'static str {
        match self {
            ZoneKind::Brick => "B8",
            ZoneKind::Tetra => "T4",
        }
    }

    /// Nodes per zone.
    pub fn arity(self) -> usize {
        match self {
            ZoneKind::Brick => 8,
            ZoneKind::Tetra => 4,
        }
    }
}

impl fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneKind::Brick => write!(f, "brick"),
            ZoneKind::Tetra => write!(f, "T4"),
        }
    }
}

/// A mesh node. Ids are 1-based and unique within one export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub id: u32,
    pub position: DVec3,
}

impl GridPoint {
    /// Returns true if every coordinate is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
    }
}

/// Node ids of one zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneShape {
    /// Bottom face SW, SE, NE, NW then top face SW, SE, NE, NW
    Brick([u32; 8]),
    /// Four vertices with positive signed volume
    Tetra([u32; 4]),
}

impl ZoneShape {
    /// Returns the node ids in file order.
    pub fn node_ids(&self) -> &[u32] {
        match self {
            ZoneShape::Brick(ids) => ids,
            ZoneShape::Tetra(ids) => ids,
        }
    }

    pub fn kind(&self) -> ZoneKind {
        match self {
            ZoneShape::Brick(_) => ZoneKind::Brick,
            ZoneShape::Tetra(_) => ZoneKind::Tetra,
        }
    }

    /// Returns true if no node id appears twice.
    pub fn has_distinct_nodes(&self) -> bool {
        let ids = self.node_ids();
        ids.iter()
            .enumerate()
            .all(|(a, id)| !ids[a + 1..].contains(id))
    }
}

/// A volumetric element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone {
    pub id: u32,
    pub shape: ZoneShape,
    /// Index of the owning group in [`MeshModel::groups`]
    pub group: usize,
}

/// Zones belonging to one layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneGroup {
    /// Raw layer name; sanitized only when written
    pub name: String,
    pub zone_ids: Vec<u32>,
}

impl ZoneGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            zone_ids: Vec::new(),
        }
    }
}

/// Counts of elements dropped for having no meaningful physical extent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DegenerateReport {
    /// Tetrahedra below the volume threshold or with non-finite volume
    pub dropped_tets: usize,
    /// Bricks touching a non-finite gridpoint
    pub dropped_bricks: usize,
    /// Bricks removed by the thickness/duplicate-node filter
    pub filtered_zones: usize,
}

impl DegenerateReport {
    /// Total number of dropped elements.
    pub fn total(&self) -> usize {
        self.dropped_tets + self.dropped_bricks + self.filtered_zones
    }
}

/// Hands out consecutive 1-based gridpoint and zone ids.
///
/// One allocator belongs to one export call; nothing is shared between
/// calls.
#[derive(Debug, Clone)]
pub struct NodeAllocator {
    next_gridpoint: u32,
    next_zone: u32,
}

impl Default for NodeAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeAllocator {
    pub fn new() -> Self {
        Self {
            next_gridpoint: 1,
            next_zone: 1,
        }
    }

    /// Allocates the next gridpoint id.
    #[inline]
    pub fn gridpoint(&mut self) -> u32 {
        let id = self.next_gridpoint;
        self.next_gridpoint += 1;
        id
    }

    /// Allocates the next zone id.
    #[inline]
    pub fn zone(&mut self) -> u32 {
        let id = self.next_zone;
        self.next_zone += 1;
        id
    }

    /// Number of gridpoint ids handed out so far.
    #[inline]
    pub fn gridpoints_allocated(&self) -> usize {
        (self.next_gridpoint - 1) as usize
    }
}

/// Fixed-precision integer key of a lattice position.
///
/// Rounds `x` and `y` to six decimals by scaling with [`COORDINATE_SCALE`],
/// so keys compare and hash exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LatticeKey {
    x: i64,
    y: i64,
}

impl LatticeKey {
    /// Returns the key for `(x, y)`, or `None` if either is non-finite.
    ///
    /// # Example
    ///
    /// ```rust
    /// use strata_mesh::model::LatticeKey;
    ///
    /// let a = LatticeKey::new(100.0000004, 20.0).unwrap();
    /// let b = LatticeKey::new(100.0, 20.0000001).unwrap();
    /// assert_eq!(a, b);
    /// assert!(LatticeKey::new(f64::NAN, 0.0).is_none());
    /// ```
    pub fn new(x: f64, y: f64) -> Option<Self> {
        if !(x.is_finite() && y.is_finite()) {
            return None;
        }
        Some(Self {
            x: (x * COORDINATE_SCALE).round() as i64,
            y: (y * COORDINATE_SCALE).round() as i64,
        })
    }

    pub fn from_position(position: DVec3) -> Option<Self> {
        Self::new(position.x, position.y)
    }
}

/// The node/zone/group model of one export.
///
/// Gridpoint ids are consecutive from 1, so a gridpoint is found by index.
#[derive(Debug, Clone)]
pub struct MeshModel {
    kind: ZoneKind,
    gridpoints: Vec<GridPoint>,
    zones: Vec<Zone>,
    groups: Vec<ZoneGroup>,
    report: DegenerateReport,
}

impl MeshModel {
    /// Creates an empty model for one zone kind.
    pub fn new(kind: ZoneKind) -> Self {
        Self {
            kind,
            gridpoints: Vec::new(),
            zones: Vec::new(),
            groups: Vec::new(),
            report: DegenerateReport::default(),
        }
    }

    #[inline]
    pub fn kind(&self) -> ZoneKind {
        self.kind
    }

    /// Adds a gridpoint. Ids must arrive in allocation order.
    pub fn add_gridpoint(&mut self, point: GridPoint) {
        debug_assert_eq!(point.id as usize, self.gridpoints.len() + 1);
        self.gridpoints.push(point);
    }

    /// Adds a group and returns its index.
    pub fn add_group(&mut self, name: impl Into<String>) -> usize {
        self.groups.push(ZoneGroup::new(name));
        self.groups.len() - 1
    }

    /// Adds a zone and records it in its group.
    pub fn add_zone(&mut self, zone: Zone) {
        debug_assert_eq!(zone.shape.kind(), self.kind);
        self.groups[zone.group].zone_ids.push(zone.id);
        self.zones.push(zone);
    }

    #[inline]
    pub fn gridpoints(&self) -> &[GridPoint] {
        &self.gridpoints
    }

    #[inline]
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    #[inline]
    pub fn groups(&self) -> &[ZoneGroup] {
        &self.groups
    }

    #[inline]
    pub fn report(&self) -> &DegenerateReport {
        &self.report
    }

    #[inline]
    pub fn report_mut(&mut self) -> &mut DegenerateReport {
        &mut self.report
    }

    /// Returns the position of gridpoint `id`.
    #[inline]
    pub fn position(&self, id: u32) -> DVec3 {
        self.gridpoints[id as usize - 1].position
    }

    #[inline]
    pub fn gridpoint_count(&self) -> usize {
        self.gridpoints.len()
    }

    #[inline]
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    #[inline]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Keeps only zones for which `keep` returns true and removes the
    /// dropped ids from their groups. Returns the number removed.
    pub fn retain_zones(&mut self, mut keep: impl FnMut(&MeshModel, &Zone) -> bool) -> usize {
        let zones = std::mem::take(&mut self.zones);
        let mut dropped = HashSet::new();
        let kept: Vec<Zone> = {
            let this: &MeshModel = self;
            zones
                .into_iter()
                .filter(|z| {
                    let keep_zone = keep(this, z);
                    if !keep_zone {
                        dropped.insert(z.id);
                    }
                    keep_zone
                })
                .collect()
        };
        if !dropped.is_empty() {
            for group in &mut self.groups {
                group.zone_ids.retain(|id| !dropped.contains(id));
            }
        }
        self.zones = kept;
        dropped.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator_is_one_based() {
        let mut alloc = NodeAllocator::new();
        assert_eq!(alloc.gridpoint(), 1);
        assert_eq!(alloc.gridpoint(), 2);
        assert_eq!(alloc.zone(), 1);
        assert_eq!(alloc.gridpoints_allocated(), 2);
    }

    #[test]
    fn test_lattice_key_resolution() {
        let a = LatticeKey::new(1.0, 2.0).unwrap();
        assert_eq!(a, LatticeKey::new(1.0 + 4e-7, 2.0 - 4e-7).unwrap());
        assert_ne!(a, LatticeKey::new(1.0 + 2e-6, 2.0).unwrap());
        assert!(LatticeKey::new(1.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_distinct_nodes() {
        assert!(ZoneShape::Tetra([1, 2, 3, 4]).has_distinct_nodes());
        assert!(!ZoneShape::Brick([1, 2, 3, 4, 5, 6, 7, 1]).has_distinct_nodes());
    }

    #[test]
    fn test_retain_zones_updates_groups() {
        let mut model = MeshModel::new(ZoneKind::Tetra);
        let a = model.add_group("A");
        let b = model.add_group("B");
        for (id, group) in [(1, a), (2, a), (3, b)] {
            model.add_zone(Zone {
                id,
                shape: ZoneShape::Tetra([1, 2, 3, 4]),
                group,
            });
        }
        let removed = model.retain_zones(|_, z| z.id != 2);
        assert_eq!(removed, 1);
        assert_eq!(model.groups()[a].zone_ids, vec![1]);
        assert_eq!(model.groups()[b].zone_ids, vec![3]);
        assert_eq!(model.zone_count(), 2);
    }

    #[test]
    fn test_zone_kind_tags() {
        assert_eq!(ZoneKind::Brick.tag(), "B8");
        assert_eq!(ZoneKind::Tetra.tag(), "T4");
        assert_eq!(ZoneKind::Brick.arity(), 8);
        assert_eq!(format!("{}", ZoneKind::Tetra), "T4");
    }
}
