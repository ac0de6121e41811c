//! # Degenerate Zone Filter
//!
//! Removes brick zones with no meaningful physical extent, which the
//! simulator would otherwise flag on import.

use crate::model::{MeshModel, Zone};
use tracing::warn;

/// Mean top-face elevation minus mean bottom-face elevation of a brick.
///
/// Returns `None` for non-brick zones.
pub fn brick_thickness(model: &MeshModel, zone: &Zone) -> Option<f64> {
    let ids = match &zone.shape {
        crate::model::ZoneShape::Brick(ids) => ids,
        crate::model::ZoneShape::Tetra(_) => return None,
    };
    let bottom: f64 = ids[..4].iter().map(|&id| model.position(id).z).sum();
    let top: f64 = ids[4..].iter().map(|&id| model.position(id).z).sum();
    Some(top / 4.0 - bottom / 4.0)
}

/// Drops bricks with repeated node ids or a mean thickness at or below
/// `min_thickness`, and removes them from their groups.
///
/// Returns the number of zones removed. Tetra models are left alone.
pub fn filter_degenerate_zones(model: &mut MeshModel, min_thickness: f64) -> usize {
    let removed = model.retain_zones(|model, zone| {
        if !zone.shape.has_distinct_nodes() {
            return false;
        }
        match brick_thickness(model, zone) {
            // NaN thickness fails the comparison and is dropped too
            Some(thickness) => thickness > min_thickness,
            None => true,
        }
    });
    if removed > 0 {
        warn!(
            "Removed {} degenerate zones (min thickness {})",
            removed, min_thickness
        );
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GridPoint, NodeAllocator, ZoneKind, ZoneShape};
    use glam::DVec3;

    /// One unit-footprint brick per entry, each with its own nodes.
    fn model_with_bricks(thicknesses: &[f64]) -> MeshModel {
        let mut model = MeshModel::new(ZoneKind::Brick);
        let mut alloc = NodeAllocator::new();
        let group = model.add_group("layer");
        for &t in thicknesses {
            let mut ids = [0u32; 8];
            let corners = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
            for (slot, (x, y)) in corners.iter().chain(corners.iter()).enumerate() {
                let z = if slot < 4 { 0.0 } else { t };
                let id = alloc.gridpoint();
                model.add_gridpoint(GridPoint {
                    id,
                    position: DVec3::new(*x, *y, z),
                });
                ids[slot] = id;
            }
            model.add_zone(Zone {
                id: alloc.zone(),
                shape: ZoneShape::Brick(ids),
                group,
            });
        }
        model
    }

    #[test]
    fn test_thin_zones_removed() {
        let mut model = model_with_bricks(&[2.0, 1e-5, 0.5]);
        let removed = filter_degenerate_zones(&mut model, 1e-3);
        assert_eq!(removed, 1);
        assert_eq!(model.groups()[0].zone_ids, vec![1, 3]);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut model = model_with_bricks(&[1e-3]);
        assert_eq!(filter_degenerate_zones(&mut model, 1e-3), 1);
        assert_eq!(model.zone_count(), 0);
        assert!(model.groups()[0].zone_ids.is_empty());
    }

    #[test]
    fn test_inverted_zone_removed() {
        let mut model = model_with_bricks(&[-4.0]);
        assert_eq!(filter_degenerate_zones(&mut model, 1e-3), 1);
    }

    #[test]
    fn test_duplicate_nodes_removed() {
        let mut model = model_with_bricks(&[3.0]);
        let zone = model.zones()[0];
        let ZoneShape::Brick(mut ids) = zone.shape else {
            unreachable!()
        };
        ids[7] = ids[0];
        let mut rebuilt = MeshModel::new(ZoneKind::Brick);
        for gp in model.gridpoints() {
            rebuilt.add_gridpoint(*gp);
        }
        let group = rebuilt.add_group("layer");
        rebuilt.add_zone(Zone {
            id: 1,
            shape: ZoneShape::Brick(ids),
            group,
        });
        assert_eq!(filter_degenerate_zones(&mut rebuilt, 1e-3), 1);
    }

    #[test]
    fn test_brick_thickness_is_mean_difference() {
        let model = model_with_bricks(&[2.5]);
        let thickness = brick_thickness(&model, &model.zones()[0]).unwrap();
        assert_eq!(thickness, 2.5);
    }
}
