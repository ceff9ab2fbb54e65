//! Validates, clips, and merges a raw region/obstacle input into the
//! normalized form the decomposition engine expects (spec.md §4.1).
//! Ported from `preprocessing.py::RegionWithObstacles`.

use tracing::warn;

use geo::Area;

use crate::error::PartitionError;
use crate::geometry::{clip_obstacle_to_region, extract_polygonal_part, polygon_from_xyz, Polygon2D, Region};

/// A validated region together with its obstacles, clipped to the
/// region and merged where they overlap.
#[derive(Debug, Clone)]
pub struct RegionWithObstacles {
    region: Region,
    /// Obstacles as clipped to the region, before merging (kept for
    /// diagnostics/visualization, matching the original's `self.obstacles`).
    obstacles: Vec<Polygon2D>,
    /// Obstacles after `unary_union`-style merging, as returned by
    /// [`RegionWithObstacles::simplified_obstacles`].
    merged_obstacles: Vec<Polygon2D>,
}

impl RegionWithObstacles {
    /// Builds a region from raw `(x, y, z)` exterior rings (Z dropped)
    /// and obstacle vertex lists, validating and repairing the region,
    /// clipping each obstacle to it, and merging overlapping obstacles.
    pub fn new(region_exterior: &[(f64, f64, f64)], obstacle_coords_list: &[Vec<(f64, f64, f64)>]) -> Result<Self, PartitionError> {
        let region_polygon = polygon_from_xyz(region_exterior);
        let region = Self::validate_and_fix_region(Region::from_polygon(region_polygon))?;

        let mut obstacles = Vec::new();
        for (i, coords) in obstacle_coords_list.iter().enumerate() {
            let Some(obstacle) = Self::create_and_validate_polygon(coords) else {
                warn!(obstacle = i + 1, "obstacle is invalid and was discarded");
                continue;
            };
            let clipped = clip_obstacle_to_region(&obstacle, &region);
            if clipped.is_empty() {
                warn!(obstacle = i + 1, "obstacle lies entirely outside the region and was discarded");
                continue;
            }
            obstacles.extend(clipped);
        }

        let merged_obstacles = Self::merge_obstacles(&obstacles);

        Ok(RegionWithObstacles {
            region,
            obstacles,
            merged_obstacles,
        })
    }

    /// Builds directly from already-constructed geometry, skipping the
    /// raw-coordinate ingestion step (used by callers that already have
    /// `geo` types, e.g. the KD-tree baselines' test harnesses).
    pub fn from_geometry(region: Region, obstacles: Vec<Polygon2D>) -> Result<Self, PartitionError> {
        let region = Self::validate_and_fix_region(region)?;
        let mut clipped_obstacles = Vec::new();
        for obstacle in &obstacles {
            let clipped = clip_obstacle_to_region(obstacle, &region);
            clipped_obstacles.extend(clipped);
        }
        let merged_obstacles = Self::merge_obstacles(&clipped_obstacles);
        Ok(RegionWithObstacles {
            region,
            obstacles: clipped_obstacles,
            merged_obstacles,
        })
    }

    fn validate_and_fix_region(region: Region) -> Result<Region, PartitionError> {
        if region.is_empty() {
            return Err(PartitionError::InvalidGeometry("region geometry is empty".into()));
        }
        let repaired = region.repaired();
        if repaired.is_empty() {
            return Err(PartitionError::InvalidGeometry(
                "region geometry could not be repaired into a valid polygon".into(),
            ));
        }
        Ok(repaired)
    }

    fn create_and_validate_polygon(coords: &[(f64, f64, f64)]) -> Option<Polygon2D> {
        if coords.len() < 3 {
            return None;
        }
        let polygon = polygon_from_xyz(coords);
        if polygon.unsigned_area() < 1e-12 {
            return None;
        }
        Some(polygon)
    }

    fn merge_obstacles(obstacles: &[Polygon2D]) -> Vec<Polygon2D> {
        if obstacles.is_empty() {
            return Vec::new();
        }
        use geo::{BooleanOps, MultiPolygon};
        let merged = obstacles
            .iter()
            .fold(MultiPolygon::new(vec![]), |acc, o| acc.union(&MultiPolygon::new(vec![o.clone()])));
        extract_polygonal_part(merged)
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    /// The raw, clipped-but-not-merged obstacles (kept for diagnostics,
    /// matching `self.obstacles` in the original).
    pub fn raw_obstacles(&self) -> &[Polygon2D] {
        &self.obstacles
    }

    /// The merged obstacles the decomposition engine should consume.
    pub fn simplified_obstacles(&self) -> &[Polygon2D] {
        &self.merged_obstacles
    }

    /// Whether the free space (region minus merged obstacles) forms a
    /// single connected polygon.
    pub fn is_connected(&self) -> bool {
        use geo::BooleanOps;
        let merged = self
            .merged_obstacles
            .iter()
            .fold(geo::MultiPolygon::new(vec![]), |acc, o| acc.union(&geo::MultiPolygon::new(vec![o.clone()])));
        let free_space = self.region.as_multi_polygon().difference(&merged);
        free_space.0.len() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rect_to_polygon;
    use geo::Rect;

    fn square(minx: f64, miny: f64, maxx: f64, maxy: f64) -> Vec<(f64, f64, f64)> {
        vec![
            (minx, miny, 0.0),
            (maxx, miny, 0.0),
            (maxx, maxy, 0.0),
            (minx, maxy, 0.0),
        ]
    }

    #[test]
    fn obstacle_outside_region_is_discarded() {
        let region_ext = square(0.0, 0.0, 10.0, 10.0);
        let obstacles = vec![square(100.0, 100.0, 110.0, 110.0)];
        let processed = RegionWithObstacles::new(&region_ext, &obstacles).unwrap();
        assert!(processed.simplified_obstacles().is_empty());
        assert!(processed.raw_obstacles().is_empty());
    }

    #[test]
    fn obstacle_inside_region_is_kept_and_clipped() {
        let region_ext = square(0.0, 0.0, 10.0, 10.0);
        let obstacles = vec![square(2.0, 2.0, 4.0, 4.0)];
        let processed = RegionWithObstacles::new(&region_ext, &obstacles).unwrap();
        assert_eq!(processed.simplified_obstacles().len(), 1);
    }

    #[test]
    fn overlapping_obstacles_are_merged() {
        let region_ext = square(0.0, 0.0, 10.0, 10.0);
        let obstacles = vec![square(1.0, 1.0, 4.0, 4.0), square(3.0, 3.0, 6.0, 6.0)];
        let processed = RegionWithObstacles::new(&region_ext, &obstacles).unwrap();
        assert_eq!(processed.simplified_obstacles().len(), 1);
    }

    #[test]
    fn empty_region_is_rejected() {
        let region = Region::from_polygon(rect_to_polygon(Rect::new((0.0, 0.0), (0.0, 0.0))));
        let err = RegionWithObstacles::from_geometry(region, vec![]).unwrap_err();
        assert!(matches!(err, PartitionError::InvalidGeometry(_)));
    }

    #[test]
    fn disjoint_obstacles_leave_region_connected() {
        let region_ext = square(0.0, 0.0, 10.0, 10.0);
        let obstacles = vec![square(1.0, 1.0, 2.0, 2.0)];
        let processed = RegionWithObstacles::new(&region_ext, &obstacles).unwrap();
        assert!(processed.is_connected());
    }
}
