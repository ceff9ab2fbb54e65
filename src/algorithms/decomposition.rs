//! Recursive, obstacle-aware binary space decomposition driver
//! (spec.md §4.6). Ported from
//! `hierarchical_decomposition_algorithm.py::HierarchicalDecomposition`.

use geo::{Area, BooleanOps, MultiPolygon};
use tracing::{debug, warn};

use crate::algorithms::axis_selector::{select_best_axis, AxisEvaluation};
use crate::config::PartitionConfig;
use crate::constants::{COVERAGE_RATIO_STOP, DRONE_THRESHOLD};
use crate::geometry::{Axis, Polygon2D, Region};

/// One leaf of the decomposition: its region, the obstacles clipped to
/// it, the sequence of axes chosen on the path from the root, and
/// whether [`is_subregion_valid`] held for it when it was stored.
#[derive(Debug, Clone)]
pub struct PartitionRecord {
    pub region: Region,
    pub obstacles: Vec<Polygon2D>,
    pub axis_history: Vec<Axis>,
    pub is_valid: bool,
}

/// Drives the recursive decomposition of `region`/`obstacles` per
/// `config`, accumulating [`PartitionRecord`]s as it goes.
pub struct HierarchicalDecomposition {
    config: PartitionConfig,
    partitions: Vec<PartitionRecord>,
    axis_stack: Vec<Axis>,
}

impl HierarchicalDecomposition {
    pub fn new(config: PartitionConfig) -> Self {
        HierarchicalDecomposition {
            config,
            partitions: Vec::new(),
            axis_stack: Vec::new(),
        }
    }

    /// Runs the decomposition to completion and returns every stored
    /// partition. If track-back mode is in effect and recursion never
    /// produced a single valid partition, the root region itself is
    /// stored so the run never silently drops its input.
    pub fn run(mut self, region: Region, obstacles: Vec<Polygon2D>) -> Vec<PartitionRecord> {
        let produced_any = self.decompose(region.clone(), obstacles.clone(), 0);

        if !produced_any {
            warn!("no valid partitions produced; storing top-level region via track-back");
            self.partitions.push(PartitionRecord {
                region,
                obstacles,
                axis_history: self.axis_stack.clone(),
                is_valid: true,
            });
        }

        self.partitions
    }

    fn decompose(&mut self, region: Region, obstacles: Vec<Polygon2D>, depth: u32) -> bool {
        let span = tracing::info_span!("decompose", depth, axis_depth = self.axis_stack.len());
        let _enter = span.enter();

        if region.is_empty() {
            debug!("region empty; track-back");
            return false;
        }

        let region_area = region.area();
        let obs_area: f64 = obstacles.iter().map(|o| o.unsigned_area()).sum();
        let coverage_ratio = if region_area > 1e-12 { obs_area / region_area } else { 1.0 };
        let free_area = region_area - obs_area;
        let largest_hole = largest_free_space_area(&region, &obstacles);

        if coverage_ratio >= COVERAGE_RATIO_STOP && free_area < DRONE_THRESHOLD && largest_hole < DRONE_THRESHOLD {
            let is_ok = self.is_subregion_valid(&region, &obstacles);
            debug!(coverage_ratio, "coverage-stop reached; storing region");
            self.store(region, obstacles, is_ok);
            return true;
        }

        if let Some(max_depth) = self.config.max_depth {
            if depth >= max_depth {
                let is_ok = self.is_subregion_valid(&region, &obstacles);
                debug!(depth, "max depth reached; storing partition");
                self.store(region, obstacles, is_ok);
                return is_ok;
            }
        }

        if !self.is_subregion_valid(&region, &obstacles) {
            debug!("subregion invalid; track-back");
            return false;
        }

        let selection = match select_best_axis(&region, &obstacles, self.config.numerical_method, self.config.tie_threshold) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "axis selection failed; track-back");
                return false;
            }
        };
        let best_axis = selection.axis;
        let chosen = selection.chosen();

        if self.attempt_partition(&region, best_axis, depth, chosen) {
            return true;
        }

        if self.config.allow_fallback_axis {
            let fallback_axis = best_axis.other();
            debug!(axis = %fallback_axis, "trying fallback axis");
            let fallback_selection = match select_best_axis(&region, &obstacles, self.config.numerical_method, self.config.tie_threshold) {
                Ok(s) => s,
                Err(_) => return false,
            };
            if fallback_selection.axis == best_axis {
                return false;
            }
            let fb_axis = fallback_selection.axis;
            let fb_chosen = fallback_selection.chosen();
            return self.attempt_partition(&region, fb_axis, depth, fb_chosen);
        }

        warn!("partition failed on both axes; track-back");
        false
    }

    fn attempt_partition(&mut self, region: &Region, axis: Axis, depth: u32, chosen: AxisEvaluation) -> bool {
        self.axis_stack.push(axis);

        let Some(bounds) = region.bounds() else {
            self.axis_stack.pop();
            return false;
        };
        let (axis_min, axis_max) = match axis {
            Axis::X => (bounds.min().x, bounds.max().x),
            Axis::Y => (bounds.min().y, bounds.max().y),
        };
        if chosen.division_point <= axis_min || chosen.division_point >= axis_max {
            debug!("degenerate division point; partition fails");
            self.axis_stack.pop();
            return false;
        }

        let (r_left, left_obs) = chosen.left;
        let (r_right, right_obs) = chosen.right;

        let left_ok = self.is_subregion_valid(&r_left, &left_obs);
        let right_ok = self.is_subregion_valid(&r_right, &right_obs);

        if !left_ok && !right_ok {
            debug!("both children invalid; partition fails");
            self.axis_stack.pop();
            return false;
        }

        let mut produced_any = false;
        if left_ok && self.decompose(r_left, left_obs, depth + 1) {
            produced_any = true;
        }
        if right_ok && self.decompose(r_right, right_obs, depth + 1) {
            produced_any = true;
        }

        self.axis_stack.pop();
        produced_any
    }

    fn is_subregion_valid(&self, region: &Region, obstacles: &[Polygon2D]) -> bool {
        if region.is_empty() {
            return false;
        }
        let Some(bounds) = region.bounds() else { return false };
        let width = bounds.width();
        let height = bounds.height();
        if width < self.config.min_dimension_threshold || height < self.config.min_dimension_threshold {
            return false;
        }

        let region_area = region.area();
        let obs_area_sum: f64 = obstacles.iter().map(|o| o.unsigned_area()).sum();
        if obs_area_sum >= region_area - 1e-9 {
            return false;
        }

        let coverage_ratio = if region_area > 1e-12 { obs_area_sum / region_area } else { 1.0 };
        if coverage_ratio >= COVERAGE_RATIO_STOP {
            let largest_hole = largest_free_space_area(region, obstacles);
            if largest_hole < DRONE_THRESHOLD {
                return false;
            }
        }

        if self.config.check_connectivity && largest_free_space_area(region, obstacles) < DRONE_THRESHOLD {
            return false;
        }

        true
    }

    fn store(&mut self, region: Region, obstacles: Vec<Polygon2D>, is_valid: bool) {
        self.partitions.push(PartitionRecord {
            region,
            obstacles,
            axis_history: self.axis_stack.clone(),
            is_valid,
        });
    }
}

/// Area of the largest connected free-space polygon within `region`
/// after subtracting the union of `obstacles`. Shared with the KD-tree
/// baselines, which apply the same connectivity/coverage checks.
pub(crate) fn largest_free_space_area(region: &Region, obstacles: &[Polygon2D]) -> f64 {
    if obstacles.is_empty() {
        return region.area();
    }
    let union_obs = obstacles
        .iter()
        .fold(MultiPolygon::new(vec![]), |acc, o| acc.union(&MultiPolygon::new(vec![o.clone()])));
    let free_space = region.as_multi_polygon().difference(&union_obs);
    free_space.0.iter().map(|p| p.unsigned_area()).fold(0.0, f64::max)
}

/// Convenience entry point: runs the hierarchical decomposition over a
/// preprocessed region/obstacle set.
pub fn decompose(region: Region, obstacles: Vec<Polygon2D>, config: PartitionConfig) -> Vec<PartitionRecord> {
    HierarchicalDecomposition::new(config).run(region, obstacles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Mode, NumericalMethod};
    use crate::geometry::rect_to_polygon;
    use geo::Rect;

    fn unit_square() -> Region {
        Region::from_polygon(rect_to_polygon(Rect::new((0.0, 0.0), (100.0, 100.0))))
    }

    #[test]
    fn empty_obstacle_region_splits_into_at_least_two_partitions() {
        let config = PartitionConfig {
            max_depth: Some(1),
            ..PartitionConfig::default()
        };
        let partitions = decompose(unit_square(), vec![], config);
        assert!(partitions.len() >= 2);
        for p in &partitions {
            assert!(p.is_valid);
        }
    }

    #[test]
    fn zero_max_depth_stores_a_single_partition() {
        let config = PartitionConfig {
            max_depth: Some(0),
            ..PartitionConfig::default()
        };
        let partitions = decompose(unit_square(), vec![], config);
        assert_eq!(partitions.len(), 1);
        assert!(partitions[0].axis_history.is_empty());
    }

    #[test]
    fn track_back_mode_never_drops_the_region_entirely() {
        let config = PartitionConfig {
            max_depth: Some(2),
            mode: Mode::TrackBack,
            numerical_method: NumericalMethod::Newton,
            ..PartitionConfig::default()
        };
        let partitions = decompose(unit_square(), vec![], config);
        let total_area: f64 = partitions.iter().map(|p| p.region.area()).sum();
        assert!(total_area > 0.0);
    }

    #[test]
    fn depth_three_produces_at_most_eight_partitions() {
        let config = PartitionConfig {
            max_depth: Some(3),
            ..PartitionConfig::default()
        };
        let partitions = decompose(unit_square(), vec![], config);
        assert!(partitions.len() <= 8);
    }
}
