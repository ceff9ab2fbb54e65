//! Two KD-tree partitioning baselines used to benchmark the
//! obstacle-aware decomposition against simpler recursive splitting
//! strategies (spec.md §4.7). Ported from
//! `kd_tree_naive_decomposition.py::NaiveKDTreePartitioning` and
//! `kd_tree_perimeter_decomposition.py::KDTreePartitioning`.

use geo::Area;
use tracing::debug;

use crate::algorithms::divider::ObstacleAwareDivider;
use crate::algorithms::strip::StripManager;
use crate::config::NumericalMethod;
use crate::constants::{COVERAGE_RATIO_STOP, DRONE_THRESHOLD};
use crate::geometry::{rect_to_polygon, Axis, Polygon2D, Region};

/// A leaf produced by either KD-tree baseline: no axis history or
/// validity flag is tracked, matching the simpler `(region, obstacles)`
/// tuple the originals store.
#[derive(Debug, Clone)]
pub struct KdPartition {
    pub region: Region,
    pub obstacles: Vec<Polygon2D>,
}

/// Shared stopping-rule knobs for both baselines.
#[derive(Debug, Clone, Copy)]
pub struct KdConfig {
    pub max_depth: u32,
    pub min_area_threshold: f64,
    pub advanced_checks: bool,
    pub check_connectivity: bool,
}

impl Default for KdConfig {
    fn default() -> Self {
        KdConfig {
            max_depth: 3,
            min_area_threshold: 1e-3,
            advanced_checks: false,
            check_connectivity: false,
        }
    }
}

fn check_coverage_and_stop(region: &Region, obstacles: &[Polygon2D]) -> bool {
    let region_area = region.area();
    let obs_area: f64 = obstacles.iter().map(|o| o.unsigned_area()).sum();
    let coverage_ratio = if region_area > 1e-12 { obs_area / region_area } else { 1.0 };
    let free_area = region_area - obs_area;
    if coverage_ratio >= COVERAGE_RATIO_STOP {
        let largest_hole = largest_free_space_area(region, obstacles);
        return free_area < DRONE_THRESHOLD && largest_hole < DRONE_THRESHOLD;
    }
    false
}

fn is_subregion_valid(region: &Region, obstacles: &[Polygon2D], config: &KdConfig) -> bool {
    if region.is_empty() {
        return false;
    }
    let Some(bounds) = region.bounds() else { return false };
    if bounds.width() < config.min_area_threshold || bounds.height() < config.min_area_threshold {
        return false;
    }
    let region_area = region.area();
    let obs_area_sum: f64 = obstacles.iter().map(|o| o.unsigned_area()).sum();
    if obs_area_sum >= region_area - 1e-9 {
        return false;
    }
    if config.check_connectivity && largest_free_space_area(region, obstacles) < DRONE_THRESHOLD {
        return false;
    }
    true
}

fn largest_free_space_area(region: &Region, obstacles: &[Polygon2D]) -> f64 {
    crate::algorithms::decomposition::largest_free_space_area(region, obstacles)
}

/// Splits purely at the bounding-box midpoint along the alternating
/// axis; obstacle geometry only affects clipping, never where the cut
/// falls.
pub fn naive_kd_partition(region: Region, obstacles: Vec<Polygon2D>, config: KdConfig) -> Vec<KdPartition> {
    let mut partitions = Vec::new();
    naive_kd_recurse(region, obstacles, config.max_depth, Axis::X, &config, &mut partitions);
    partitions
}

fn naive_kd_recurse(
    region: Region,
    obstacles: Vec<Polygon2D>,
    depth: u32,
    axis: Axis,
    config: &KdConfig,
    out: &mut Vec<KdPartition>,
) {
    if depth == 0 || region.area() < config.min_area_threshold {
        debug!(depth, area = region.area(), "naive kd-tree stop: depth or area threshold");
        out.push(KdPartition { region, obstacles });
        return;
    }

    if region.is_empty() {
        out.push(KdPartition { region, obstacles });
        return;
    }

    if config.advanced_checks && check_coverage_and_stop(&region, &obstacles) {
        out.push(KdPartition { region, obstacles });
        return;
    }

    let Some(bounds) = region.bounds() else {
        out.push(KdPartition { region, obstacles });
        return;
    };
    let division_point = match axis {
        Axis::X => 0.5 * (bounds.min().x + bounds.max().x),
        Axis::Y => 0.5 * (bounds.min().y + bounds.max().y),
    };

    let (left_rect, right_rect) = match axis {
        Axis::X => (
            geo::Rect::new((bounds.min().x, bounds.min().y), (division_point, bounds.max().y)),
            geo::Rect::new((division_point, bounds.min().y), (bounds.max().x, bounds.max().y)),
        ),
        Axis::Y => (
            geo::Rect::new((bounds.min().x, bounds.min().y), (bounds.max().x, division_point)),
            geo::Rect::new((bounds.min().x, division_point), (bounds.max().x, bounds.max().y)),
        ),
    };

    let mut left_obs = Vec::new();
    let mut right_obs = Vec::new();
    for obs in &obstacles {
        left_obs.extend(crate::geometry::clip_obstacle_to_region(obs, &Region::from_polygon(rect_to_polygon(left_rect))));
        right_obs.extend(crate::geometry::clip_obstacle_to_region(obs, &Region::from_polygon(rect_to_polygon(right_rect))));
    }

    let mut left_region = Some(region.intersect_box(left_rect));
    let mut right_region = Some(region.intersect_box(right_rect));

    if config.advanced_checks {
        if let Some(r) = &left_region {
            if !is_subregion_valid(r, &left_obs, config) {
                left_region = None;
            }
        }
        if let Some(r) = &right_region {
            if !is_subregion_valid(r, &right_obs, config) {
                right_region = None;
            }
        }
    }

    if let Some(r) = &left_region {
        if let Some(b) = r.bounds() {
            if b.width() < config.min_area_threshold || b.height() < config.min_area_threshold {
                left_region = None;
            }
        }
    }
    if let Some(r) = &right_region {
        if let Some(b) = r.bounds() {
            if b.width() < config.min_area_threshold || b.height() < config.min_area_threshold {
                right_region = None;
            }
        }
    }

    if left_region.is_none() && right_region.is_none() {
        out.push(KdPartition {
            region: region.clone(),
            obstacles,
        });
        return;
    }

    let next_axis = axis.other();
    if let Some(r) = left_region {
        naive_kd_recurse(r, left_obs, depth - 1, next_axis, config, out);
    }
    if let Some(r) = right_region {
        naive_kd_recurse(r, right_obs, depth - 1, next_axis, config, out);
    }
}

/// Splits at the coordinate where cumulative obstacle perimeter first
/// reaches half the total, then clips region and obstacles using the
/// same [`ObstacleAwareDivider::divide_region`] as the main engine.
pub fn half_perimeter_kd_partition(region: Region, obstacles: Vec<Polygon2D>, config: KdConfig) -> Vec<KdPartition> {
    let mut partitions = Vec::new();
    half_perimeter_kd_recurse(region, obstacles, config.max_depth, Axis::X, &config, &mut partitions);
    partitions
}

fn half_perimeter_kd_recurse(
    region: Region,
    obstacles: Vec<Polygon2D>,
    depth: u32,
    axis: Axis,
    config: &KdConfig,
    out: &mut Vec<KdPartition>,
) {
    if depth == 0 || region.area() < config.min_area_threshold || region.is_empty() {
        out.push(KdPartition { region, obstacles });
        return;
    }

    if config.advanced_checks && check_coverage_and_stop(&region, &obstacles) {
        out.push(KdPartition { region, obstacles });
        return;
    }

    let Ok(sp) = StripManager::new(region.clone(), obstacles.clone(), axis) else {
        out.push(KdPartition { region, obstacles });
        return;
    };

    let total_perimeter = sp.calculate_total_obstacle_perimeter();
    let half_perimeter = total_perimeter / 2.0;

    let mut division_point = None;
    for &(_coord_prev, coord_curr) in sp.strips() {
        if sp.query_accumulated_perimeter(coord_curr) >= half_perimeter {
            division_point = Some(coord_curr);
            break;
        }
    }

    let Some(division_point) = division_point else {
        out.push(KdPartition { region, obstacles });
        return;
    };

    let divider = ObstacleAwareDivider::new(&sp, NumericalMethod::Newton);
    let Ok(((r_left, left_obs), (r_right, right_obs))) = divider.divide_region(division_point) else {
        out.push(KdPartition { region, obstacles });
        return;
    };

    let mut left_ok = true;
    let mut right_ok = true;

    if config.advanced_checks {
        left_ok = is_subregion_valid(&r_left, &left_obs, config);
        right_ok = is_subregion_valid(&r_right, &right_obs, config);
    }

    if left_ok {
        if let Some(b) = r_left.bounds() {
            if b.width() < config.min_area_threshold || b.height() < config.min_area_threshold {
                left_ok = false;
            }
        }
    }
    if right_ok {
        if let Some(b) = r_right.bounds() {
            if b.width() < config.min_area_threshold || b.height() < config.min_area_threshold {
                right_ok = false;
            }
        }
    }

    if !left_ok && !right_ok {
        out.push(KdPartition {
            region: region.clone(),
            obstacles,
        });
        return;
    }

    let next_axis = axis.other();
    if left_ok {
        half_perimeter_kd_recurse(r_left, left_obs, depth - 1, next_axis, config, out);
    }
    if right_ok {
        half_perimeter_kd_recurse(r_right, right_obs, depth - 1, next_axis, config, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Rect;

    fn unit_square() -> Region {
        Region::from_polygon(rect_to_polygon(Rect::new((0.0, 0.0), (100.0, 100.0))))
    }

    #[test]
    fn naive_kd_partition_depth_one_splits_in_two() {
        let config = KdConfig { max_depth: 1, ..KdConfig::default() };
        let partitions = naive_kd_partition(unit_square(), vec![], config);
        assert_eq!(partitions.len(), 2);
        assert!(partitions.iter().all(|p| (p.region.area() - 5000.0).abs() < 1e-6));
    }

    #[test]
    fn naive_kd_partition_depth_zero_keeps_whole_region() {
        let config = KdConfig { max_depth: 0, ..KdConfig::default() };
        let partitions = naive_kd_partition(unit_square(), vec![], config);
        assert_eq!(partitions.len(), 1);
        assert!((partitions[0].region.area() - 10000.0).abs() < 1e-6);
    }

    #[test]
    fn half_perimeter_kd_partition_with_no_obstacles_stores_whole_region() {
        let config = KdConfig { max_depth: 2, ..KdConfig::default() };
        let partitions = half_perimeter_kd_partition(unit_square(), vec![], config);
        assert!(!partitions.is_empty());
        let total_area: f64 = partitions.iter().map(|p| p.region.area()).sum();
        assert!((total_area - 10000.0).abs() < 1e-3);
    }
}
