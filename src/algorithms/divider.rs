//! Obstacle-aware division of a strip-swept region into balanced left
//! and right (or bottom/top) sub-regions (spec.md §4.2). Ported from
//! `obstacle_aware_divider.py::ObstacleAwareDivider`.

use geo::{BooleanOps, MultiPolygon};

use crate::algorithms::solver::{numerical_derivative, solve_brent, solve_defensive_newton};
use crate::algorithms::strip::StripManager;
use crate::config::NumericalMethod;
use crate::constants::CASE3_NUDGE;
use crate::error::DecomposeSignal;
use crate::geometry::{extract_polygonal_part, rect_to_polygon, Axis, Polygon2D, Region};

/// The three shapes a strip-of-interest can take, per spec.md §4.2: an
/// obstacle-free strip, a regular obstacle-bearing strip, and a
/// degenerate strip whose obstacle boundary runs flush with the
/// candidate cut coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripCase {
    NoObstacle,
    Regular,
    Degenerate,
}

/// Balances WCRT across a candidate cut of the region swept by `sp`.
pub struct ObstacleAwareDivider<'a> {
    sp: &'a StripManager,
    method: NumericalMethod,
}

impl<'a> ObstacleAwareDivider<'a> {
    pub fn new(sp: &'a StripManager, method: NumericalMethod) -> Self {
        ObstacleAwareDivider { sp, method }
    }

    /// `g(cut) = WCRT_left(cut) - WCRT_right(cut)`; its root balances
    /// the two sides.
    fn g(&self, cut: f64) -> f64 {
        self.sp.calculate_wcrt_left(cut) - self.sp.calculate_wcrt_right(cut)
    }

    fn g_prime(&self, cut: f64) -> f64 {
        numerical_derivative(|x| self.g(x), cut)
    }

    /// Finds the cut coordinate balancing left/right WCRT, dispatching
    /// on the strip-of-interest's case.
    pub fn find_optimal_division_point(&self) -> Result<f64, DecomposeSignal> {
        let (coord_prev, coord_curr) = self.find_strip_of_interest()?;
        let g_prev = self.g(coord_prev);
        let g_curr = self.g(coord_curr);
        let case = self.determine_case_for_strip(coord_prev, coord_curr);

        match case {
            StripCase::NoObstacle => self.handle_case_1_or_2(coord_prev, coord_curr, g_prev, g_curr),
            StripCase::Regular => self.handle_case_1_or_2(coord_prev, coord_curr, g_prev, g_curr),
            StripCase::Degenerate => self.handle_case_3(coord_prev, coord_curr, g_prev),
        }
    }

    /// Picks the strip where left WCRT first exceeds right WCRT (a
    /// guaranteed sign crossing), or failing that, the strip with the
    /// smallest |WCRT_left - WCRT_right|.
    fn find_strip_of_interest(&self) -> Result<(f64, f64), DecomposeSignal> {
        let p_total = self.sp.calculate_total_obstacle_perimeter();
        let mut best: Option<(f64, f64)> = None;
        let mut best_diff = f64::INFINITY;

        for &(coord_prev, coord_curr) in self.sp.strips() {
            let d_left = self.sp.calculate_diagonal_at_coordinate(coord_curr);
            let p_left = self.sp.query_accumulated_perimeter(coord_curr);
            let wcrt_left = d_left + 0.5 * p_left;

            let p_right = p_total - p_left;
            let d_right = self.sp.calculate_diagonal_right(coord_curr);
            let wcrt_right = d_right + 0.5 * p_right;

            let diff = (wcrt_left - wcrt_right).abs();
            if diff < best_diff {
                best = Some((coord_prev, coord_curr));
                best_diff = diff;
            }

            if wcrt_left > wcrt_right {
                return Ok((coord_prev, coord_curr));
            }
        }

        best.ok_or(DecomposeSignal::EmptyRegion)
    }

    /// Case 1 (no obstacle perimeter in the strip) and Case 2 (regular
    /// obstacle-bearing strip) share dispatch logic in the original.
    fn determine_case_for_strip(&self, coord_prev: f64, coord_curr: f64) -> StripCase {
        let rect = self.sp.strip_rect_for(coord_prev, coord_curr);
        let obstacle_portions = self.obstacles_within_strip(rect);
        if obstacle_portions.is_empty() {
            return StripCase::NoObstacle;
        }

        if self.sp.compute_strip_perimeter(rect) < 1e-9 {
            return StripCase::NoObstacle;
        }

        for portion in &obstacle_portions {
            for edge in portion.exterior().lines() {
                let axis_aligned = match self.sp.axis() {
                    Axis::X => (edge.start.x - edge.end.x).abs() < 1e-9 && (edge.start.x - coord_curr).abs() < 1e-9,
                    Axis::Y => (edge.start.y - edge.end.y).abs() < 1e-9 && (edge.start.y - coord_curr).abs() < 1e-9,
                };
                if axis_aligned {
                    return StripCase::Degenerate;
                }
            }
        }
        StripCase::Regular
    }

    fn obstacles_within_strip(&self, rect: geo::Rect<f64>) -> Vec<Polygon2D> {
        let strip_region = Region::from_polygon(rect_to_polygon(rect));
        let mut out = Vec::new();
        for obs in self.obstacles() {
            let clipped = strip_region.intersect(&Region::from_polygon(obs.clone()));
            out.extend(extract_polygonal_part(clipped.as_multi_polygon().clone()));
        }
        out
    }

    fn obstacles(&self) -> &[Polygon2D] {
        self.sp.obstacles_ref()
    }

    fn handle_case_1_or_2(&self, c_prev: f64, c_curr: f64, g_prev: f64, g_curr: f64) -> Result<f64, DecomposeSignal> {
        if g_prev * g_curr < 0.0 {
            self.apply_numerical_method(c_prev, c_curr)
        } else {
            Ok(c_curr)
        }
    }

    /// Case 3: the strip's upper edge sits flush against an obstacle
    /// boundary. Nudge inward by `CASE3_NUDGE` and retry the bracket
    /// check against the nudged point.
    ///
    /// Note: when the nudged-point check (`g(c_curr - delta) <= 0`)
    /// triggers, this returns `c_curr` rather than the nudged point
    /// itself, matching the original's own behavior.
    fn handle_case_3(&self, c_prev: f64, c_curr: f64, g_prev: f64) -> Result<f64, DecomposeSignal> {
        let c_minus_delta = c_curr - CASE3_NUDGE;
        let g_minus_delta = self.g(c_minus_delta);

        if g_minus_delta <= 0.0 {
            return Ok(c_curr);
        }
        if g_prev * g_minus_delta < 0.0 {
            return self.apply_numerical_method(c_prev, c_minus_delta);
        }
        Ok(c_curr)
    }

    fn apply_numerical_method(&self, a: f64, b: f64) -> Result<f64, DecomposeSignal> {
        match self.method {
            NumericalMethod::Brent => solve_brent(|x| self.g(x), a, b),
            NumericalMethod::Newton => {
                let x0 = 0.5 * (a + b);
                solve_defensive_newton(|x| self.g(x), |x| self.g_prime(x), x0, (a, b))
            }
        }
    }

    /// Splits the swept region and its obstacles at `cut_coord` into a
    /// left (or bottom) and right (or top) half, clipping each obstacle
    /// to both halves and discarding non-polygonal leftovers.
    pub fn divide_region(&self, cut_coord: f64) -> Result<((Region, Vec<Polygon2D>), (Region, Vec<Polygon2D>)), DecomposeSignal> {
        let bounds = self.sp.bounds();
        let (min, max) = (bounds.min(), bounds.max());

        let (left_box, right_box) = match self.sp.axis() {
            Axis::X => (
                geo::Rect::new((min.x, min.y), (cut_coord, max.y)),
                geo::Rect::new((cut_coord, min.y), (max.x, max.y)),
            ),
            Axis::Y => (
                geo::Rect::new((min.x, min.y), (max.x, cut_coord)),
                geo::Rect::new((min.x, cut_coord), (max.x, max.y)),
            ),
        };

        let r_left = self.sp.region().intersect_box(left_box);
        let r_right = self.sp.region().intersect_box(right_box);
        if r_left.is_empty() || r_right.is_empty() {
            return Err(DecomposeSignal::DegenerateCut);
        }

        let mut left_obstacles = Vec::new();
        let mut right_obstacles = Vec::new();
        for obs in self.obstacles() {
            let obs_mp = MultiPolygon::new(vec![obs.clone()]);
            let clipped_left = obs_mp.intersection(r_left.as_multi_polygon());
            let clipped_right = obs_mp.intersection(r_right.as_multi_polygon());
            left_obstacles.extend(extract_polygonal_part(clipped_left));
            right_obstacles.extend(extract_polygonal_part(clipped_right));
        }

        Ok(((r_left, left_obstacles), (r_right, right_obstacles)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rect_to_polygon;
    use approx::assert_relative_eq;
    use geo::Rect;

    fn unit_square() -> Region {
        Region::from_polygon(rect_to_polygon(Rect::new((0.0, 0.0), (10.0, 10.0))))
    }

    #[test]
    fn empty_obstacle_region_splits_at_midpoint() {
        let sp = StripManager::new(unit_square(), vec![], Axis::X).unwrap();
        let divider = ObstacleAwareDivider::new(&sp, NumericalMethod::Newton);
        let cut = divider.find_optimal_division_point().unwrap();
        assert_relative_eq!(cut, 5.0, max_relative = 1e-6);
    }

    #[test]
    fn divide_region_splits_area_in_half_with_no_obstacles() {
        let sp = StripManager::new(unit_square(), vec![], Axis::X).unwrap();
        let divider = ObstacleAwareDivider::new(&sp, NumericalMethod::Newton);
        let cut = divider.find_optimal_division_point().unwrap();
        let ((left, _), (right, _)) = divider.divide_region(cut).unwrap();
        assert_relative_eq!(left.area(), 50.0, max_relative = 1e-6);
        assert_relative_eq!(right.area(), 50.0, max_relative = 1e-6);
    }

    #[test]
    fn divide_region_rejects_out_of_range_cut() {
        let sp = StripManager::new(unit_square(), vec![], Axis::X).unwrap();
        let divider = ObstacleAwareDivider::new(&sp, NumericalMethod::Newton);
        let err = divider.divide_region(50.0).unwrap_err();
        assert!(matches!(err, DecomposeSignal::DegenerateCut));
    }

    #[test]
    fn single_centered_obstacle_shifts_cut_away_from_midpoint() {
        let obstacle = rect_to_polygon(Rect::new((3.0, 3.0), (7.0, 7.0)));
        let sp = StripManager::new(unit_square(), vec![obstacle], Axis::X).unwrap();
        let divider = ObstacleAwareDivider::new(&sp, NumericalMethod::Brent);
        let cut = divider.find_optimal_division_point().unwrap();
        assert!(cut > 0.0 && cut < 10.0);
    }
}
