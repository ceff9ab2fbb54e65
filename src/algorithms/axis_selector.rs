//! Picks the sweep axis (x or y) that best balances WCRT between the two
//! halves of a cut, with a squareness tie-break (spec.md §4.5). Ported
//! from `optimal_axis_selection.py::OptimalAxisSelection`.

use crate::algorithms::divider::ObstacleAwareDivider;
use crate::algorithms::strip::StripManager;
use crate::config::NumericalMethod;
use crate::constants::EPS;
use crate::error::DecomposeSignal;
use crate::geometry::{Axis, Polygon2D, Region};

/// Everything produced by evaluating one axis: its NWCRT score, the
/// MSDU tie-break value, the chosen cut, and the resulting subregions —
/// kept together so [`select_best_axis`] never recomputes the cut for
/// whichever axis wins.
pub struct AxisEvaluation {
    pub nwcrt: f64,
    pub msdu: f64,
    pub division_point: f64,
    pub left: (Region, Vec<Polygon2D>),
    pub right: (Region, Vec<Polygon2D>),
}

/// Result of [`select_best_axis`].
pub struct AxisSelection {
    pub axis: Axis,
    pub x: AxisEvaluation,
    pub y: AxisEvaluation,
}

impl AxisSelection {
    pub fn chosen(self) -> AxisEvaluation {
        match self.axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

pub fn evaluate_axis(
    region: &Region,
    obstacles: &[Polygon2D],
    axis: Axis,
    numerical_method: NumericalMethod,
) -> Result<AxisEvaluation, DecomposeSignal> {
    let sp = StripManager::new(region.clone(), obstacles.to_vec(), axis)?;
    let divider = ObstacleAwareDivider::new(&sp, numerical_method);

    let division_point = divider.find_optimal_division_point()?;
    let ((r_left, left_obstacles), (r_right, right_obstacles)) = divider.divide_region(division_point)?;

    let left_sm = StripManager::new(r_left.clone(), left_obstacles.clone(), axis)?;
    let right_sm = StripManager::new(r_right.clone(), right_obstacles.clone(), axis)?;

    let wcrt_left = left_sm.calculate_region_wcrt();
    let wcrt_right = right_sm.calculate_region_wcrt();

    let sum_wcrt = wcrt_left + wcrt_right;
    let nwcrt = if sum_wcrt > 1e-9 { (wcrt_left - wcrt_right).abs() / sum_wcrt } else { 0.0 };

    let sq_left = square_measure(&r_left);
    let sq_right = square_measure(&r_right);
    let msdu = calculate_msdu(sq_left, sq_right);

    Ok(AxisEvaluation {
        nwcrt,
        msdu,
        division_point,
        left: (r_left, left_obstacles),
        right: (r_right, right_obstacles),
    })
}

/// `w/h` of a region's bounding box, a `0.0`/`1.0` sentinel for
/// degenerate dimensions, matching `_square_measure`. Distinct from
/// [`aspect_ratio`] (which always normalizes into `[0, 1]`) because the
/// MSDU formula needs the *signed* width/height ratio, not its
/// reciprocal-folded form.
fn square_measure(region: &Region) -> f64 {
    let Some(bounds) = region.bounds() else { return 1.0 };
    let w = bounds.width();
    let h = bounds.height();
    if w < EPS && h < EPS {
        1.0
    } else if w < EPS || h < EPS {
        0.0
    } else {
        w / h
    }
}

/// Mean-squared-deviation-from-unity, inverted: `1 / (0.5*(Σ(sq-1)^2) + eps)`.
/// Larger means "closer to square on both sides".
fn calculate_msdu(sq_left: f64, sq_right: f64) -> f64 {
    1.0 / (0.5 * ((sq_left - 1.0).powi(2) + (sq_right - 1.0).powi(2)) + EPS)
}

/// Evaluates both axes and picks the one with the smaller NWCRT; ties
/// within `tie_threshold` are broken by the larger MSDU (more "square"
/// split).
pub fn select_best_axis(
    region: &Region,
    obstacles: &[Polygon2D],
    numerical_method: NumericalMethod,
    tie_threshold: f64,
) -> Result<AxisSelection, DecomposeSignal> {
    let x = evaluate_axis(region, obstacles, Axis::X, numerical_method)?;
    let y = evaluate_axis(region, obstacles, Axis::Y, numerical_method)?;

    let diff = (x.nwcrt - y.nwcrt).abs();
    let axis = if diff <= tie_threshold {
        if x.msdu > y.msdu {
            Axis::X
        } else {
            Axis::Y
        }
    } else if x.nwcrt < y.nwcrt {
        Axis::X
    } else {
        Axis::Y
    };

    Ok(AxisSelection { axis, x, y })
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
    fn square_region_with_no_obstacles_picks_either_axis_evenly() {
        let region = unit_square();
        let selection = select_best_axis(&region, &[], NumericalMethod::Newton, 1e-2).unwrap();
        assert_relative_eq!(selection.x.nwcrt, 0.0, max_relative = 1e-6);
        assert_relative_eq!(selection.y.nwcrt, 0.0, max_relative = 1e-6);
    }

    #[test]
    fn elongated_strip_with_no_obstacles_still_bisects_evenly() {
        let region = Region::from_polygon(rect_to_polygon(Rect::new((0.0, 0.0), (40.0, 10.0))));
        let selection = select_best_axis(&region, &[], NumericalMethod::Newton, 1e-2).unwrap();
        let chosen = selection.chosen();
        assert!(chosen.left.0.area() > 0.0);
        assert!(chosen.right.0.area() > 0.0);
    }

    #[test]
    fn msdu_is_maximal_for_two_perfect_squares() {
        assert_relative_eq!(calculate_msdu(1.0, 1.0), 1.0 / EPS, max_relative = 1e-6);
    }
}
