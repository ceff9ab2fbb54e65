//! Event-sweep strip decomposition of a region along one axis, with
//! cumulative/partial obstacle-perimeter queries and the worst-case
//! round-trip-time (WCRT) family of metrics built on top of them
//! (spec.md §4.3). Ported from `strip_perimeter.py::Strip`.

use geo::{EuclideanLength, Rect};

use crate::error::DecomposeSignal;
use crate::geometry::{clip_segment_to_region, is_line_collinear_with_coord, subtract_boundary_aligned, Axis, Polygon2D, Region};

/// Sweeps `region`/`obstacles` along `axis`, building the strip boundary
/// events once at construction time, then answering perimeter and WCRT
/// queries in O(log n) / O(strip perimeter) afterwards.
#[derive(Debug, Clone)]
pub struct StripManager {
    region: Region,
    obstacles: Vec<Polygon2D>,
    axis: Axis,
    /// Sorted, deduplicated sweep coordinates: region bounds plus every
    /// obstacle-vertex coordinate along `axis`.
    events: Vec<f64>,
    /// `(coord_prev, coord_curr)` for each strip between consecutive
    /// events, aligned by index with `per_strip_perimeters`.
    strips: Vec<(f64, f64)>,
    per_strip_perimeters: Vec<f64>,
    /// Cumulative perimeter at `strips[i].1`, aligned by index with `strips`.
    cumulative_perimeters: Vec<f64>,
}

const EVENT_EPS: f64 = 1e-9;

impl StripManager {
    pub fn new(region: Region, obstacles: Vec<Polygon2D>, axis: Axis) -> Result<Self, DecomposeSignal> {
        let bounds = region.bounds().ok_or(DecomposeSignal::EmptyRegion)?;
        let events = Self::define_events(bounds, &obstacles, axis);
        let strips: Vec<(f64, f64)> = events.windows(2).map(|w| (w[0], w[1])).collect();

        let mut manager = StripManager {
            region,
            obstacles,
            axis,
            events,
            strips,
            per_strip_perimeters: Vec::new(),
            cumulative_perimeters: Vec::new(),
        };
        manager.compute_perimeters(bounds);
        Ok(manager)
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn obstacles_ref(&self) -> &[Polygon2D] {
        &self.obstacles
    }

    fn define_events(bounds: Rect<f64>, obstacles: &[Polygon2D], axis: Axis) -> Vec<f64> {
        let mut events = match axis {
            Axis::X => vec![bounds.min().x, bounds.max().x],
            Axis::Y => vec![bounds.min().y, bounds.max().y],
        };
        for obs in obstacles {
            for coord in obs.exterior().coords() {
                events.push(axis.coord_of(*coord));
            }
        }
        events.sort_by(|a, b| a.partial_cmp(b).unwrap());
        events.dedup_by(|a, b| (*a - *b).abs() < EVENT_EPS);
        events
    }

    fn strip_rect(&self, bounds: Rect<f64>, coord_prev: f64, coord_curr: f64) -> Rect<f64> {
        match self.axis {
            Axis::X => Rect::new((coord_prev, bounds.min().y), (coord_curr, bounds.max().y)),
            Axis::Y => Rect::new((bounds.min().x, coord_prev), (bounds.max().x, coord_curr)),
        }
    }

    fn compute_perimeters(&mut self, bounds: Rect<f64>) {
        let mut accumulated = 0.0;
        let strips = self.strips.clone();
        for (coord_prev, coord_curr) in strips {
            let rect = self.strip_rect(bounds, coord_prev, coord_curr);
            let perimeter = self.compute_strip_perimeter(rect);
            accumulated += perimeter;
            self.per_strip_perimeters.push(perimeter);
            self.cumulative_perimeters.push(accumulated);
        }
    }

    /// Total obstacle perimeter falling within `rect`, excluding the
    /// portion aligned with the region's own boundary and the portion
    /// collinear with the strip's lower bound along `axis`.
    pub fn compute_strip_perimeter(&self, rect: Rect<f64>) -> f64 {
        let coord_prev = match self.axis {
            Axis::X => rect.min().x,
            Axis::Y => rect.min().y,
        };

        let strip_in_region = self.region.intersect_box(rect);
        if strip_in_region.is_empty() {
            return 0.0;
        }

        let boundary = self.region.boundary_lines();
        if boundary.is_empty() {
            return 0.0;
        }

        let mut total = 0.0;
        for obs in &self.obstacles {
            for edge in obs.exterior().lines() {
                for clipped in clip_segment_to_region(edge, &strip_in_region) {
                    for unaligned in subtract_boundary_aligned(clipped, &boundary) {
                        if !is_line_collinear_with_coord(unaligned, coord_prev, self.axis) {
                            total += unaligned.euclidean_length();
                        }
                    }
                }
            }
        }
        total
    }

    /// Total obstacle perimeter across the whole region, excluding
    /// portions aligned with the region's own boundary.
    pub fn calculate_total_obstacle_perimeter(&self) -> f64 {
        let boundary = self.region.boundary_lines();
        if boundary.is_empty() {
            return self.obstacles.iter().map(|o| o.exterior().euclidean_length()).sum();
        }
        let mut total = 0.0;
        for obs in &self.obstacles {
            for edge in obs.exterior().lines() {
                for unaligned in subtract_boundary_aligned(edge, &boundary) {
                    total += unaligned.euclidean_length();
                }
            }
        }
        total
    }

    pub fn calculate_total_obstacle_area(&self) -> f64 {
        use geo::Area;
        self.obstacles.iter().map(|o| o.unsigned_area()).sum()
    }

    pub fn bounds(&self) -> Rect<f64> {
        self.region.bounds().expect("StripManager invariant: non-empty region")
    }

    /// The axis-aligned rectangle for the strip between `coord_prev` and
    /// `coord_curr`, spanning the region's full extent on the other axis.
    pub fn strip_rect_for(&self, coord_prev: f64, coord_curr: f64) -> Rect<f64> {
        self.strip_rect(self.bounds(), coord_prev, coord_curr)
    }

    pub fn calculate_region_diagonal(&self) -> f64 {
        let b = self.bounds();
        (b.width().powi(2) + b.height().powi(2)).sqrt()
    }

    pub fn calculate_region_wcrt(&self) -> f64 {
        self.calculate_region_diagonal() + 0.5 * self.calculate_total_obstacle_perimeter()
    }

    pub fn calculate_region_diagonal_half(&self) -> f64 {
        let b = self.bounds();
        match self.axis {
            Axis::X => (b.height().powi(2) + (b.width() / 2.0).powi(2)).sqrt(),
            Axis::Y => (b.width().powi(2) + (b.height() / 2.0).powi(2)).sqrt(),
        }
    }

    pub fn calculate_target_wcrt(&self) -> f64 {
        self.calculate_region_diagonal_half() + 0.25 * self.calculate_total_obstacle_perimeter()
    }

    /// Aspect-ratio-weighted blend of the half-diagonal and a quarter of
    /// total obstacle perimeter (spec.md §B.1 supplement). Diagnostic
    /// only: never consulted by the divider's root-finding.
    pub fn calculate_target_wcrt_dynamic(&self) -> f64 {
        let b = self.bounds();
        let width = b.width();
        let height = b.height();

        let effective_diagonal = match self.axis {
            Axis::X => (height.powi(2) + (width / 2.0).powi(2)).sqrt(),
            Axis::Y => (width.powi(2) + (height / 2.0).powi(2)).sqrt(),
        };

        let aspect_ratio = if height != 0.0 { width / height } else { 1.0 };
        let (alpha, beta) = match self.axis {
            Axis::X => (1.0 / (1.0 + aspect_ratio), aspect_ratio / (1.0 + aspect_ratio)),
            Axis::Y => (aspect_ratio / (1.0 + aspect_ratio), 1.0 / (1.0 + aspect_ratio)),
        };

        alpha * effective_diagonal + beta * 0.25 * self.calculate_total_obstacle_perimeter()
    }

    pub fn calculate_diagonal_at_coordinate(&self, coord: f64) -> f64 {
        let b = self.bounds();
        match self.axis {
            Axis::X => (b.height().powi(2) + (coord - b.min().x).powi(2)).sqrt(),
            Axis::Y => (b.width().powi(2) + (coord - b.min().y).powi(2)).sqrt(),
        }
    }

    pub fn calculate_diagonal_right(&self, division_point: f64) -> f64 {
        let b = self.bounds();
        match self.axis {
            Axis::X => (b.height().powi(2) + (b.max().x - division_point).powi(2)).sqrt(),
            Axis::Y => (b.width().powi(2) + (b.max().y - division_point).powi(2)).sqrt(),
        }
    }

    pub fn calculate_wcrt_left(&self, division_point: f64) -> f64 {
        self.calculate_diagonal_at_coordinate(division_point) + 0.5 * self.query_accumulated_perimeter(division_point)
    }

    pub fn calculate_wcrt_right(&self, division_point: f64) -> f64 {
        let p_total = self.calculate_total_obstacle_perimeter();
        let p_left = self.query_accumulated_perimeter(division_point);
        self.calculate_diagonal_right(division_point) + 0.5 * (p_total - p_left)
    }

    pub fn query_wcrt_at_coordinate(&self, coord: f64) -> f64 {
        self.calculate_diagonal_at_coordinate(coord) + 0.5 * self.query_accumulated_perimeter(coord)
    }

    /// Cumulative obstacle perimeter up to `coord`: an exact event hit
    /// returns the precomputed value; otherwise the last event below
    /// `coord` plus the perimeter of the partial strip up to `coord`.
    pub fn query_accumulated_perimeter(&self, coord: f64) -> f64 {
        if let Some(idx) = self.strips.iter().position(|&(_, c)| (c - coord).abs() < EVENT_EPS) {
            return self.cumulative_perimeters[idx];
        }

        let mut last_event_idx: Option<usize> = None;
        for (i, &event) in self.events.iter().enumerate() {
            if coord < event {
                break;
            }
            last_event_idx = Some(i);
        }

        let Some(last_idx) = last_event_idx else {
            return 0.0;
        };
        let last_event = self.events[last_idx];
        let base = if last_idx == 0 {
            0.0
        } else {
            self.cumulative_perimeters[last_idx - 1]
        };

        for &(coord_prev, coord_curr) in &self.strips {
            if (coord_prev - last_event).abs() < EVENT_EPS && coord < coord_curr {
                let partial_rect = self.strip_rect(self.bounds(), coord_prev, coord);
                return base + self.compute_strip_perimeter(partial_rect);
            }
        }
        base
    }

    /// Perimeter of an arbitrary `[coord1, coord2]` strip, optionally
    /// including the cumulative perimeter up to `min(coord1, coord2)`.
    pub fn query_custom_strip_perimeter(&self, coord1: f64, coord2: f64, include_cumulative: bool) -> Result<f64, DecomposeSignal> {
        let (lo, hi) = if coord1 > coord2 { (coord2, coord1) } else { (coord1, coord2) };
        let b = self.bounds();
        let (axis_min, axis_max) = match self.axis {
            Axis::X => (b.min().x, b.max().x),
            Axis::Y => (b.min().y, b.max().y),
        };
        if !(axis_min <= lo && lo <= axis_max && axis_min <= hi && hi <= axis_max) {
            return Err(DecomposeSignal::DegenerateCut);
        }

        let rect = self.strip_rect(b, lo, hi);
        let perimeter = self.compute_strip_perimeter(rect);
        if include_cumulative {
            Ok(self.query_accumulated_perimeter(lo) + perimeter)
        } else {
            Ok(perimeter)
        }
    }

    pub fn events(&self) -> &[f64] {
        &self.events
    }

    pub fn strips(&self) -> &[(f64, f64)] {
        &self.strips
    }
}
