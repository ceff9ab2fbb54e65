//! 2D polygon geometry utilities: validity/repair, Z-drop, polygonal-part
//! extraction, aspect ratio, and the axis abstraction used throughout the
//! crate (spec.md §4.1, Design Notes §9).
//!
//! This crate normalizes every region to a single-part-or-many
//! [`geo::MultiPolygon<f64>`] internally (a bare `Polygon` is just the
//! one-part case), collapsing the repeated `isinstance(region, Polygon)`
//! vs `isinstance(region, MultiPolygon)` branching found throughout the
//! original Python (`strip_perimeter.py::_get_region_boundary`,
//! `hierarchical_decomposition_algorithm.py::_compute_largest_free_space`).

use geo::{Area, BooleanOps, BoundingRect, Contains, Coord, Line, LineString, MultiPolygon, Polygon, Rect};

/// A simple 2D polygon, as consumed and produced at the crate's edges.
pub type Polygon2D = Polygon<f64>;
/// A union of simple 2D polygons.
pub type MultiPolygon2D = MultiPolygon<f64>;

/// Area below which a polygonal fragment is treated as a clipping
/// artifact rather than a real sliver of geometry.
const AREA_EPS: f64 = 1e-9;

/// The sweep axis used by the strip manager, the divider, and the axis
/// selector. A tagged two-variant enum rather than a string, so axis
/// handling is exhaustive and branch-free at the type level (see Design
/// Notes §9 of spec.md).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// The coordinate of `c` along this axis.
    #[inline]
    pub fn coord_of(self, c: Coord<f64>) -> f64 {
        match self {
            Axis::X => c.x,
            Axis::Y => c.y,
        }
    }

    /// The other axis.
    #[inline]
    pub fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drops the Z ordinate of a raw `(x, y, z)` coordinate list, as
/// `preprocessing.py::drop_z_coordinates` does for input that may carry
/// elevation.
pub fn drop_z(coords: &[(f64, f64, f64)]) -> Vec<Coord<f64>> {
    coords.iter().map(|&(x, y, _z)| Coord { x, y }).collect()
}

/// Builds a simple polygon from a ring of `(x, y, z)` coordinates,
/// dropping Z. The ring is closed automatically if the caller did not
/// repeat the first point.
pub fn polygon_from_xyz(exterior: &[(f64, f64, f64)]) -> Polygon2D {
    let mut ring = drop_z(exterior);
    close_ring(&mut ring);
    Polygon::new(LineString::new(ring), vec![])
}

fn close_ring(ring: &mut Vec<Coord<f64>>) {
    if ring.len() >= 2 {
        let first = ring[0];
        let last = *ring.last().unwrap();
        if (first.x - last.x).abs() > f64::EPSILON || (first.y - last.y).abs() > f64::EPSILON {
            ring.push(first);
        }
    }
}

/// `aspect_ratio(bbox) = min(w/h, h/w)`, per spec.md §4.1. Both
/// dimensions collapsing to (near) zero is treated as perfectly square
/// (`1.0`); exactly one collapsing is treated as maximally non-square
/// (`0.0`).
pub fn aspect_ratio(bounds: Rect<f64>) -> f64 {
    let w = bounds.width();
    let h = bounds.height();
    let w_deg = w.abs() < EPS_DIM;
    let h_deg = h.abs() < EPS_DIM;
    match (w_deg, h_deg) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.0,
        (false, false) => (w / h).min(h / w),
    }
}

const EPS_DIM: f64 = 1e-9;

/// Keeps only polygonal fragments above the sliver-area threshold. `geo`'s
/// boolean operations already restrict their output to `MultiPolygon`, so
/// unlike the Python (which must filter a mixed `GeometryCollection` of
/// points/lines/polygons out of a generic `intersection()` result), this
/// is purely an area filter — the `extract_polygonal_part` name is kept
/// for parity with spec.md §4.1.
pub fn extract_polygonal_part(mp: MultiPolygon2D) -> Vec<Polygon2D> {
    mp.0.into_iter()
        .filter(|p| p.unsigned_area() > AREA_EPS)
        .collect()
}

/// A region to be decomposed: one or more simple polygons, normalized to
/// a `MultiPolygon` regardless of whether the caller supplied a single
/// `Polygon` or an actual `MultiPolygon` (spec.md §3, "Region").
#[derive(Debug, Clone, PartialEq)]
pub struct Region(MultiPolygon2D);

impl Region {
    pub fn from_polygon(p: Polygon2D) -> Self {
        Region(MultiPolygon::new(vec![p]))
    }

    pub fn from_multi_polygon(mp: MultiPolygon2D) -> Self {
        Region(mp)
    }

    pub fn as_multi_polygon(&self) -> &MultiPolygon2D {
        &self.0
    }

    pub fn into_polygons(self) -> Vec<Polygon2D> {
        self.0 .0
    }

    pub fn polygons(&self) -> &[Polygon2D] {
        &self.0 .0
    }

    /// Finite bounding box of the region, or `None` for an empty region.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.0.bounding_rect()
    }

    pub fn area(&self) -> f64 {
        self.0.unsigned_area()
    }

    pub fn is_empty(&self) -> bool {
        self.0 .0.is_empty() || self.area() < AREA_EPS
    }

    /// "make-valid": repairs self-intersections by unioning the region
    /// with itself, the `geo`-crate analogue of the `buffer(0)` trick
    /// `preprocessing.py` and `strip_perimeter.py` both use (spec.md
    /// §4.1, `validate`).
    pub fn repaired(self) -> Self {
        let unioned = self.0.union(&self.0);
        Region(unioned)
    }

    /// Every boundary edge (exterior ring and any interior/hole rings) of
    /// every polygon in this region, as individual line segments. Used
    /// by the strip manager to subtract perimeter that coincides with
    /// the region's own outer boundary (spec.md §4.3).
    pub fn boundary_lines(&self) -> Vec<Line<f64>> {
        let mut lines = Vec::new();
        for poly in self.polygons() {
            push_ring_lines(poly.exterior(), &mut lines);
            for hole in poly.interiors() {
                push_ring_lines(hole, &mut lines);
            }
        }
        lines
    }

    pub fn contains_point(&self, c: Coord<f64>) -> bool {
        self.0.contains(&c)
    }

    /// Intersects this region with an axis-aligned box, returning the
    /// repaired result.
    pub fn intersect_box(&self, rect: Rect<f64>) -> Region {
        let box_mp = MultiPolygon::new(vec![rect_to_polygon(rect)]);
        Region(self.0.intersection(&box_mp)).repaired()
    }

    pub fn intersect(&self, other: &Region) -> Region {
        Region(self.0.intersection(&other.0)).repaired()
    }
}

fn push_ring_lines(ring: &LineString<f64>, out: &mut Vec<Line<f64>>) {
    out.extend(ring.lines());
}

pub fn rect_to_polygon(rect: Rect<f64>) -> Polygon2D {
    let min = rect.min();
    let max = rect.max();
    Polygon::new(
        LineString::from(vec![
            (min.x, min.y),
            (max.x, min.y),
            (max.x, max.y),
            (min.x, max.y),
            (min.x, min.y),
        ]),
        vec![],
    )
}

/// Clips an obstacle polygon to a region, discarding the non-polygonal
/// (here: zero-area) leftovers (spec.md §4.4, step 3).
pub fn clip_obstacle_to_region(obstacle: &Polygon2D, region: &Region) -> Vec<Polygon2D> {
    let obs_mp = MultiPolygon::new(vec![obstacle.clone()]);
    let clipped = obs_mp.intersection(region.as_multi_polygon());
    extract_polygonal_part(clipped)
}

/// Intersection parameter (`t` along `seg`, in `[0, 1]`) of a possible
/// crossing between `seg` and `other`. Hand-rolled rather than pulled
/// from a `geo` submodule: this is the one piece of segment/segment
/// algebra the strip manager needs, and the cross-product formulation is
/// a handful of lines.
fn segment_crossing_param(seg: Line<f64>, other: Line<f64>) -> Option<f64> {
    let p = seg.start;
    let r = Coord { x: seg.end.x - p.x, y: seg.end.y - p.y };
    let q = other.start;
    let s = Coord { x: other.end.x - q.x, y: other.end.y - q.y };

    let rxs = cross(r, s);
    let qmp = Coord { x: q.x - p.x, y: q.y - p.y };

    if rxs.abs() < EPS_DIM {
        // Parallel (including collinear). Collinear overlaps are handled
        // by the caller sampling both segments' endpoints directly.
        return None;
    }

    let t = cross(qmp, s) / rxs;
    let u = cross(qmp, r) / rxs;
    if (-EPS_DIM..=1.0 + EPS_DIM).contains(&t) && (-EPS_DIM..=1.0 + EPS_DIM).contains(&u) {
        Some(t.clamp(0.0, 1.0))
    } else {
        None
    }
}

#[inline]
fn cross(a: Coord<f64>, b: Coord<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

#[inline]
fn lerp(seg: Line<f64>, t: f64) -> Coord<f64> {
    Coord {
        x: seg.start.x + (seg.end.x - seg.start.x) * t,
        y: seg.start.y + (seg.end.y - seg.start.y) * t,
    }
}

/// Clips a line segment to the portion of it that lies within `region`,
/// returning zero or more sub-segments. Handles non-convex, multi-part
/// regions by cutting `seg` at every parameter where it crosses a
/// boundary edge of `region`, then keeping the sub-segments whose
/// midpoint lies inside the region.
///
/// This plays the role of `edge.intersection(strip_in_region)` in
/// `strip_perimeter.py::compute_strip_perimeter`.
pub fn clip_segment_to_region(seg: Line<f64>, region: &Region) -> Vec<Line<f64>> {
    if seg.start == seg.end {
        return vec![];
    }
    let mut params = vec![0.0_f64, 1.0_f64];
    for boundary in region.boundary_lines() {
        if let Some(t) = segment_crossing_param(seg, boundary) {
            params.push(t);
        }
    }
    params.sort_by(|a, b| a.partial_cmp(b).unwrap());
    params.dedup_by(|a, b| (*a - *b).abs() < 1e-10);

    let mut out = Vec::new();
    for window in params.windows(2) {
        let (t0, t1) = (window[0], window[1]);
        if t1 - t0 < 1e-10 {
            continue;
        }
        let mid = lerp(seg, 0.5 * (t0 + t1));
        if region.contains_point(mid) {
            out.push(Line::new(lerp(seg, t0), lerp(seg, t1)));
        }
    }
    out
}

/// Whether `line` lies entirely on `x = coord` (axis `X`) or `y = coord`
/// (axis `Y`), within `EPS` — `strip_perimeter.py::is_edge_collinear_with_coord`.
pub fn is_line_collinear_with_coord(line: Line<f64>, coord: f64, axis: Axis) -> bool {
    let (a, b) = (axis.coord_of(line.start), axis.coord_of(line.end));
    (a - coord).abs() < EPS_DIM && (b - coord).abs() < EPS_DIM
}

/// The portions of `seg` that do not coincide with any edge of `boundary`,
/// splitting `seg` wherever a collinear overlap begins or ends rather
/// than keeping or dropping it as a whole (used to discard obstacle-edge
/// perimeter that coincides with the region's own outline —
/// `strip_perimeter.py::_exclude_aligned_portions`).
pub fn subtract_boundary_aligned(seg: Line<f64>, boundary: &[Line<f64>]) -> Vec<Line<f64>> {
    let len_sq = (seg.end.x - seg.start.x).powi(2) + (seg.end.y - seg.start.y).powi(2);
    if len_sq < EPS_DIM {
        return vec![seg];
    }

    let mut covered: Vec<(f64, f64)> = boundary.iter().filter_map(|b| collinear_overlap_params(seg, *b)).collect();
    if covered.is_empty() {
        return vec![seg];
    }
    covered.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

    let mut merged: Vec<(f64, f64)> = Vec::new();
    for (lo, hi) in covered {
        match merged.last_mut() {
            Some(last) if lo <= last.1 + 1e-9 => last.1 = last.1.max(hi),
            _ => merged.push((lo, hi)),
        }
    }

    let mut out = Vec::new();
    let mut cursor = 0.0_f64;
    for (lo, hi) in merged {
        if lo > cursor + 1e-9 {
            out.push(Line::new(lerp(seg, cursor), lerp(seg, lo)));
        }
        cursor = cursor.max(hi);
    }
    if cursor < 1.0 - 1e-9 {
        out.push(Line::new(lerp(seg, cursor), lerp(seg, 1.0)));
    }
    out
}

/// If `seg` and `boundary` are collinear and overlap, the overlap
/// interval expressed as parameters along `seg`, clamped to `[0, 1]`.
fn collinear_overlap_params(seg: Line<f64>, boundary: Line<f64>) -> Option<(f64, f64)> {
    let d = Coord { x: seg.end.x - seg.start.x, y: seg.end.y - seg.start.y };
    let e = Coord { x: boundary.end.x - boundary.start.x, y: boundary.end.y - boundary.start.y };
    let len_sq = d.x * d.x + d.y * d.y;
    if len_sq < EPS_DIM {
        return None;
    }

    if cross(d, e).abs() > 1e-7 {
        return None;
    }
    let to_boundary_start = Coord { x: boundary.start.x - seg.start.x, y: boundary.start.y - seg.start.y };
    if cross(d, to_boundary_start).abs() > 1e-7 {
        return None;
    }

    let project = |p: Coord<f64>| ((p.x - seg.start.x) * d.x + (p.y - seg.start.y) * d.y) / len_sq;
    let (mut t0, mut t1) = (project(boundary.start), project(boundary.end));
    if t0 > t1 {
        std::mem::swap(&mut t0, &mut t1);
    }
    let lo = t0.max(0.0);
    let hi = t1.min(1.0);
    if hi > lo + 1e-9 {
        Some((lo, hi))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(minx: f64, miny: f64, maxx: f64, maxy: f64) -> Polygon2D {
        rect_to_polygon(Rect::new((minx, miny), (maxx, maxy)))
    }

    #[test]
    fn aspect_ratio_of_a_square_is_one() {
        let r = Rect::new((0.0, 0.0), (10.0, 10.0));
        assert_relative_eq!(aspect_ratio(r), 1.0);
    }

    #[test]
    fn aspect_ratio_of_a_rectangle() {
        let r = Rect::new((0.0, 0.0), (2.0, 8.0));
        assert_relative_eq!(aspect_ratio(r), 0.25);
    }

    #[test]
    fn aspect_ratio_degenerate_dimension_is_zero() {
        let r = Rect::new((0.0, 0.0), (10.0, 0.0));
        assert_relative_eq!(aspect_ratio(r), 0.0);
    }

    #[test]
    fn region_from_polygon_round_trips_bounds() {
        let region = Region::from_polygon(square(0.0, 0.0, 100.0, 100.0));
        let bounds = region.bounds().unwrap();
        assert_relative_eq!(bounds.width(), 100.0);
        assert_relative_eq!(bounds.height(), 100.0);
    }

    #[test]
    fn intersect_box_clips_region() {
        let region = Region::from_polygon(square(0.0, 0.0, 100.0, 100.0));
        let left = region.intersect_box(Rect::new((0.0, 0.0), (50.0, 100.0)));
        assert_relative_eq!(left.area(), 5000.0, max_relative = 1e-6);
    }

    #[test]
    fn clip_segment_to_region_keeps_only_interior_part() {
        let region = Region::from_polygon(square(0.0, 0.0, 10.0, 10.0));
        // A segment that pokes outside the region on both ends.
        let seg = Line::new(Coord { x: -5.0, y: 5.0 }, Coord { x: 15.0, y: 5.0 });
        let clipped = clip_segment_to_region(seg, &region);
        assert_eq!(clipped.len(), 1);
        assert_relative_eq!(clipped[0].start.x, 0.0, max_relative = 1e-6);
        assert_relative_eq!(clipped[0].end.x, 10.0, max_relative = 1e-6);
    }

    #[test]
    fn is_line_collinear_with_coord_detects_vertical_edge() {
        let line = Line::new(Coord { x: 5.0, y: 0.0 }, Coord { x: 5.0, y: 10.0 });
        assert!(is_line_collinear_with_coord(line, 5.0, Axis::X));
        assert!(!is_line_collinear_with_coord(line, 5.0, Axis::Y));
    }

    #[test]
    fn subtract_boundary_aligned_drops_a_fully_flush_edge() {
        let boundary = vec![Line::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 10.0 })];
        let seg = Line::new(Coord { x: 0.0, y: 2.0 }, Coord { x: 0.0, y: 8.0 });
        assert!(subtract_boundary_aligned(seg, &boundary).is_empty());
    }

    #[test]
    fn subtract_boundary_aligned_keeps_an_unaligned_edge_whole() {
        let boundary = vec![Line::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 10.0 })];
        let seg = Line::new(Coord { x: 5.0, y: 2.0 }, Coord { x: 5.0, y: 8.0 });
        let kept = subtract_boundary_aligned(seg, &boundary);
        assert_eq!(kept.len(), 1);
        assert_relative_eq!(kept[0].start.y, 2.0);
        assert_relative_eq!(kept[0].end.y, 8.0);
    }

    #[test]
    fn subtract_boundary_aligned_trims_only_the_overlapping_portion() {
        // The boundary only runs along y in [0, 5]; the segment runs [2, 8],
        // so only [2, 5] coincides with the boundary and should be dropped,
        // leaving [5, 8].
        let boundary = vec![Line::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 5.0 })];
        let seg = Line::new(Coord { x: 0.0, y: 2.0 }, Coord { x: 0.0, y: 8.0 });
        let kept = subtract_boundary_aligned(seg, &boundary);
        assert_eq!(kept.len(), 1);
        assert_relative_eq!(kept[0].start.y, 5.0, max_relative = 1e-6);
        assert_relative_eq!(kept[0].end.y, 8.0, max_relative = 1e-6);
    }
}
