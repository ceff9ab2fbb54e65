//! Functions to evaluate the quality of a decomposition: per-partition
//! WCRT/aspect-ratio/coverage, and aggregate statistics across a whole
//! run. Adapted from the teacher's imbalance-measuring `analysis.rs`
//! (`imbalance_max_diff`, `imbalance_relative_diff`) to the WCRT metric
//! this crate balances instead of per-part weight, and grounded in the
//! aggregate-stats block of `kd_tree_naive_decomposition.py::save_partitions`
//! (min/max/mean/variance/stdev/range of WCRT).

use crate::algorithms::decomposition::PartitionRecord;
use crate::algorithms::strip::StripManager;
use crate::geometry::{aspect_ratio, Axis};

/// Per-partition figures reported alongside a decomposition's output
/// (spec.md §6 "Outputs").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionMetrics {
    pub wcrt: f64,
    pub aspect_ratio: f64,
    pub coverage_ratio: f64,
}

/// Computes [`PartitionMetrics`] for one partition. The axis passed in
/// only affects which strip direction the WCRT is swept along; for a
/// finished leaf partition (no further splitting) this is a reporting
/// choice, not a structural one, so `Axis::X` is a reasonable default
/// when the caller has no better axis to hand.
pub fn partition_metrics(record: &PartitionRecord, axis: Axis) -> Option<PartitionMetrics> {
    let sp = StripManager::new(record.region.clone(), record.obstacles.clone(), axis).ok()?;
    let bounds = record.region.bounds()?;
    let region_area = record.region.area();
    let obstacle_area = sp.calculate_total_obstacle_area();
    let coverage_ratio = if region_area > 1e-12 { obstacle_area / region_area } else { 0.0 };

    Some(PartitionMetrics {
        wcrt: sp.calculate_region_wcrt(),
        aspect_ratio: aspect_ratio(bounds),
        coverage_ratio,
    })
}

/// Aggregate WCRT statistics across every partition in a run (spec.md
/// §6 "Outputs": min/max/mean/variance/standard deviation/range).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionSummary {
    pub count: usize,
    pub min_wcrt: f64,
    pub max_wcrt: f64,
    pub mean_wcrt: f64,
    pub variance_wcrt: f64,
    pub stdev_wcrt: f64,
    pub range_wcrt: f64,
}

impl PartitionSummary {
    /// Summarizes WCRT across `records`, sweeping each along `axis`.
    /// Returns `None` if no partition yields a valid metric.
    pub fn summarize(records: &[PartitionRecord], axis: Axis) -> Option<Self> {
        let wcrt_values: Vec<f64> = records.iter().filter_map(|r| partition_metrics(r, axis)).map(|m| m.wcrt).collect();
        if wcrt_values.is_empty() {
            return None;
        }

        let count = wcrt_values.len();
        let min_wcrt = wcrt_values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_wcrt = wcrt_values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mean_wcrt = wcrt_values.iter().sum::<f64>() / count as f64;
        let variance_wcrt = wcrt_values.iter().map(|w| (w - mean_wcrt).powi(2)).sum::<f64>() / count as f64;
        let stdev_wcrt = variance_wcrt.sqrt();
        let range_wcrt = max_wcrt - min_wcrt;

        Some(PartitionSummary {
            count,
            min_wcrt,
            max_wcrt,
            mean_wcrt,
            variance_wcrt,
            stdev_wcrt,
            range_wcrt,
        })
    }
}

/// `max - min` of `PartitionMetrics::wcrt` across `records`, the
/// simplest cross-partition imbalance measure (the WCRT analogue of the
/// teacher's `imbalance_max_diff`, which measured part-weight spread
/// instead).
pub fn imbalance_max_diff(records: &[PartitionRecord], axis: Axis) -> f64 {
    let wcrt_values: Vec<f64> = records.iter().filter_map(|r| partition_metrics(r, axis)).map(|m| m.wcrt).collect();
    wcrt_values
        .iter()
        .flat_map(|w1| wcrt_values.iter().map(move |w2| (w1 - w2).abs()))
        .fold(0.0, f64::max)
}

/// `imbalance_max_diff` normalized by total WCRT across partitions (the
/// WCRT analogue of the teacher's `imbalance_relative_diff`).
pub fn imbalance_relative_diff(records: &[PartitionRecord], axis: Axis) -> f64 {
    let wcrt_values: Vec<f64> = records.iter().filter_map(|r| partition_metrics(r, axis)).map(|m| m.wcrt).collect();
    if wcrt_values.is_empty() {
        return 0.0;
    }
    let total: f64 = wcrt_values.iter().sum();
    if total < 1e-12 {
        return 0.0;
    }
    imbalance_max_diff(records, axis) / total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{rect_to_polygon, Region};
    use approx::assert_ulps_eq;
    use geo::Rect;

    fn record(minx: f64, miny: f64, maxx: f64, maxy: f64) -> PartitionRecord {
        PartitionRecord {
            region: Region::from_polygon(rect_to_polygon(Rect::new((minx, miny), (maxx, maxy)))),
            obstacles: vec![],
            axis_history: vec![],
            is_valid: true,
        }
    }

    #[test]
    fn partition_metrics_of_a_square_has_aspect_ratio_one() {
        let metrics = partition_metrics(&record(0.0, 0.0, 10.0, 10.0), Axis::X).unwrap();
        assert_ulps_eq!(metrics.aspect_ratio, 1.0);
        assert_ulps_eq!(metrics.coverage_ratio, 0.0);
    }

    #[test]
    fn summary_of_two_equal_partitions_has_zero_spread() {
        let records = vec![record(0.0, 0.0, 10.0, 10.0), record(20.0, 0.0, 30.0, 10.0)];
        let summary = PartitionSummary::summarize(&records, Axis::X).unwrap();
        assert_eq!(summary.count, 2);
        assert_ulps_eq!(summary.range_wcrt, 0.0);
        assert_ulps_eq!(summary.stdev_wcrt, 0.0);
    }

    #[test]
    fn summary_of_unequal_partitions_has_positive_range() {
        let records = vec![record(0.0, 0.0, 10.0, 10.0), record(0.0, 0.0, 40.0, 40.0)];
        let summary = PartitionSummary::summarize(&records, Axis::X).unwrap();
        assert!(summary.range_wcrt > 0.0);
        assert!(summary.max_wcrt >= summary.mean_wcrt);
        assert!(summary.min_wcrt <= summary.mean_wcrt);
    }

    #[test]
    fn imbalance_max_diff_of_equal_partitions_is_zero() {
        let records = vec![record(0.0, 0.0, 10.0, 10.0), record(20.0, 0.0, 30.0, 10.0)];
        assert_ulps_eq!(imbalance_max_diff(&records, Axis::X), 0.0);
    }

    #[test]
    fn imbalance_relative_diff_of_empty_set_is_zero() {
        assert_ulps_eq!(imbalance_relative_diff(&[], Axis::X), 0.0);
    }
}
