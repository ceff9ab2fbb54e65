//! End-to-end scenarios exercising preprocessing through decomposition
//! and analysis together, rather than one module in isolation.

use skydiv::algorithms::decomposition::decompose;
use skydiv::algorithms::kd_tree::{naive_kd_partition, KdConfig};
use skydiv::analysis::PartitionSummary;
use skydiv::config::{Mode, NumericalMethod, PartitionConfig};
use skydiv::geometry::Axis;
use skydiv::preprocessing::RegionWithObstacles;

fn square(minx: f64, miny: f64, maxx: f64, maxy: f64) -> Vec<(f64, f64, f64)> {
    vec![
        (minx, miny, 0.0),
        (maxx, miny, 0.0),
        (maxx, maxy, 0.0),
        (minx, maxy, 0.0),
    ]
}

/// An obstacle-free square splits cleanly along one sweep with no
/// root-finding involved (the "no obstacle in strip" case).
#[test]
fn empty_obstacle_square_splits_into_two_balanced_halves() {
    let region = square(0.0, 0.0, 100.0, 100.0);
    let processed = RegionWithObstacles::new(&region, &[]).unwrap();

    let config = PartitionConfig {
        max_depth: Some(1),
        ..PartitionConfig::default()
    };
    let partitions = decompose(processed.region().clone(), processed.simplified_obstacles().to_vec(), config);

    assert_eq!(partitions.len(), 2);
    let areas: Vec<f64> = partitions.iter().map(|p| p.region.area()).collect();
    assert!((areas[0] - areas[1]).abs() < 1e-6);
}

/// A single obstacle centered on the sweep axis forces Brent's method to
/// resolve the cut point rather than falling into the no-obstacle case.
#[test]
fn single_centered_obstacle_is_resolved_with_brent() {
    let region = square(0.0, 0.0, 100.0, 100.0);
    let obstacles = vec![square(45.0, 20.0, 55.0, 80.0)];
    let processed = RegionWithObstacles::new(&region, &obstacles).unwrap();

    let config = PartitionConfig {
        max_depth: Some(1),
        numerical_method: NumericalMethod::Brent,
        ..PartitionConfig::default()
    };
    let partitions = decompose(processed.region().clone(), processed.simplified_obstacles().to_vec(), config);

    assert!(partitions.len() >= 1);
    let total_area: f64 = partitions.iter().map(|p| p.region.area()).sum();
    assert!(total_area > 0.0 && total_area <= 10_000.0 + 1e-6);
}

/// Depth-3 recursion over an obstacle-free square never exceeds the
/// 2^depth bound on leaf count.
#[test]
fn depth_three_recursion_stays_within_eight_partitions() {
    let region = square(0.0, 0.0, 200.0, 200.0);
    let processed = RegionWithObstacles::new(&region, &[]).unwrap();

    let config = PartitionConfig {
        max_depth: Some(3),
        ..PartitionConfig::default()
    };
    let partitions = decompose(processed.region().clone(), processed.simplified_obstacles().to_vec(), config);

    assert!(partitions.len() <= 8);
    assert!(!partitions.is_empty());
}

/// An obstacle covering nearly the whole region should trip the
/// coverage-ratio stop and halt after storing a single partition, since
/// the remaining free space falls under the drone threshold.
#[test]
fn near_full_coverage_obstacle_stops_after_one_partition() {
    let region = square(0.0, 0.0, 10.0, 10.0);
    let obstacles = vec![square(0.1, 0.1, 9.9, 9.9)];
    let processed = RegionWithObstacles::new(&region, &obstacles).unwrap();

    let config = PartitionConfig {
        max_depth: Some(5),
        ..PartitionConfig::default()
    };
    let partitions = decompose(processed.region().clone(), processed.simplified_obstacles().to_vec(), config);

    assert_eq!(partitions.len(), 1);
}

/// Track-back mode must never drop the input entirely: even when every
/// recursive attempt bottoms out, the total reported area matches the
/// original region.
#[test]
fn track_back_preserves_total_area_under_degenerate_config() {
    let region = square(0.0, 0.0, 50.0, 50.0);
    let processed = RegionWithObstacles::new(&region, &[]).unwrap();

    let config = PartitionConfig {
        max_depth: Some(0),
        mode: Mode::TrackBack,
        ..PartitionConfig::default()
    };
    let partitions = decompose(processed.region().clone(), processed.simplified_obstacles().to_vec(), config);

    assert_eq!(partitions.len(), 1);
    assert!((partitions[0].region.area() - 2_500.0).abs() < 1e-6);
}

/// The naive KD-tree baseline and the obstacle-aware decomposition agree
/// on total area for the same obstacle-free input, even though their
/// individual cuts differ.
#[test]
fn kd_tree_baseline_and_hierarchical_decomposition_conserve_area() {
    let region = square(0.0, 0.0, 60.0, 40.0);
    let processed = RegionWithObstacles::new(&region, &[]).unwrap();

    let kd_partitions = naive_kd_partition(
        processed.region().clone(),
        processed.simplified_obstacles().to_vec(),
        KdConfig {
            max_depth: 2,
            ..KdConfig::default()
        },
    );
    let kd_area: f64 = kd_partitions.iter().map(|p| p.region.area()).sum();

    let config = PartitionConfig {
        max_depth: Some(2),
        ..PartitionConfig::default()
    };
    let decomposed = decompose(processed.region().clone(), processed.simplified_obstacles().to_vec(), config);
    let decomposed_area: f64 = decomposed.iter().map(|p| p.region.area()).sum();

    assert!((kd_area - decomposed_area).abs() < 1e-3);
}

/// Summary statistics over a multi-leaf decomposition report a
/// nonnegative spread and a mean within [min, max].
#[test]
fn summary_statistics_are_internally_consistent() {
    let region = square(0.0, 0.0, 120.0, 80.0);
    let obstacles = vec![square(50.0, 30.0, 70.0, 50.0)];
    let processed = RegionWithObstacles::new(&region, &obstacles).unwrap();

    let config = PartitionConfig {
        max_depth: Some(2),
        ..PartitionConfig::default()
    };
    let partitions = decompose(processed.region().clone(), processed.simplified_obstacles().to_vec(), config);
    let summary = PartitionSummary::summarize(&partitions, Axis::X).expect("at least one partition yields a metric");

    assert!(summary.range_wcrt >= 0.0);
    assert!(summary.mean_wcrt >= summary.min_wcrt - 1e-9);
    assert!(summary.mean_wcrt <= summary.max_wcrt + 1e-9);
}
