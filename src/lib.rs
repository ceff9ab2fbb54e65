//! An obstacle-aware region partitioning library.
//!
//! Given a bounded 2D region containing polygonal no-fly zones, this
//! crate recursively splits it into axis-aligned sub-regions — one per
//! responder — balancing worst-case round-trip time (WCRT) across the
//! resulting partitions rather than splitting on raw area or obstacle
//! count alone.
//!
//! # Crate layout
//!
//! - [`preprocessing`]: validates, clips, and merges a raw region and
//!   its obstacles into the normalized form the rest of the crate
//!   consumes.
//! - [`algorithms::strip`]: sweeps a region along one axis, answering
//!   cumulative obstacle-perimeter and WCRT queries.
//! - [`algorithms::divider`]: finds the cut coordinate that balances
//!   WCRT between the two sides of a sweep.
//! - [`algorithms::axis_selector`]: picks which axis to cut along.
//! - [`algorithms::decomposition`]: the recursive driver that ties the
//!   above together, with coverage/depth stopping rules and track-back
//!   recovery.
//! - [`algorithms::kd_tree`]: two simpler baselines (naive midpoint
//!   split, half-perimeter split) for comparison against the
//!   obstacle-aware decomposition.
//! - [`analysis`]: per-partition and aggregate WCRT/aspect-ratio/coverage
//!   statistics.
//!
//! # Example
//!
//! ```
//! use skydiv::{decompose, config::PartitionConfig, preprocessing::RegionWithObstacles};
//!
//! let region = [(0.0, 0.0, 0.0), (10.0, 0.0, 0.0), (10.0, 10.0, 0.0), (0.0, 10.0, 0.0)];
//! let obstacles = vec![vec![(4.0, 4.0, 0.0), (6.0, 4.0, 0.0), (6.0, 6.0, 0.0), (4.0, 6.0, 0.0)]];
//!
//! let processed = RegionWithObstacles::new(&region, &obstacles).unwrap();
//! let partitions = decompose(
//!     processed.region().clone(),
//!     processed.simplified_obstacles().to_vec(),
//!     PartitionConfig::default(),
//! );
//! assert!(!partitions.is_empty());
//! ```

pub mod algorithms;
pub mod analysis;
pub mod config;
mod constants;
mod error;
pub mod geometry;
pub mod preprocessing;

pub use algorithms::decomposition::{decompose, HierarchicalDecomposition, PartitionRecord};
pub use config::PartitionConfig;
pub use error::PartitionError;
pub use geometry::{Axis, MultiPolygon2D, Polygon2D, Region};
