//! Process-wide numeric constants shared by every algorithm in this crate.
//!
//! These mirror the magic numbers hard-coded at module scope in the
//! original Python implementation (`hierarchical_decomposition_algorithm.py`,
//! `kd_tree_naive_decomposition.py`, `kd_tree_perimeter_decomposition.py`).
//! They are process-wide, not per-call configuration, because the original
//! defines them as module-level constants rather than constructor
//! parameters; `PartitionConfig` carries the few values the original does
//! expose per call (see `config.rs`).

/// Minimum free area (in the caller's squared length unit) considered
/// operationally meaningful for a single responder.
pub const DRONE_THRESHOLD: f64 = 5.0;

/// Obstacle coverage ratio beyond which a region's leftover free space is
/// inspected for the coverage-stop rule.
pub const COVERAGE_RATIO_STOP: f64 = 0.90;

/// Tolerance used for geometric collinearity and near-zero comparisons.
pub const EPS: f64 = 1e-9;

/// Default guard against degenerate (near-zero width/height) cuts.
pub const DEFAULT_MIN_DIMENSION_THRESHOLD: f64 = 1e-3;

/// Default recursion depth cap (`hierarchical_decomposition_algorithm.py`'s
/// `HierarchicalDecomposition.__init__(max_depth=3)`). Without a cap, a
/// region with no obstacles (where the only remaining stopping rule is
/// `min_dimension_threshold`) halves each dimension down to a ~1e-3
/// fraction of its original size before stopping, producing an
/// impractically deep recursion tree.
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Default tie-break threshold for the optimal axis selector.
pub const DEFAULT_TIE_THRESHOLD: f64 = 1e-2;

/// Nudge applied to a sweepline coordinate when the strip of interest has
/// an obstacle edge collinear with it (Case 3, see `divider.rs`).
pub const CASE3_NUDGE: f64 = 1e-6;

/// Convergence tolerance shared by both root solvers.
pub const SOLVER_TOL: f64 = 1e-7;

/// Iteration budget shared by both root solvers.
pub const SOLVER_MAX_ITER: usize = 100;

/// Step used for the solver's numerical derivative.
pub const DERIVATIVE_STEP: f64 = 1e-6;

/// Minimum |f'| below which Newton's method is abandoned in favor of Brent.
pub const NEWTON_MIN_DERIVATIVE: f64 = 1e-7;
