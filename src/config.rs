//! Caller-tunable options for a decomposition run (spec.md §6, "External
//! Interfaces"). Everything a module needs that is *not* here is a
//! process-wide constant (see `constants.rs`), matching the split the
//! original Python draws between constructor arguments and module-level
//! constants.

use crate::constants::{DEFAULT_MAX_DEPTH, DEFAULT_MIN_DIMENSION_THRESHOLD, DEFAULT_TIE_THRESHOLD};

/// Which balance metric the axis selector optimizes. Only `Nwcrt` is
/// defined by spec.md §4.5; kept as an enum (rather than inlining the
/// formula as the only option) so a future metric can be added without
/// changing the selector's call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Normalized worst-case round-trip time difference between the two
    /// candidate halves.
    Nwcrt,
}

/// Which root-finder the divider uses to resolve a Case 2/3 cut point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericalMethod {
    /// Brent's method (bisection / secant / inverse quadratic
    /// interpolation), always convergent given a valid bracket.
    Brent,
    /// Defensive Newton-Raphson: falls back to Brent when the derivative
    /// is too small or the iterate leaves the bracket.
    Newton,
}

/// Recursion recovery strategy when no child of a node yields a valid
/// partition (spec.md §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Store the node's own region as a single partition rather than
    /// dropping it from the output.
    TrackBack,
}

/// Options threaded through a single call to
/// [`crate::algorithms::decomposition::decompose`] (or the KD-tree
/// baselines).
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionConfig {
    /// Recursion depth at which a node is forced to stop splitting,
    /// regardless of coverage. `None` means no explicit cap (coverage
    /// and validity stopping rules still apply); since an obstacle-free
    /// region only bottoms out once a dimension drops below
    /// `min_dimension_threshold`, an uncapped run can take an
    /// impractically long time. The default matches the original's
    /// `max_depth=3`.
    pub max_depth: Option<u32>,
    /// Balance metric used by the optimal axis selector.
    pub metric: Metric,
    /// Root solver used by the obstacle-aware divider.
    pub numerical_method: NumericalMethod,
    /// Minimum sub-region width/height below which a cut is treated as
    /// degenerate and rejected.
    pub min_dimension_threshold: f64,
    /// Whether the decomposition driver re-checks free-space
    /// connectivity of each candidate subregion (spec.md §4.6). Defaults
    /// to `false`, matching the original's `check_connectivity=False`.
    pub check_connectivity: bool,
    /// Whether the divider may retry a rejected cut on the other axis
    /// before giving up on the node.
    pub allow_fallback_axis: bool,
    /// Recovery strategy when recursion bottoms out without a valid
    /// partition.
    pub mode: Mode,
    /// NWCRT difference below which the axis selector breaks the tie
    /// using the MSDU squareness metric instead.
    pub tie_threshold: f64,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        PartitionConfig {
            max_depth: Some(DEFAULT_MAX_DEPTH),
            metric: Metric::Nwcrt,
            numerical_method: NumericalMethod::Newton,
            min_dimension_threshold: DEFAULT_MIN_DIMENSION_THRESHOLD,
            check_connectivity: false,
            allow_fallback_axis: true,
            mode: Mode::TrackBack,
            tie_threshold: DEFAULT_TIE_THRESHOLD,
        }
    }
}
