//! Error types.
//!
//! Per the propagation policy in spec.md §7, only [`PartitionError`] is
//! user-visible: it is raised by preprocessing when an input geometry
//! cannot be repaired into a usable region. Every other failure mode the
//! core can hit (an empty subregion after clipping, a degenerate cut, a
//! root-finder invoked without a bracketed sign change, solver
//! non-convergence) is recovered locally by the decomposition driver via
//! track-back or fallback-axis retry and never reaches the caller, so it
//! is modeled as the crate-private [`DecomposeSignal`] instead of a public
//! error.

use thiserror::Error;

/// The only error kind a caller of this crate will ever observe.
#[derive(Debug, Error)]
pub enum PartitionError {
    /// The region (or one of the obstacles) could not be repaired into a
    /// simple, 2D, positive-area polygon.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}

/// Internal recovery signal threaded through the divider and the
/// decomposition driver. Never surfaced to callers: every site that can
/// produce one either retries with a fallback or treats it as
/// "track back to the parent".
#[derive(Debug, Error)]
pub(crate) enum DecomposeSignal {
    /// Recursion reached an empty subregion after clipping.
    #[error("empty region")]
    EmptyRegion,
    /// The chosen cut coordinate lies on a region bound, or clipping
    /// produced an empty side.
    #[error("degenerate cut")]
    DegenerateCut,
    /// Brent's method was invoked on a bracket without a sign change.
    #[error("no sign change on bracket [{0}, {1}]")]
    InvalidBracket(f64, f64),
}
