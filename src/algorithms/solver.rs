//! Root-finding for the obstacle-aware divider's cut-point equation
//! (spec.md §4.2). Faithful port of `numerical_solution.py`: Brent's
//! method with inverse-quadratic-interpolation/secant steps and a
//! bisection fallback, plus a "defensive" Newton-Raphson that falls back
//! to Brent on a near-zero derivative or non-convergence.
//!
//! These are hand-rolled rather than delegated to a root-finding crate:
//! the exact fallback conditions are part of what this crate is for.

use crate::constants::{DERIVATIVE_STEP, NEWTON_MIN_DERIVATIVE, SOLVER_MAX_ITER, SOLVER_TOL};
use crate::error::DecomposeSignal;

/// Finds a root of `f` in `[a, b]` using Brent's method. Requires
/// `f(a)` and `f(b)` to have opposite signs.
#[allow(unused_assignments)]
pub fn solve_brent<F>(mut f: F, a0: f64, b0: f64) -> Result<f64, DecomposeSignal>
where
    F: FnMut(f64) -> f64,
{
    let (mut a, mut b) = (a0, b0);
    let mut fa = f(a);
    let mut fb = f(b);
    if fa * fb > 0.0 {
        return Err(DecomposeSignal::InvalidBracket(a0, b0));
    }

    if fa.abs() < fb.abs() {
        std::mem::swap(&mut a, &mut b);
        std::mem::swap(&mut fa, &mut fb);
    }

    let mut c = a;
    let mut fc = fa;
    let mut d = b - a;
    let mut e = d;

    for _ in 0..SOLVER_MAX_ITER {
        if fb.abs() < SOLVER_TOL || (b - a).abs() < SOLVER_TOL {
            return Ok(b);
        }

        let s = if fa != fc && fb != fc {
            (a * fb * fc) / ((fa - fb) * (fa - fc))
                + (b * fa * fc) / ((fb - fa) * (fb - fc))
                + (c * fa * fb) / ((fc - fa) * (fc - fb))
        } else {
            b - fb * (b - a) / (fb - fa)
        };

        let cond = if a < b {
            s < (3.0 * a + b) / 4.0 || s > b
        } else {
            s > (3.0 * a + b) / 4.0 || s < b
        };

        let s = if cond || (s - b).abs() >= (b - c).abs() / 2.0 {
            d = b - a;
            e = d;
            (a + b) / 2.0
        } else {
            d = e;
            s
        };

        let fs = f(s);
        c = b;
        fc = fb;

        if fa * fs < 0.0 {
            b = s;
            fb = fs;
        } else {
            a = s;
            fa = fs;
        }

        if fa.abs() < fb.abs() {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut fa, &mut fb);
        }
    }

    Ok(b)
}

/// Plain Newton-Raphson. Fails (rather than silently diverging) when the
/// derivative gets too small to trust.
fn solve_newton_raphson<F, FP>(mut f: F, mut f_prime: FP, x0: f64) -> Option<f64>
where
    F: FnMut(f64) -> f64,
    FP: FnMut(f64) -> f64,
{
    let mut x = x0;
    for _ in 0..SOLVER_MAX_ITER {
        let fx = f(x);
        if fx.abs() < SOLVER_TOL {
            return Some(x);
        }
        let fpx = f_prime(x);
        if fpx.abs() < NEWTON_MIN_DERIVATIVE {
            return None;
        }
        let x_new = x - fx / fpx;
        if (x_new - x).abs() < SOLVER_TOL {
            return Some(x_new);
        }
        x = x_new;
    }
    Some(x)
}

/// Central-difference derivative, used when the caller doesn't have a
/// closed form for `f'`.
pub fn numerical_derivative<F>(mut f: F, x: f64) -> f64
where
    F: FnMut(f64) -> f64,
{
    (f(x + DERIVATIVE_STEP) - f(x - DERIVATIVE_STEP)) / (2.0 * DERIVATIVE_STEP)
}

/// Tries Newton-Raphson first (starting at `x0`); if the derivative goes
/// near zero or Newton fails to converge usefully, falls back to Brent
/// on `bracket`.
pub fn solve_defensive_newton<F, FP>(
    mut f: F,
    mut f_prime: FP,
    x0: f64,
    bracket: (f64, f64),
) -> Result<f64, DecomposeSignal>
where
    F: FnMut(f64) -> f64,
    FP: FnMut(f64) -> f64,
{
    if let Some(root) = solve_newton_raphson(&mut f, &mut f_prime, x0) {
        return Ok(root);
    }
    solve_brent(f, bracket.0, bracket.1)
}
