//! Bounded Newton root-finder
//!
//! # Mathematical Background
//!
//! The implicit coverage relations of the well-stirred models have the form
//!
//! ```text
//! f(θ) = θ − ln(1−θ)/Da − τ = 0,   θ ∈ (0, 1)
//! ```
//!
//! A plain Newton iteration on this equation is unusable: the logarithm
//! diverges at θ = 1 and is undefined outside the interval, so any iterate
//! that escapes (0, 1) poisons the solve. The bounded variant keeps every
//! iterate strictly inside the open interval by damping the Newton step:
//!
//! 1. Start at θ = 0.5.
//! 2. Compute the step `θ' = θ − damp·f(θ)/f'(θ)` with `damp = 0.1`.
//! 3. While θ' leaves (0, 1), halve `damp` and retry the *same* step;
//!    `f` and `f'` are not re-evaluated.
//! 4. Accept once the relative change `|θ − θ'|/θ` drops below tolerance.
//!
//! The nested damping retry guarantees the domain is never violated, at
//! the cost of slow convergence when the root sits close to θ = 1.
//! Both loops are budgeted: damping underflow and outer-iteration
//! exhaustion are reported as convergence failures, never spun on.

use log::debug;

use crate::error::{AldError, Result};

/// Default relative tolerance on the accepted iterate.
const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default cap on outer Newton iterations.
///
/// Roots near θ = 1 converge slowly under damping; 500 iterations is far
/// beyond what any admissible (Da, τ) pair needs.
const DEFAULT_MAX_ITERATIONS: usize = 500;

/// Newton root-finder constrained to the open interval (0, 1)
///
/// # Example
///
/// ```rust
/// use ald_rs::solver::BoundedNewton;
///
/// // θ − ln(1−θ)/Da = τ with Da = 10, τ = 1
/// let (da, tau) = (10.0, 1.0);
/// let newton = BoundedNewton::new();
/// let theta = newton
///     .solve(
///         |t| t - (1.0 - t).ln() / da - tau,
///         |t| 1.0 + 1.0 / (da * (1.0 - t)),
///     )
///     .unwrap();
/// assert!(theta > 0.0 && theta < 1.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BoundedNewton {
    tolerance: f64,
    max_iterations: usize,
}

impl Default for BoundedNewton {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundedNewton {
    /// Create a solver with the default tolerance (1e-6) and budget.
    pub fn new() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Create a solver with a custom relative tolerance and iteration cap.
    pub fn with_tolerance(tolerance: f64, max_iterations: usize) -> Result<Self> {
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(AldError::domain(
                "tolerance",
                tolerance,
                "positive and finite",
            ));
        }
        if max_iterations == 0 {
            return Err(AldError::domain("max_iterations", 0.0, "at least 1"));
        }
        Ok(Self {
            tolerance,
            max_iterations,
        })
    }

    /// Relative tolerance on the accepted iterate.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Solve `f(θ) = 0` for θ ∈ (0, 1) given `f` and its derivative.
    ///
    /// # Errors
    ///
    /// [`AldError::Convergence`] when the damping factor underflows while
    /// searching for an admissible step, or when the outer iteration
    /// budget is exhausted before the relative change meets tolerance.
    pub fn solve<F, G>(&self, f: F, fprime: G) -> Result<f64>
    where
        F: Fn(f64) -> f64,
        G: Fn(f64) -> f64,
    {
        let mut theta = 0.5;

        for iteration in 0..self.max_iterations {
            let f_t = f(theta);
            let fp_t = fprime(theta);

            // Damped step, halved until the iterate is admissible. The
            // residual and slope are frozen: this is a retry of the same
            // Newton step, not a fresh evaluation.
            let mut damp = 0.1;
            let mut theta_new = f64::NAN;
            while !(theta_new > 0.0 && theta_new < 1.0) {
                damp *= 0.5;
                if damp < f64::MIN_POSITIVE {
                    return Err(AldError::Convergence {
                        solver: "bounded Newton",
                        detail: format!(
                            "damping underflowed at iteration {iteration} (theta = {theta})"
                        ),
                    });
                }
                theta_new = theta - damp * f_t / fp_t;
            }

            let change = (theta - theta_new).abs() / theta;
            theta = theta_new;

            if change < self.tolerance {
                debug!(
                    "bounded Newton converged in {} iterations (theta = {theta})",
                    iteration + 1
                );
                return Ok(theta);
            }
        }

        Err(AldError::Convergence {
            solver: "bounded Newton",
            detail: format!(
                "no convergence within {} iterations (last theta = {theta})",
                self.max_iterations
            ),
        })
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Implicit well-stirred dose relation, the primary client of this solver.
    fn implicit_coverage(da: f64, tau: f64) -> f64 {
        let newton = BoundedNewton::new();
        newton
            .solve(
                move |t| t - (1.0 - t).ln() / da - tau,
                move |t| 1.0 + 1.0 / (da * (1.0 - t)),
            )
            .unwrap()
    }

    #[test]
    fn test_solver_creation() {
        let solver = BoundedNewton::new();
        assert_eq!(solver.tolerance(), 1e-6);
    }

    #[test]
    fn test_invalid_tolerance_rejected() {
        assert!(BoundedNewton::with_tolerance(-1e-6, 100).is_err());
        assert!(BoundedNewton::with_tolerance(f64::NAN, 100).is_err());
        assert!(BoundedNewton::with_tolerance(1e-6, 0).is_err());
    }

    #[test]
    fn test_implicit_coverage_da10_tau1() {
        // θ − ln(1−θ)/10 = 1 has its root at θ ≈ 0.825451
        let theta = implicit_coverage(10.0, 1.0);

        // The damped relative-change criterion stops within ~1e-5 of the
        // root, not at machine precision.
        let residual = theta - (1.0 - theta).ln() / 10.0 - 1.0;
        assert!(residual.abs() < 1e-4, "residual {residual} too large");
        assert_relative_eq!(theta, 0.825451, max_relative = 1e-4);
    }

    #[test]
    fn test_root_stays_in_open_interval() {
        // Large τ pushes the root close to saturation; the iterates must
        // never leave (0, 1) on the way there.
        let theta = implicit_coverage(50.0, 4.0);
        assert!(theta > 0.99 && theta < 1.0);
    }

    #[test]
    fn test_small_damkohler_root() {
        // Reaction-limited regime: τ = 1 mostly flows through unreacted.
        let theta = implicit_coverage(0.1, 1.0);
        assert!(theta > 0.0 && theta < 0.2);
        let residual = theta - (1.0 - theta).ln() / 0.1 - 1.0;
        assert!(residual.abs() < 1e-4);
    }

    #[test]
    fn test_simple_quadratic() {
        // f(θ) = θ² − 0.25, root at 0.5, converges immediately.
        let solver = BoundedNewton::new();
        let root = solver.solve(|t| t * t - 0.25, |t| 2.0 * t).unwrap();
        assert_relative_eq!(root, 0.5, max_relative = 1e-6);
    }

    #[test]
    fn test_rootless_function_reports_budget() {
        // f(θ) = 1 has no root; the solver must give up, not spin.
        let solver = BoundedNewton::new();
        let result = solver.solve(|_| 1.0, |_| 1e-3);
        assert!(matches!(
            result,
            Err(AldError::Convergence { solver: "bounded Newton", .. })
        ));
    }

    #[test]
    fn test_damping_underflow_reported() {
        // A NaN residual keeps every damped iterate inadmissible, so the
        // inner loop must run down to underflow and report it.
        let solver = BoundedNewton::new();
        let result = solver.solve(|_| f64::NAN, |_| 1.0);
        match result {
            Err(AldError::Convergence { detail, .. }) => {
                assert!(detail.contains("damping underflowed"));
            }
            other => panic!("expected damping underflow, got {other:?}"),
        }
    }
}
