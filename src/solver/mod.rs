//! Numerical solvers
//!
//! Leaf utilities the coverage models are built on. The split mirrors the
//! rest of the crate: models define *what* equation holds (the physics),
//! solvers define *how* it is driven to a number.
//!
//! - [`StiffOde`]: adaptive-step implicit (trapezoidal) integrator for
//!   the nonlinear coverage ODEs, which turn stiff near saturation.
//!   Trajectories are returned on the caller's exact evaluation grid.
//! - [`BoundedNewton`]: damped Newton iteration for scalar implicit
//!   coverage relations, constrained to the open interval (0, 1).
//!
//! Both solvers fail loudly: an exhausted budget is an
//! [`crate::AldError::Convergence`], never a silently degraded answer.

mod newton;
mod ode;

pub use newton::BoundedNewton;
pub use ode::{OdeSolution, StiffOde};

// =================================================================================================
// Parallel Execution Threshold
// =================================================================================================
//
// Deciding when batched coverage evaluation hands work to Rayon is a
// numerical-execution concern, not a physics concern, so the knob lives
// here rather than next to the models.
//
// The threshold sits in an AtomicUsize so benchmarks and tests can move
// it at runtime without a mutex on every evaluation. Relaxed ordering is
// sufficient: the value is a performance hint, not a synchronization
// point.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Default number of evaluation points above which the batched
/// closed-form coverage path switches to parallel iteration.
///
/// Below this, Rayon's dispatch overhead outweighs the per-point work of
/// the closed-form expressions.
const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

static PARALLEL_THRESHOLD: AtomicUsize = AtomicUsize::new(DEFAULT_PARALLEL_THRESHOLD);

/// Return the current parallel-execution threshold.
///
/// Batched coverage evaluation uses sequential iteration for grids with
/// fewer points than this, and switches to Rayon above it when the crate
/// is compiled with the `parallel` feature.
pub fn parallel_threshold() -> usize {
    PARALLEL_THRESHOLD.load(Ordering::Relaxed)
}

/// Set the parallel-execution threshold.
///
/// # Panics
///
/// Panics when `threshold == 0`, which would force parallel dispatch on
/// every single-point evaluation.
pub fn set_parallel_threshold(threshold: usize) {
    assert!(threshold > 0, "parallel threshold must be at least 1");
    PARALLEL_THRESHOLD.store(threshold, Ordering::Relaxed);
}

// =================================================================================================
// Tests
// =================================================================================================
