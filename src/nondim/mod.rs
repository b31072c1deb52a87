//! Nondimensional coverage models
//!
//! Every model in this module is a pure mapping from a Damköhler number
//! and a normalized time to a surface coverage. The Damköhler number
//! compares the reaction rate against the transport/delivery rate and is
//! the sole free parameter; everything dimensional (pressure, flow,
//! surface area) has already been folded into it by the time these models
//! run.
//!
//! The models differ only in their transport approximation:
//!
//! - [`PlugFlowMixed`]: batch particle coating, plug-flow precursor
//!   delivery, well-mixed particles. Closed form.
//! - [`WellStirred`]: batch coating with well-stirred delivery. Nonlinear
//!   ODE, plus an implicit inverse solved by bounded Newton.
//! - [`PlugFlowSpatial`] / [`WellMixedSpatial`]: continuous (spatial) ALD
//!   over normalized residence time.
//! - [`SoftSatPlugFlow`] / [`SoftSatWellStirred`]: two-pathway
//!   soft-saturating chemistry, always ODE-solved.
//!
//! All models share the [`CoverageModel`] trait: scalar
//! `calc_coverage(t)`, a `saturation_curve(tmax, dt)` over the half-open
//! grid `[0, tmax)`, and `run(tmax, dt)` which additionally reports the
//! unreacted precursor fraction.

mod plugflow;
mod softsat;
mod spatial;
mod wellstirred;

pub use plugflow::PlugFlowMixed;
pub use softsat::{SoftSatPlugFlow, SoftSatWellStirred};
pub use spatial::{PlugFlowSpatial, WellMixedSpatial};
pub use wellstirred::WellStirred;

use nalgebra::DVector;

use crate::error::{AldError, Result};

/// Default largest normalized dose time for saturation curves.
pub const DEFAULT_TMAX: f64 = 5.0;

/// Default normalized time step for saturation curves.
pub const DEFAULT_DT: f64 = 0.01;

// =================================================================================================
// Curve containers
// =================================================================================================

/// A saturation curve: coverage against (normalized or physical) time
#[derive(Debug, Clone, PartialEq)]
pub struct SaturationCurve {
    /// Time axis
    pub time: DVector<f64>,
    /// Surface coverage at each time, in [0, 1]
    pub coverage: DVector<f64>,
}

impl SaturationCurve {
    /// Number of points on the curve.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// True for an empty curve.
    pub fn is_empty(&self) -> bool {
        self.time.len() == 0
    }

    /// Coverage at the last grid point, if any.
    pub fn final_coverage(&self) -> Option<f64> {
        (!self.is_empty()).then(|| self.coverage[self.coverage.len() - 1])
    }
}

/// A full dose profile: saturation curve plus the unreacted precursor
/// fraction (precursor leaving the reactor, or surviving the bed,
/// depending on the model)
#[derive(Debug, Clone, PartialEq)]
pub struct DoseProfile {
    /// Time axis
    pub time: DVector<f64>,
    /// Surface coverage at each time
    pub coverage: DVector<f64>,
    /// Unreacted precursor fraction at each time
    pub unreacted: DVector<f64>,
}

impl DoseProfile {
    /// Number of points on the profile.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// True for an empty profile.
    pub fn is_empty(&self) -> bool {
        self.time.len() == 0
    }

    /// Drop the unreacted fraction, keeping the saturation curve.
    pub fn into_curve(self) -> SaturationCurve {
        SaturationCurve {
            time: self.time,
            coverage: self.coverage,
        }
    }
}

// =================================================================================================
// CoverageModel trait
// =================================================================================================

/// A nondimensional coverage model: pure mapping (Da, t) → θ
///
/// Coverage is history-independent given (Da, t) for every implementor
/// (memoryless first-order kinetics), so independent queries are safe to
/// evaluate in any order or in parallel.
pub trait CoverageModel {
    /// The Damköhler number driving the model.
    fn damkohler(&self) -> f64;

    /// Replace the Damköhler number. This is the single explicit refresh
    /// point; implementors hold no other derived state.
    fn set_damkohler(&mut self, da: f64) -> Result<()>;

    /// Coverage at a single normalized time.
    fn calc_coverage(&self, t: f64) -> Result<f64>;

    /// Saturation curve over the half-open grid `[0, tmax)` with step
    /// `dt`.
    fn saturation_curve(&self, tmax: f64, dt: f64) -> Result<SaturationCurve>;

    /// Like [`CoverageModel::saturation_curve`], additionally reporting
    /// the unreacted precursor fraction.
    fn run(&self, tmax: f64, dt: f64) -> Result<DoseProfile>;

    /// Coverage at each of the given times.
    ///
    /// Default: point-by-point evaluation. Closed-form models override
    /// this with a batched (optionally parallel) path.
    fn coverage_profile(&self, times: &[f64]) -> Result<DVector<f64>> {
        let values = times
            .iter()
            .map(|&t| self.calc_coverage(t))
            .collect::<Result<Vec<f64>>>()?;
        Ok(DVector::from_vec(values))
    }

    /// Model name, for display and logging.
    fn name(&self) -> &'static str;
}

// =================================================================================================
// Shared helpers
// =================================================================================================

/// Validate a Damköhler number: strictly positive and finite.
pub(crate) fn validate_damkohler(da: f64) -> Result<f64> {
    if da.is_finite() && da > 0.0 {
        Ok(da)
    } else {
        Err(AldError::domain("Da", da, "positive and finite"))
    }
}

/// Validate a normalized time: non-negative and finite.
pub(crate) fn validate_time(t: f64) -> Result<f64> {
    if t.is_finite() && t >= 0.0 {
        Ok(t)
    } else {
        Err(AldError::domain("t", t, "non-negative and finite"))
    }
}

/// The half-open evaluation grid `[0, tmax)` with step `dt`.
///
/// Matches the convention of every saturation curve in this crate:
/// `tmax = 5, dt = 0.01` gives exactly 500 points starting at 0.
pub(crate) fn time_grid(tmax: f64, dt: f64) -> Result<Vec<f64>> {
    if !(tmax.is_finite() && tmax > 0.0) {
        return Err(AldError::domain("tmax", tmax, "positive and finite"));
    }
    if !(dt.is_finite() && dt > 0.0) {
        return Err(AldError::domain("dt", dt, "positive and finite"));
    }
    if dt > tmax {
        return Err(AldError::domain("dt", dt, "at most tmax"));
    }
    // Epsilon guard so tmax/dt landing a hair above an integer does not
    // produce a spurious extra point.
    let n = (tmax / dt - 1e-9).ceil() as usize;
    Ok((0..n).map(|i| i as f64 * dt).collect())
}

// =================================================================================================
// Tests
// =================================================================================================
