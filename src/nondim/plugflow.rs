//! Plug-flow transport over a well-mixed particle batch
//!
//! # Mathematical Background
//!
//! Precursor moves through the particle bed in plug flow while the
//! particles themselves are perfectly mixed, so every particle sees the
//! same average exposure. With first-order Langmuir kinetics the coupled
//! transport/reaction problem collapses to a closed form for the
//! coverage θ at normalized dose time t:
//!
//! ```text
//! θ(t) = 1 − ln(1 + (e^Da − 1)·e^(−Da·t)) / Da
//! ```
//!
//! where Da is the Damköhler number of the bed. The same solution gives
//! the fraction of precursor that crosses the bed unreacted:
//!
//! ```text
//! x(t) = e^(−Da·(1 − θ(t)))
//! ```
//!
//! For large Da the factor `e^Da` overflows f64 long before the coverage
//! itself misbehaves, so the evaluation is carried out in log space (see
//! [`PlugFlowMixed::calc_coverage`]).

use nalgebra::DVector;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::{
    CoverageModel, DoseProfile, SaturationCurve, time_grid, validate_damkohler, validate_time,
};
use crate::error::Result;
#[cfg(feature = "parallel")]
use crate::solver::parallel_threshold;

/// Closed-form coverage model for plug-flow delivery over a well-mixed
/// particle batch
///
/// # Example
///
/// ```rust
/// use ald_rs::nondim::{CoverageModel, PlugFlowMixed};
///
/// let model = PlugFlowMixed::new(10.0).unwrap();
/// let curve = model.saturation_curve(5.0, 0.01).unwrap();
/// assert_eq!(curve.len(), 500);
/// assert!(curve.final_coverage().unwrap() > 0.99);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PlugFlowMixed {
    da: f64,
}

/// Numerically safe ln(1 + e^x).
///
/// Past ~30 the correction `ln_1p(e^(−x))` is below f64 resolution, so
/// the identity softplus(x) = x + ln(1 + e^(−x)) degenerates to x.
fn softplus(x: f64) -> f64 {
    if x > 30.0 { x } else { x.exp().ln_1p() }
}

impl PlugFlowMixed {
    /// Create the model for a given Damköhler number.
    ///
    /// # Errors
    ///
    /// [`crate::AldError::Domain`] unless `da` is positive and finite.
    pub fn new(da: f64) -> Result<Self> {
        Ok(Self {
            da: validate_damkohler(da)?,
        })
    }

    /// Fraction of precursor leaving the bed unreacted at normalized
    /// time `t`.
    pub fn unreacted_fraction(&self, t: f64) -> Result<f64> {
        let theta = self.calc_coverage(t)?;
        Ok((-self.da * (1.0 - theta)).exp())
    }

    /// The coverage expression, evaluated in log space.
    ///
    /// With A = Da + ln(1 − e^(−Da)),
    ///
    /// ```text
    /// ln(1 + (e^Da − 1)·e^(−Da·t)) = softplus(A − Da·t)
    /// ```
    ///
    /// which never forms e^Da and stays finite for any Da a f64 can hold.
    fn coverage_at(&self, t: f64) -> f64 {
        let a = self.da + (-(-self.da).exp_m1()).ln();
        1.0 - softplus(a - self.da * t) / self.da
    }
}

impl CoverageModel for PlugFlowMixed {
    fn damkohler(&self) -> f64 {
        self.da
    }

    fn set_damkohler(&mut self, da: f64) -> Result<()> {
        self.da = validate_damkohler(da)?;
        Ok(())
    }

    fn calc_coverage(&self, t: f64) -> Result<f64> {
        let t = validate_time(t)?;
        Ok(self.coverage_at(t).clamp(0.0, 1.0))
    }

    fn saturation_curve(&self, tmax: f64, dt: f64) -> Result<SaturationCurve> {
        let grid = time_grid(tmax, dt)?;
        let coverage = self.coverage_profile(&grid)?;
        Ok(SaturationCurve {
            time: DVector::from_vec(grid),
            coverage,
        })
    }

    fn run(&self, tmax: f64, dt: f64) -> Result<DoseProfile> {
        let curve = self.saturation_curve(tmax, dt)?;
        let unreacted = curve.coverage.map(|th| (-self.da * (1.0 - th)).exp());
        Ok(DoseProfile {
            time: curve.time,
            coverage: curve.coverage,
            unreacted,
        })
    }

    #[cfg(feature = "parallel")]
    fn coverage_profile(&self, times: &[f64]) -> Result<DVector<f64>> {
        for &t in times {
            validate_time(t)?;
        }
        let values: Vec<f64> = if times.len() >= parallel_threshold() {
            times
                .par_iter()
                .map(|&t| self.coverage_at(t).clamp(0.0, 1.0))
                .collect()
        } else {
            times
                .iter()
                .map(|&t| self.coverage_at(t).clamp(0.0, 1.0))
                .collect()
        };
        Ok(DVector::from_vec(values))
    }

    #[cfg(not(feature = "parallel"))]
    fn coverage_profile(&self, times: &[f64]) -> Result<DVector<f64>> {
        for &t in times {
            validate_time(t)?;
        }
        let values: Vec<f64> = times
            .iter()
            .map(|&t| self.coverage_at(t).clamp(0.0, 1.0))
            .collect();
        Ok(DVector::from_vec(values))
    }

    fn name(&self) -> &'static str {
        "plug-flow / well-mixed"
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_coverage_starts_at_zero() {
        let model = PlugFlowMixed::new(10.0).unwrap();
        assert_relative_eq!(model.calc_coverage(0.0).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_coverage_matches_closed_form() {
        let da = 5.0;
        let model = PlugFlowMixed::new(da).unwrap();
        for &t in &[0.1, 0.5, 1.0, 2.0] {
            let direct = 1.0 - (1.0 + (da.exp() - 1.0) * (-da * t).exp()).ln() / da;
            assert_relative_eq!(
                model.calc_coverage(t).unwrap(),
                direct,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_large_da_does_not_overflow() {
        // e^2000 overflows f64; the log-space form must not.
        let model = PlugFlowMixed::new(2000.0).unwrap();
        let theta = model.calc_coverage(0.5).unwrap();
        assert!(theta.is_finite());
        // Fast kinetics: coverage tracks the dosed amount until saturation.
        assert_relative_eq!(theta, 0.5, max_relative = 1e-2);
        assert_relative_eq!(model.calc_coverage(2.0).unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_small_da_approaches_exponential() {
        // Da → 0 recovers the reaction-limited first-order law
        // θ = 1 − e^(−Da·t).
        let da = 1e-6;
        let model = PlugFlowMixed::new(da).unwrap();
        for &t in &[0.5, 1.0, 3.0] {
            assert_relative_eq!(
                model.calc_coverage(t).unwrap(),
                1.0 - (-da * t).exp(),
                max_relative = 1e-5
            );
        }
    }

    #[test]
    fn test_coverage_monotone_and_bounded() {
        let model = PlugFlowMixed::new(20.0).unwrap();
        let curve = model.saturation_curve(5.0, 0.01).unwrap();
        let mut prev = -1.0;
        for &th in curve.coverage.iter() {
            assert!((0.0..=1.0).contains(&th));
            assert!(th >= prev);
            prev = th;
        }
    }

    #[test]
    fn test_unreacted_fraction_rises_to_one() {
        // Early in the dose the bed consumes nearly everything; once
        // saturated the precursor passes straight through.
        let model = PlugFlowMixed::new(15.0).unwrap();
        let early = model.unreacted_fraction(0.05).unwrap();
        let late = model.unreacted_fraction(5.0).unwrap();
        assert!(early < 1e-4);
        assert!(late > 0.99);
    }

    #[test]
    fn test_run_matches_pointwise() {
        let model = PlugFlowMixed::new(8.0).unwrap();
        let profile = model.run(2.0, 0.1).unwrap();
        assert_eq!(profile.len(), 20);
        for i in 0..profile.len() {
            let t = profile.time[i];
            assert_relative_eq!(
                profile.coverage[i],
                model.calc_coverage(t).unwrap(),
                max_relative = 1e-12
            );
            assert_relative_eq!(
                profile.unreacted[i],
                model.unreacted_fraction(t).unwrap(),
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert!(PlugFlowMixed::new(0.0).is_err());
        assert!(PlugFlowMixed::new(-3.0).is_err());
        let model = PlugFlowMixed::new(1.0).unwrap();
        assert!(model.calc_coverage(-0.1).is_err());
        assert!(model.calc_coverage(f64::NAN).is_err());
    }
}
