//! Soft-saturating (two-pathway) coverage models
//!
//! # Mathematical Background
//!
//! Some ALD chemistries do not saturate cleanly: a fast pathway fills
//! most of the surface while a slow secondary pathway keeps creeping for
//! a long tail. Each pathway carries its own Damköhler number (D1 fast,
//! D2 slow) and site fraction (f1, f2 with f1 + f2 ≤ 1).
//!
//! The state variable is y, the unreacted site fraction of the *first*
//! pathway; the second pathway is slaved to it through the exponent
//! a = D2/D1:
//!
//! ```text
//! y₂ = y^a,    θ = f1·(1 − y) + f2·(1 − y^a)
//! ```
//!
//! The local precursor depletion strength is
//!
//! ```text
//! dec(y) = f1·D1·y + f2·D2·y^a
//! ```
//!
//! and the two transport approximations differ only in how dec enters
//! the rate:
//!
//! - plug flow over a well-mixed batch averages the Beer-Lambert
//!   attenuation across the bed: `dy/dt = −D1·y·(1 − e^(−dec))/dec`
//! - well-stirred transport divides by the total sink:
//!   `dy/dt = −D1·y / (1 + dec)`
//!
//! With f2 = 0, f1 = 1 both collapse to the corresponding single-pathway
//! ideal model. Neither equation has a closed form, so both models
//! always integrate.

use nalgebra::DVector;

use super::{
    CoverageModel, DoseProfile, SaturationCurve, time_grid, validate_damkohler, validate_time,
};
use crate::error::{AldError, Result};
use crate::solver::StiffOde;

/// Shared parameter block of the two soft-saturating models.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Pathways {
    d1: f64,
    d2: f64,
    f1: f64,
    f2: f64,
}

impl Pathways {
    fn new(d1: f64, d2: f64, f1: f64, f2: f64) -> Result<Self> {
        let d1 = validate_damkohler(d1)?;
        let d2 = validate_damkohler(d2)?;
        for (name, value) in [("f1", f1), ("f2", f2)] {
            if !(value.is_finite() && (0.0..=1.0).contains(&value)) {
                return Err(AldError::domain(name, value, "in [0, 1]"));
            }
        }
        if f1 + f2 > 1.0 + 1e-12 {
            return Err(AldError::domain("f1 + f2", f1 + f2, "at most 1"));
        }
        Ok(Self { d1, d2, f1, f2 })
    }

    /// Exponent slaving the slow pathway to the fast one.
    fn alpha(&self) -> f64 {
        self.d2 / self.d1
    }

    /// Local precursor depletion strength at unreacted fraction `y`.
    fn dec(&self, y: f64) -> f64 {
        self.f1 * self.d1 * y + self.f2 * self.d2 * y.powf(self.alpha())
    }

    /// Combined coverage of both pathways at unreacted fraction `y`.
    ///
    /// `y` is clamped to [0, 1] first; the integrator may overshoot the
    /// origin by a rounding error and a negative base would poison the
    /// fractional power.
    fn coverage(&self, y: f64) -> f64 {
        let y = y.clamp(0.0, 1.0);
        let th = self.f1 * (1.0 - y) + self.f2 * (1.0 - y.powf(self.alpha()));
        th.clamp(0.0, 1.0)
    }
}

/// Beer-Lambert averaging factor (1 − e^(−dec))/dec.
///
/// The series limit 1 − dec/2 covers the small-dec regime where the
/// direct quotient loses all its significant digits.
fn attenuation_average(dec: f64) -> f64 {
    if dec < 1e-8 {
        1.0 - 0.5 * dec
    } else {
        -(-dec).exp_m1() / dec
    }
}

// =================================================================================================
// Plug-flow variant
// =================================================================================================

/// Two-pathway soft-saturating kinetics with plug-flow precursor
/// transport over a well-mixed particle batch
///
/// # Example
///
/// ```rust
/// use ald_rs::nondim::{CoverageModel, SoftSatPlugFlow};
///
/// // Fast main pathway, slow secondary pathway on 20% of sites.
/// let model = SoftSatPlugFlow::new(20.0, 0.5, 0.8, 0.2).unwrap();
/// let curve = model.saturation_curve(5.0, 0.01).unwrap();
/// let theta = curve.final_coverage().unwrap();
/// assert!(theta > 0.85 && theta < 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct SoftSatPlugFlow {
    params: Pathways,
    ode: StiffOde,
}

impl SoftSatPlugFlow {
    /// Create the model from the pathway Damköhler numbers and site
    /// fractions.
    ///
    /// # Errors
    ///
    /// [`AldError::Domain`] unless both Damköhler numbers are positive
    /// and finite, both fractions lie in [0, 1], and f1 + f2 ≤ 1.
    pub fn new(d1: f64, d2: f64, f1: f64, f2: f64) -> Result<Self> {
        Ok(Self {
            params: Pathways::new(d1, d2, f1, f2)?,
            ode: StiffOde::new(),
        })
    }

    /// Secondary-pathway Damköhler number.
    pub fn damkohler_slow(&self) -> f64 {
        self.params.d2
    }

    /// Site fractions (f1, f2).
    pub fn site_fractions(&self) -> (f64, f64) {
        (self.params.f1, self.params.f2)
    }

    fn integrate(&self, grid: &[f64]) -> Result<DVector<f64>> {
        let params = self.params;
        let solution = self.ode.solve(
            move |_t, y| {
                let v = y[0].max(0.0);
                let dec = params.dec(v);
                DVector::from_element(1, -params.d1 * v * attenuation_average(dec))
            },
            DVector::from_element(1, 1.0),
            grid,
        )?;
        Ok(solution.component(0))
    }
}

impl CoverageModel for SoftSatPlugFlow {
    fn damkohler(&self) -> f64 {
        self.params.d1
    }

    fn set_damkohler(&mut self, da: f64) -> Result<()> {
        self.params.d1 = validate_damkohler(da)?;
        Ok(())
    }

    fn calc_coverage(&self, t: f64) -> Result<f64> {
        let t = validate_time(t)?;
        if t == 0.0 {
            return Ok(0.0);
        }
        let y = self.integrate(&[t])?;
        Ok(self.params.coverage(y[0]))
    }

    fn saturation_curve(&self, tmax: f64, dt: f64) -> Result<SaturationCurve> {
        let grid = time_grid(tmax, dt)?;
        let y = self.integrate(&grid)?;
        Ok(SaturationCurve {
            time: DVector::from_vec(grid),
            coverage: y.map(|v| self.params.coverage(v)),
        })
    }

    fn run(&self, tmax: f64, dt: f64) -> Result<DoseProfile> {
        let grid = time_grid(tmax, dt)?;
        let y = self.integrate(&grid)?;
        // Beer-Lambert transmission through the whole bed.
        let unreacted = y.map(|v| (-self.params.dec(v.max(0.0))).exp());
        Ok(DoseProfile {
            time: DVector::from_vec(grid),
            coverage: y.map(|v| self.params.coverage(v)),
            unreacted,
        })
    }

    fn name(&self) -> &'static str {
        "soft-saturating plug-flow"
    }
}

// =================================================================================================
// Well-stirred variant
// =================================================================================================

/// Two-pathway soft-saturating kinetics with well-stirred precursor
/// transport
#[derive(Debug, Clone)]
pub struct SoftSatWellStirred {
    params: Pathways,
    ode: StiffOde,
}

impl SoftSatWellStirred {
    /// Create the model from the pathway Damköhler numbers and site
    /// fractions.
    ///
    /// # Errors
    ///
    /// [`AldError::Domain`] unless both Damköhler numbers are positive
    /// and finite, both fractions lie in [0, 1], and f1 + f2 ≤ 1.
    pub fn new(d1: f64, d2: f64, f1: f64, f2: f64) -> Result<Self> {
        Ok(Self {
            params: Pathways::new(d1, d2, f1, f2)?,
            ode: StiffOde::new(),
        })
    }

    /// Secondary-pathway Damköhler number.
    pub fn damkohler_slow(&self) -> f64 {
        self.params.d2
    }

    /// Site fractions (f1, f2).
    pub fn site_fractions(&self) -> (f64, f64) {
        (self.params.f1, self.params.f2)
    }

    /// Like [`CoverageModel::run`], additionally returning the coverage
    /// of each pathway separately.
    pub fn run_split(&self, tmax: f64, dt: f64) -> Result<(DoseProfile, DVector<f64>, DVector<f64>)> {
        let grid = time_grid(tmax, dt)?;
        let y = self.integrate(&grid)?;
        let alpha = self.params.alpha();
        let cov_fast = y.map(|v| (1.0 - v).clamp(0.0, 1.0));
        let cov_slow = y.map(|v| (1.0 - v.clamp(0.0, 1.0).powf(alpha)).clamp(0.0, 1.0));
        let profile = DoseProfile {
            time: DVector::from_vec(grid),
            coverage: y.map(|v| self.params.coverage(v)),
            unreacted: y.map(|v| self.unreacted_at(v)),
        };
        Ok((profile, cov_fast, cov_slow))
    }

    fn unreacted_at(&self, y: f64) -> f64 {
        1.0 / (1.0 + self.params.dec(y.max(0.0)))
    }

    fn integrate(&self, grid: &[f64]) -> Result<DVector<f64>> {
        let params = self.params;
        let solution = self.ode.solve(
            move |_t, y| {
                let v = y[0].max(0.0);
                DVector::from_element(1, -params.d1 * v / (1.0 + params.dec(v)))
            },
            DVector::from_element(1, 1.0),
            grid,
        )?;
        Ok(solution.component(0))
    }
}

impl CoverageModel for SoftSatWellStirred {
    fn damkohler(&self) -> f64 {
        self.params.d1
    }

    fn set_damkohler(&mut self, da: f64) -> Result<()> {
        self.params.d1 = validate_damkohler(da)?;
        Ok(())
    }

    fn calc_coverage(&self, t: f64) -> Result<f64> {
        let t = validate_time(t)?;
        if t == 0.0 {
            return Ok(0.0);
        }
        let y = self.integrate(&[t])?;
        Ok(self.params.coverage(y[0]))
    }

    fn saturation_curve(&self, tmax: f64, dt: f64) -> Result<SaturationCurve> {
        let grid = time_grid(tmax, dt)?;
        let y = self.integrate(&grid)?;
        Ok(SaturationCurve {
            time: DVector::from_vec(grid),
            coverage: y.map(|v| self.params.coverage(v)),
        })
    }

    fn run(&self, tmax: f64, dt: f64) -> Result<DoseProfile> {
        let grid = time_grid(tmax, dt)?;
        let y = self.integrate(&grid)?;
        Ok(DoseProfile {
            time: DVector::from_vec(grid),
            coverage: y.map(|v| self.params.coverage(v)),
            unreacted: y.map(|v| self.unreacted_at(v)),
        })
    }

    fn name(&self) -> &'static str {
        "soft-saturating well-stirred"
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nondim::{PlugFlowMixed, WellStirred};
    use approx::assert_relative_eq;

    #[test]
    fn test_attenuation_average_series_limit() {
        // Continuity across the series switchover.
        assert_relative_eq!(attenuation_average(1e-9), 1.0 - 0.5e-9, max_relative = 1e-12);
        assert_relative_eq!(
            attenuation_average(2e-8),
            attenuation_average(1e-8 - 1e-12),
            max_relative = 1e-7
        );
        assert_relative_eq!(
            attenuation_average(1.0),
            1.0 - (-1.0f64).exp(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_single_pathway_reduces_to_ideal_plugflow() {
        // f2 = 0, f1 = 1 turns the RHS into the ideal plug-flow law.
        let soft = SoftSatPlugFlow::new(10.0, 1.0, 1.0, 0.0).unwrap();
        let ideal = PlugFlowMixed::new(10.0).unwrap();
        let a = soft.saturation_curve(3.0, 0.05).unwrap();
        let b = ideal.saturation_curve(3.0, 0.05).unwrap();
        for i in 0..a.len() {
            assert_relative_eq!(a.coverage[i], b.coverage[i], epsilon = 1e-4);
        }
    }

    #[test]
    fn test_single_pathway_reduces_to_ideal_wellstirred() {
        let soft = SoftSatWellStirred::new(10.0, 1.0, 1.0, 0.0).unwrap();
        let ideal = WellStirred::new(10.0).unwrap();
        let a = soft.saturation_curve(3.0, 0.05).unwrap();
        let b = ideal.saturation_curve(3.0, 0.05).unwrap();
        for i in 0..a.len() {
            assert_relative_eq!(a.coverage[i], b.coverage[i], epsilon = 1e-4);
        }
    }

    #[test]
    fn test_slow_pathway_lags_fast_pathway() {
        let model = SoftSatWellStirred::new(20.0, 0.5, 0.7, 0.3).unwrap();
        let (profile, fast, slow) = model.run_split(5.0, 0.01).unwrap();
        assert_eq!(profile.len(), 500);
        // After the fast pathway is essentially full, the slow one is not.
        let last = profile.len() - 1;
        assert!(fast[last] > 0.99);
        assert!(slow[last] < 0.95);
        // Combined coverage is the site-weighted mix.
        assert_relative_eq!(
            profile.coverage[last],
            0.7 * fast[last] + 0.3 * slow[last],
            max_relative = 1e-10
        );
    }

    #[test]
    fn test_soft_tail_saturates_slower_than_ideal() {
        // The hallmark of soft saturation: coverage climbs fast early
        // but the tail creeps.
        let soft = SoftSatPlugFlow::new(20.0, 0.2, 0.8, 0.2).unwrap();
        let ideal = PlugFlowMixed::new(20.0).unwrap();
        let t = 5.0;
        let soft_theta = soft.calc_coverage(t).unwrap();
        let ideal_theta = ideal.calc_coverage(t).unwrap();
        assert!(soft_theta < ideal_theta);
        assert!(soft_theta > 0.8);
    }

    #[test]
    fn test_coverage_monotone_and_bounded() {
        for curve in [
            SoftSatPlugFlow::new(15.0, 0.3, 0.75, 0.25)
                .unwrap()
                .saturation_curve(5.0, 0.01)
                .unwrap(),
            SoftSatWellStirred::new(15.0, 0.3, 0.75, 0.25)
                .unwrap()
                .saturation_curve(5.0, 0.01)
                .unwrap(),
        ] {
            let mut prev = -1.0;
            for &th in curve.coverage.iter() {
                assert!((0.0..=1.0).contains(&th));
                assert!(th >= prev - 1e-9);
                prev = th;
            }
        }
    }

    #[test]
    fn test_unreacted_fraction_rises_with_coverage() {
        let model = SoftSatWellStirred::new(10.0, 1.0, 0.8, 0.2).unwrap();
        let profile = model.run(5.0, 0.01).unwrap();
        assert_relative_eq!(
            profile.unreacted[0],
            1.0 / (1.0 + 0.8 * 10.0 + 0.2 * 1.0),
            max_relative = 1e-9
        );
        assert!(profile.unreacted[profile.len() - 1] > 0.8);
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(SoftSatPlugFlow::new(0.0, 1.0, 0.5, 0.5).is_err());
        assert!(SoftSatPlugFlow::new(1.0, -1.0, 0.5, 0.5).is_err());
        assert!(SoftSatPlugFlow::new(1.0, 1.0, 1.2, 0.0).is_err());
        assert!(SoftSatWellStirred::new(1.0, 1.0, 0.7, 0.6).is_err());
        assert!(SoftSatWellStirred::new(1.0, 1.0, 0.5, -0.1).is_err());
    }
}
