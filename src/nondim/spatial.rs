//! Continuous particle coating (spatial ALD)
//!
//! In spatial ALD the particles move through the reactor instead of
//! sitting in a batch, and the time variable of these models is the
//! normalized residence time of a particle in the dosing zone. Mixing is
//! stratified: homogeneous only on the plane perpendicular to the
//! direction of motion.
//!
//! # Mathematical Background
//!
//! With plug-flow precursor transport co-moving with the particles the
//! steady state admits a closed form. Writing `x = e^(−Da·(1−t))`,
//!
//! ```text
//! θ(t) = 1 − (1 − t) / (1 − t·x)
//! ```
//!
//! with the removable singularity at t = 1 filled by its limit
//! `θ(1) = Da / (1 + Da)`. The fraction of precursor leaving the dosing
//! zone unreacted is
//!
//! ```text
//! x_out(t) = (1 − t)·x / (1 − t·x),   x_out(1) = 1 / (1 + Da)
//! ```
//!
//! Under the well-stirred approximation the spatial problem is formally
//! identical to batch coating with the residence time standing in for
//! the dose time, so [`WellMixedSpatial`] delegates to
//! [`WellStirred`].

use nalgebra::DVector;

use super::{
    CoverageModel, DoseProfile, SaturationCurve, WellStirred, time_grid, validate_damkohler,
    validate_time,
};
use crate::error::Result;

// =================================================================================================
// Plug-flow spatial model
// =================================================================================================

/// Closed-form coverage model for continuous coating with plug-flow
/// precursor transport
///
/// Residence times above 1 are meaningful: particles that stay longer
/// than one bed transit keep collecting precursor that earlier,
/// already-saturated material lets through.
#[derive(Debug, Clone, PartialEq)]
pub struct PlugFlowSpatial {
    da: f64,
}

impl PlugFlowSpatial {
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

    /// Fraction of precursor leaving the dosing zone unreacted at
    /// normalized residence time `t`.
    pub fn unreacted_fraction(&self, t: f64) -> Result<f64> {
        let t = validate_time(t)?;
        Ok(self.precursor_at(t))
    }

    fn coverage_at(&self, t: f64) -> f64 {
        if t == 1.0 {
            return self.da / (1.0 + self.da);
        }
        let x = (-self.da * (1.0 - t)).exp();
        1.0 - (1.0 - t) / (1.0 - t * x)
    }

    /// Unreacted fraction, written as (1−t) / (e^(Da·(1−t)) − t).
    ///
    /// This form stays finite on both sides of t = 1: the exponential
    /// overflowing (t < 1, large Da) drives the value to 0, and
    /// underflowing (t > 1, large Da) leaves the (t−1)/t passthrough.
    fn precursor_at(&self, t: f64) -> f64 {
        if t == 1.0 {
            return 1.0 / (1.0 + self.da);
        }
        (1.0 - t) / ((self.da * (1.0 - t)).exp() - t)
    }
}

impl CoverageModel for PlugFlowSpatial {
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
        let coverage = DVector::from_iterator(
            grid.len(),
            grid.iter().map(|&t| self.coverage_at(t).clamp(0.0, 1.0)),
        );
        Ok(SaturationCurve {
            time: DVector::from_vec(grid),
            coverage,
        })
    }

    fn run(&self, tmax: f64, dt: f64) -> Result<DoseProfile> {
        let grid = time_grid(tmax, dt)?;
        let coverage = DVector::from_iterator(
            grid.len(),
            grid.iter().map(|&t| self.coverage_at(t).clamp(0.0, 1.0)),
        );
        let unreacted =
            DVector::from_iterator(grid.len(), grid.iter().map(|&t| self.precursor_at(t)));
        Ok(DoseProfile {
            time: DVector::from_vec(grid),
            coverage,
            unreacted,
        })
    }

    fn name(&self) -> &'static str {
        "plug-flow spatial"
    }
}

// =================================================================================================
// Well-mixed spatial model
// =================================================================================================

/// Coverage model for continuous coating with well-stirred precursor
/// transport
///
/// Formally identical to batch coating under the well-stirred
/// approximation with the normalized residence time standing in for the
/// normalized dose time, so every query delegates to [`WellStirred`].
#[derive(Debug, Clone)]
pub struct WellMixedSpatial {
    inner: WellStirred,
}

impl WellMixedSpatial {
    /// Create the model for a given Damköhler number.
    pub fn new(da: f64) -> Result<Self> {
        Ok(Self {
            inner: WellStirred::new(da)?,
        })
    }

    /// Fraction of precursor leaving the dosing zone unreacted at
    /// normalized residence time `t`.
    pub fn unreacted_fraction(&self, t: f64) -> Result<f64> {
        self.inner.unreacted_fraction(t)
    }
}

impl CoverageModel for WellMixedSpatial {
    fn damkohler(&self) -> f64 {
        self.inner.damkohler()
    }

    fn set_damkohler(&mut self, da: f64) -> Result<()> {
        self.inner.set_damkohler(da)
    }

    fn calc_coverage(&self, t: f64) -> Result<f64> {
        self.inner.calc_coverage(t)
    }

    fn saturation_curve(&self, tmax: f64, dt: f64) -> Result<SaturationCurve> {
        self.inner.saturation_curve(tmax, dt)
    }

    fn run(&self, tmax: f64, dt: f64) -> Result<DoseProfile> {
        self.inner.run(tmax, dt)
    }

    fn name(&self) -> &'static str {
        "well-mixed spatial"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
