//! Well-stirred transport over a particle batch
//!
//! # Mathematical Background
//!
//! The reactor volume is perfectly mixed: precursor enters at a fixed
//! rate, reacts with the remaining bare sites, and the excess leaves with
//! the outflow. A quasi-static balance on the gas phase gives a single
//! ODE for the unreacted surface fraction y = 1 − θ:
//!
//! ```text
//! dy/dt = −Da·y / (1 + Da·y),   y(0) = 1
//! ```
//!
//! The equation also admits an exact implicit solution. Separating
//! variables,
//!
//! ```text
//! t(θ) = θ − ln(1 − θ) / Da
//! ```
//!
//! so coverage at a given time follows from a bounded Newton inversion,
//! and a whole saturation curve can be generated without any integration
//! by sweeping θ and evaluating t(θ) directly.
//!
//! The fraction of precursor leaving the reactor unreacted is
//! `x = 1 / (1 + Da·y)`.

use nalgebra::DVector;

use super::{
    CoverageModel, DoseProfile, SaturationCurve, time_grid, validate_damkohler, validate_time,
};
use crate::error::{AldError, Result};
use crate::solver::{BoundedNewton, StiffOde};

/// Coverage model for a well-stirred reactor volume over a particle batch
///
/// Scalar queries invert the implicit relation with [`BoundedNewton`];
/// full curves integrate the coverage ODE with [`StiffOde`]. The two
/// paths agree to solver tolerance, which the test suite checks.
#[derive(Debug, Clone)]
pub struct WellStirred {
    da: f64,
    ode: StiffOde,
    newton: BoundedNewton,
}

impl WellStirred {
    /// Create the model for a given Damköhler number.
    ///
    /// # Errors
    ///
    /// [`AldError::Domain`] unless `da` is positive and finite.
    pub fn new(da: f64) -> Result<Self> {
        Ok(Self {
            da: validate_damkohler(da)?,
            ode: StiffOde::new(),
            newton: BoundedNewton::new(),
        })
    }

    /// Normalized dose time needed to reach coverage `theta`, from the
    /// exact implicit solution.
    ///
    /// # Errors
    ///
    /// [`AldError::Domain`] unless `theta` lies in `[0, 1)`.
    pub fn dose_time(&self, theta: f64) -> Result<f64> {
        if !(theta.is_finite() && (0.0..1.0).contains(&theta)) {
            return Err(AldError::domain("theta", theta, "in [0, 1)"));
        }
        Ok(theta - (1.0 - theta).ln() / self.da)
    }

    /// Saturation curve from the implicit solution, with no integration.
    ///
    /// Sweeps coverage over `points` evenly spaced values in
    /// `[0, theta_max]` and evaluates the exact dose time of each. The
    /// resulting time axis is non-uniform and stretches toward
    /// saturation, where the implicit form is at its best and the ODE at
    /// its stiffest.
    pub fn saturation_curve_implicit(
        &self,
        theta_max: f64,
        points: usize,
    ) -> Result<SaturationCurve> {
        if !(theta_max.is_finite() && theta_max > 0.0 && theta_max < 1.0) {
            return Err(AldError::domain("theta_max", theta_max, "in (0, 1)"));
        }
        if points < 2 {
            return Err(AldError::domain("points", points as f64, "at least 2"));
        }
        let coverage: Vec<f64> = (0..points)
            .map(|i| theta_max * i as f64 / (points - 1) as f64)
            .collect();
        let time: Vec<f64> = coverage
            .iter()
            .map(|&th| th - (1.0 - th).ln() / self.da)
            .collect();
        Ok(SaturationCurve {
            time: DVector::from_vec(time),
            coverage: DVector::from_vec(coverage),
        })
    }

    /// Dose profile from the implicit solution: the
    /// [`WellStirred::saturation_curve_implicit`] sweep plus the
    /// unreacted outflow fraction `1 / (1 + Da·(1 − θ))` at each point.
    pub fn fraction_out(&self, theta_max: f64, points: usize) -> Result<DoseProfile> {
        let curve = self.saturation_curve_implicit(theta_max, points)?;
        let unreacted = curve.coverage.map(|th| 1.0 / (1.0 + self.da * (1.0 - th)));
        Ok(DoseProfile {
            time: curve.time,
            coverage: curve.coverage,
            unreacted,
        })
    }

    /// Unreacted outflow fraction at normalized time `t`.
    pub fn unreacted_fraction(&self, t: f64) -> Result<f64> {
        let theta = self.calc_coverage(t)?;
        Ok(1.0 / (1.0 + self.da * (1.0 - theta)))
    }

    /// Integrate the coverage ODE over the given grid and return the
    /// unreacted surface fraction y at each point.
    fn integrate(&self, grid: &[f64]) -> Result<DVector<f64>> {
        let da = self.da;
        let solution = self.ode.solve(
            move |_t, y| {
                let v = y[0];
                DVector::from_element(1, -da * v / (1.0 + da * v))
            },
            DVector::from_element(1, 1.0),
            grid,
        )?;
        Ok(solution.component(0))
    }
}

impl CoverageModel for WellStirred {
    fn damkohler(&self) -> f64 {
        self.da
    }

    fn set_damkohler(&mut self, da: f64) -> Result<()> {
        self.da = validate_damkohler(da)?;
        Ok(())
    }

    fn calc_coverage(&self, t: f64) -> Result<f64> {
        let t = validate_time(t)?;
        // The relative-change criterion cannot close on the boundary
        // root, so the trivial case short-circuits.
        if t == 0.0 {
            return Ok(0.0);
        }
        let da = self.da;
        self.newton.solve(
            move |th| th - (1.0 - th).ln() / da - t,
            move |th| 1.0 + 1.0 / (da * (1.0 - th)),
        )
    }

    fn saturation_curve(&self, tmax: f64, dt: f64) -> Result<SaturationCurve> {
        let grid = time_grid(tmax, dt)?;
        let y = self.integrate(&grid)?;
        Ok(SaturationCurve {
            time: DVector::from_vec(grid),
            coverage: y.map(|v| (1.0 - v).clamp(0.0, 1.0)),
        })
    }

    fn run(&self, tmax: f64, dt: f64) -> Result<DoseProfile> {
        let grid = time_grid(tmax, dt)?;
        let y = self.integrate(&grid)?;
        let unreacted = y.map(|v| 1.0 / (1.0 + self.da * v.max(0.0)));
        Ok(DoseProfile {
            time: DVector::from_vec(grid),
            coverage: y.map(|v| (1.0 - v).clamp(0.0, 1.0)),
            unreacted,
        })
    }

    fn name(&self) -> &'static str {
        "well-stirred"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
