//! Zero-dimensional dose model
//!
//! The simplest dimensional picture: a surface exposed to a constant
//! precursor pressure, with no transport limitation at all. Every site
//! sees the full wall flux, so each pathway saturates as a pure
//! exponential with its own characteristic time
//!
//! ```text
//! t_i = 1 / (s0 · J_wall(T, p) · β_i)
//! ```
//!
//! This is the reference against which the flow models show their
//! transport-induced slowdown, and the quickest way to translate a
//! measured sticking probability into an expected dose time.

use nalgebra::DVector;

use super::{CURVE_POINTS, CURVE_SPAN, DoseModel};
use crate::chem::{KineticsModel, SurfaceKinetics};
use crate::error::{Result, ensure_positive};
use crate::nondim::{DoseProfile, SaturationCurve, time_grid};

/// Transport-free dose model: direct exposure at constant pressure
///
/// Accepts either kinetics arity. Single-pathway chemistry gives the
/// classic `1 − e^(−t/t0)` curve; two-pathway chemistry the weighted sum
/// of two exponentials, whose slow tail is the soft-saturation
/// signature.
///
/// # Example
///
/// ```rust
/// use ald_rs::chem::{IdealKinetics, Precursor};
/// use ald_rs::dose::{DoseModel, ZeroD};
///
/// let tma = Precursor::from_table("TMA").unwrap();
/// let kin = IdealKinetics::new(tma, 1e19, 1e-2).unwrap();
/// let model = ZeroD::new(kin.into(), 473.15, 26.0).unwrap();
/// let curve = model.saturation_curve().unwrap();
/// assert_eq!(curve.len(), 500);
/// ```
#[derive(Debug, Clone)]
pub struct ZeroD {
    kinetics: KineticsModel,
    temperature: f64,
    pressure: f64,
}

impl ZeroD {
    /// Create the model. `temperature` in K, `pressure` the precursor
    /// partial pressure in Pa.
    pub fn new(kinetics: KineticsModel, temperature: f64, pressure: f64) -> Result<Self> {
        Ok(Self {
            kinetics,
            temperature: ensure_positive("temperature", temperature)?,
            pressure: ensure_positive("pressure", pressure)?,
        })
    }

    /// The bound chemistry.
    pub fn kinetics(&self) -> &KineticsModel {
        &self.kinetics
    }

    /// Saturation time of a pathway with intrinsic probability `beta`.
    fn pathway_timescale(&self, beta: f64) -> f64 {
        let flux = self.kinetics.precursor().wall_flux(self.temperature, self.pressure);
        1.0 / (self.kinetics.site_area() * flux * beta)
    }
}

impl DoseModel for ZeroD {
    /// Characteristic time of the slowest pathway.
    fn timescale(&self) -> f64 {
        match &self.kinetics {
            KineticsModel::Ideal(k) => self.pathway_timescale(k.beta0()),
            KineticsModel::SoftSaturating(k) => self
                .pathway_timescale(k.beta1())
                .max(self.pathway_timescale(k.beta2())),
        }
    }

    /// Nothing is cached; chemistry edits take effect immediately.
    fn refresh(&mut self) -> Result<()> {
        Ok(())
    }

    fn saturation_curve(&self) -> Result<SaturationCurve> {
        let profile = self.run()?;
        Ok(profile.into_curve())
    }

    fn run(&self) -> Result<DoseProfile> {
        let t0 = self.timescale();
        let tmax = CURVE_SPAN * t0;
        let grid = time_grid(tmax, tmax / CURVE_POINTS as f64)?;

        let (coverage, unreacted): (Vec<f64>, Vec<f64>) = match &self.kinetics {
            KineticsModel::Ideal(k) => grid
                .iter()
                .map(|&t| {
                    let th = 1.0 - (-t / t0).exp();
                    (th, 1.0 - k.beta(th))
                })
                .unzip(),
            KineticsModel::SoftSaturating(k) => {
                let t1 = self.pathway_timescale(k.beta1());
                let t2 = self.pathway_timescale(k.beta2());
                let f = k.f1() + k.f2();
                grid.iter()
                    .map(|&t| {
                        let th1 = 1.0 - (-t / t1).exp();
                        let th2 = 1.0 - (-t / t2).exp();
                        let th = (k.f1() * th1 + k.f2() * th2) / f;
                        (th, 1.0 - k.beta(th1, th2))
                    })
                    .unzip()
            }
        };

        Ok(DoseProfile {
            time: DVector::from_vec(grid),
            coverage: DVector::from_vec(coverage),
            unreacted: DVector::from_vec(unreacted),
        })
    }

    fn name(&self) -> &'static str {
        "zero-dimensional"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
