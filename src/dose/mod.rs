//! Dimensional dose models
//!
//! Where [`crate::nondim`] works in normalized variables, these models
//! speak the language of the lab: pressures in Pa, temperatures in K,
//! flows in sccm, times in seconds. Each one pairs a surface chemistry
//! ([`crate::chem`]) with reactor conditions, folds them into the
//! characteristic timescale t₀ and (for flow reactors) a Damköhler
//! number, and delegates the actual coverage dynamics to the matching
//! nondimensional model. Output time axes are rescaled by t₀ on the way
//! out.
//!
//! Derived quantities (Da, t₀) are cached at construction. Mutating a
//! model's chemistry or conditions goes through setters that re-derive
//! the cache; direct kinetics edits via `kinetics_mut` require an
//! explicit [`DoseModel::refresh`] afterwards.

mod particle;
mod wellstirred;
mod zerod;

pub use particle::ParticlePlugFlow;
pub use wellstirred::WellStirredReactor;
pub use zerod::ZeroD;

use crate::chem::{IdealKinetics, SurfaceKinetics};
use crate::constants::KB;
use crate::error::{Result, ensure_positive};
use crate::nondim::{DoseProfile, SaturationCurve};
use crate::units::sccm_to_m3s;

/// Saturation curves span this many characteristic times.
pub const CURVE_SPAN: f64 = 5.0;

/// Points per saturation curve; the time step is
/// `CURVE_SPAN · t0 / CURVE_POINTS`.
pub const CURVE_POINTS: usize = 500;

/// A dose model: chemistry plus reactor conditions, reporting physical
/// dose times in seconds
pub trait DoseModel {
    /// Characteristic saturation timescale t₀ (s).
    fn timescale(&self) -> f64;

    /// Re-derive every cached quantity (Da, t₀) from the current
    /// chemistry and conditions.
    fn refresh(&mut self) -> Result<()>;

    /// Saturation curve over `[0, CURVE_SPAN·t0)` with physical time.
    fn saturation_curve(&self) -> Result<SaturationCurve>;

    /// Saturation curve plus unreacted precursor fraction.
    fn run(&self) -> Result<DoseProfile>;

    /// Model name, for display and logging.
    fn name(&self) -> &'static str;
}

// =================================================================================================
// Reactor conditions
// =================================================================================================

/// Operating conditions of a flow reactor
///
/// `pressure` is the precursor partial pressure (Pa), `base_pressure`
/// the total reactor pressure the mass-flow reading is expanded against
/// (Pa), `temperature` in K, `surface_area` the total area being coated
/// (m²), `flow_sccm` the precursor carrier flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactorConditions {
    /// Precursor partial pressure (Pa)
    pub pressure: f64,
    /// Total reactor pressure (Pa)
    pub base_pressure: f64,
    /// Process temperature (K)
    pub temperature: f64,
    /// Total surface area to coat (m²)
    pub surface_area: f64,
    /// Carrier flow (sccm)
    pub flow_sccm: f64,
}

impl ReactorConditions {
    /// Check every field is positive and finite.
    pub(crate) fn validate(&self) -> Result<()> {
        ensure_positive("pressure", self.pressure)?;
        ensure_positive("base_pressure", self.base_pressure)?;
        ensure_positive("temperature", self.temperature)?;
        ensure_positive("surface_area", self.surface_area)?;
        ensure_positive("flow_sccm", self.flow_sccm)?;
        Ok(())
    }

    /// Volumetric flow at reactor conditions (m³/s).
    pub fn flow(&self) -> Result<f64> {
        sccm_to_m3s(self.flow_sccm, self.base_pressure, self.temperature)
    }

    /// Damköhler number of the reactor for the given chemistry: the
    /// ratio of the surface reaction sink to the convective supply,
    ///
    /// ```text
    /// Da = (S / Q) · β(0) · v_th / 4
    /// ```
    pub(crate) fn damkohler(&self, kinetics: &IdealKinetics) -> Result<f64> {
        let flow = self.flow()?;
        Ok(0.25 * self.surface_area / flow * kinetics.beta(0.0) * kinetics.vth(self.temperature))
    }

    /// Characteristic dose timescale: the time for the flow to deliver
    /// one monolayer worth of precursor to the surface,
    ///
    /// ```text
    /// t0 = kB·T·S / (Q·s0·p)
    /// ```
    pub(crate) fn timescale(&self, kinetics: &IdealKinetics) -> Result<f64> {
        let flow = self.flow()?;
        Ok(KB * self.temperature * self.surface_area
            / (flow * kinetics.site_area() * self.pressure))
    }
}

// =================================================================================================
// Tests
// =================================================================================================
