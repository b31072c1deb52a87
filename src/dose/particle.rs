//! Fluidized-bed particle coating dose model
//!
//! Precursor crosses a fluidized particle bed in plug flow while the
//! agitated particles stay well mixed, which is the
//! [`nondim::PlugFlowMixed`] picture. The bed's enormous surface area
//! makes the Damköhler number large in practice: almost all precursor is
//! consumed until the bed saturates, and the dose time is set by supply
//! rather than kinetics.

use super::{CURVE_POINTS, CURVE_SPAN, DoseModel, ReactorConditions};
use crate::chem::{IdealKinetics, KineticsModel};
use crate::error::Result;
use crate::nondim::{self, CoverageModel, DoseProfile, SaturationCurve};

/// Dose model for fluidized-bed particle coating
///
/// Requires single-pathway kinetics; passing two-pathway chemistry is a
/// configuration error at construction. Shares the Damköhler and
/// timescale derivation with [`super::WellStirredReactor`]; only the
/// transport picture behind the coverage dynamics differs.
#[derive(Debug, Clone)]
pub struct ParticlePlugFlow {
    kinetics: IdealKinetics,
    conditions: ReactorConditions,
    base: nondim::PlugFlowMixed,
    t0: f64,
}

impl ParticlePlugFlow {
    /// Create the model and derive its Damköhler number and timescale.
    ///
    /// # Errors
    ///
    /// [`crate::AldError::Configuration`] for two-pathway kinetics,
    /// [`crate::AldError::Domain`] for invalid conditions.
    pub fn new(kinetics: KineticsModel, conditions: ReactorConditions) -> Result<Self> {
        let kinetics = kinetics.as_ideal()?.clone();
        conditions.validate()?;
        let da = conditions.damkohler(&kinetics)?;
        let t0 = conditions.timescale(&kinetics)?;
        Ok(Self {
            kinetics,
            conditions,
            base: nondim::PlugFlowMixed::new(da)?,
            t0,
        })
    }

    /// Current Damköhler number.
    pub fn damkohler(&self) -> f64 {
        self.base.damkohler()
    }

    /// Reactor conditions.
    pub fn conditions(&self) -> &ReactorConditions {
        &self.conditions
    }

    /// Replace the reactor conditions and re-derive Da and t₀.
    pub fn set_conditions(&mut self, conditions: ReactorConditions) -> Result<()> {
        conditions.validate()?;
        self.conditions = conditions;
        self.refresh()
    }

    /// The bound chemistry.
    pub fn kinetics(&self) -> &IdealKinetics {
        &self.kinetics
    }

    /// Mutable access to the chemistry. Call [`DoseModel::refresh`]
    /// afterwards; Da and t₀ are not re-derived automatically.
    pub fn kinetics_mut(&mut self) -> &mut IdealKinetics {
        &mut self.kinetics
    }
}

impl DoseModel for ParticlePlugFlow {
    fn timescale(&self) -> f64 {
        self.t0
    }

    fn refresh(&mut self) -> Result<()> {
        let da = self.conditions.damkohler(&self.kinetics)?;
        self.base.set_damkohler(da)?;
        self.t0 = self.conditions.timescale(&self.kinetics)?;
        Ok(())
    }

    fn saturation_curve(&self) -> Result<SaturationCurve> {
        let curve = self
            .base
            .saturation_curve(CURVE_SPAN, CURVE_SPAN / CURVE_POINTS as f64)?;
        Ok(SaturationCurve {
            time: curve.time * self.t0,
            coverage: curve.coverage,
        })
    }

    fn run(&self) -> Result<DoseProfile> {
        let profile = self.base.run(CURVE_SPAN, CURVE_SPAN / CURVE_POINTS as f64)?;
        Ok(DoseProfile {
            time: profile.time * self.t0,
            coverage: profile.coverage,
            unreacted: profile.unreacted,
        })
    }

    fn name(&self) -> &'static str {
        "fluidized-bed plug-flow"
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::{Precursor, SoftSaturating};
    use crate::error::AldError;
    use approx::assert_relative_eq;

    fn conditions() -> ReactorConditions {
        // Fluidized-bed scale: tens of m² of particle area per batch.
        ReactorConditions {
            pressure: 13.0,
            base_pressure: 100.0,
            temperature: 500.0,
            surface_area: 10.0,
            flow_sccm: 60.0,
        }
    }

    fn model() -> ParticlePlugFlow {
        let prec = Precursor::new("X", 150.0).unwrap();
        let kin = IdealKinetics::new(prec, 1e19, 1e-3).unwrap();
        ParticlePlugFlow::new(kin.into(), conditions()).unwrap()
    }

    #[test]
    fn test_rejects_two_pathway_kinetics() {
        let prec = Precursor::new("X", 150.0).unwrap();
        let soft = SoftSaturating::new(prec, 1e19, 1e-2, 1e-3, 0.8).unwrap();
        assert!(matches!(
            ParticlePlugFlow::new(soft.into(), conditions()),
            Err(AldError::Configuration(_))
        ));
    }

    #[test]
    fn test_same_derivation_as_well_stirred() {
        // The two flow models share Da and t0; they differ only in the
        // coverage dynamics.
        let prec = Precursor::new("X", 150.0).unwrap();
        let kin = IdealKinetics::new(prec, 1e19, 1e-3).unwrap();
        let pf = ParticlePlugFlow::new(kin.clone().into(), conditions()).unwrap();
        let ws = super::super::WellStirredReactor::new(kin.into(), conditions()).unwrap();
        assert_relative_eq!(pf.damkohler(), ws.damkohler(), max_relative = 1e-12);
        assert_relative_eq!(pf.timescale(), ws.timescale(), max_relative = 1e-12);
    }

    #[test]
    fn test_supply_limited_curve_at_high_da() {
        // High Da: coverage climbs linearly with delivered precursor,
        // then saturates sharply near t = t0.
        let m = model();
        assert!(m.damkohler() > 50.0, "Da = {}", m.damkohler());
        let curve = m.saturation_curve().unwrap();
        assert_eq!(curve.len(), 500);
        let t0 = m.timescale();
        // Halfway through the first monolayer worth of supply.
        let i = curve
            .time
            .iter()
            .position(|&t| t >= 0.5 * t0)
            .unwrap();
        assert_relative_eq!(curve.coverage[i], 0.5, max_relative = 0.05);
        assert!(curve.final_coverage().unwrap() > 0.99);
    }

    #[test]
    fn test_bed_consumes_precursor_before_breakthrough() {
        let m = model();
        let profile = m.run().unwrap();
        // Early dose: the bed swallows nearly all precursor.
        assert!(profile.unreacted[10] < 0.05);
        // After saturation it passes through.
        assert!(profile.unreacted[499] > 0.9);
    }
}
