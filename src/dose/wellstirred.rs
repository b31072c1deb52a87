//! Well-stirred reactor dose model
//!
//! A viscous-flow reactor with good recirculation: the precursor partial
//! pressure is uniform over the coated area, and the exhaust carries
//! whatever the surface does not consume. The reactor conditions
//! collapse into a Damköhler number and a timescale t₀, and the coverage
//! dynamics delegate to [`nondim::WellStirred`] with the time axis
//! rescaled by t₀.

use super::{CURVE_POINTS, CURVE_SPAN, DoseModel, ReactorConditions};
use crate::chem::{IdealKinetics, KineticsModel};
use crate::error::Result;
use crate::nondim::{self, CoverageModel, DoseProfile, SaturationCurve};

/// Dose model for a well-stirred flow reactor
///
/// Requires single-pathway kinetics; passing two-pathway chemistry is a
/// configuration error at construction.
///
/// # Example
///
/// ```rust
/// use ald_rs::chem::{IdealKinetics, Precursor};
/// use ald_rs::dose::{DoseModel, ReactorConditions, WellStirredReactor};
///
/// let prec = Precursor::new("TDMAT", 224.2).unwrap();
/// let kin = IdealKinetics::new(prec, 1e19, 1e-3).unwrap();
/// let model = WellStirredReactor::new(
///     kin.into(),
///     ReactorConditions {
///         pressure: 13.0,
///         base_pressure: 100.0,
///         temperature: 473.15,
///         surface_area: 0.5,
///         flow_sccm: 120.0,
///     },
/// )
/// .unwrap();
/// assert!(model.damkohler() > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct WellStirredReactor {
    kinetics: IdealKinetics,
    conditions: ReactorConditions,
    base: nondim::WellStirred,
    t0: f64,
}

impl WellStirredReactor {
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
            base: nondim::WellStirred::new(da)?,
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

impl DoseModel for WellStirredReactor {
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
        "well-stirred reactor"
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::{Precursor, SoftSaturating, SurfaceKinetics};
    use crate::error::AldError;
    use approx::assert_relative_eq;

    fn conditions() -> ReactorConditions {
        ReactorConditions {
            pressure: 13.0,
            base_pressure: 100.0,
            temperature: 500.0,
            surface_area: 10.0,
            flow_sccm: 60.0,
        }
    }

    fn model() -> WellStirredReactor {
        let prec = Precursor::new("X", 150.0).unwrap();
        let kin = IdealKinetics::new(prec, 1e19, 1e-3).unwrap();
        WellStirredReactor::new(kin.into(), conditions()).unwrap()
    }

    #[test]
    fn test_rejects_two_pathway_kinetics() {
        let prec = Precursor::new("X", 150.0).unwrap();
        let soft = SoftSaturating::new(prec, 1e19, 1e-2, 1e-3, 0.8).unwrap();
        assert!(matches!(
            WellStirredReactor::new(soft.into(), conditions()),
            Err(AldError::Configuration(_))
        ));
    }

    #[test]
    fn test_derived_quantities() {
        let m = model();
        let q = conditions().flow().unwrap();
        let vth = m.kinetics().vth(500.0);
        assert_relative_eq!(
            m.damkohler(),
            0.25 * 10.0 / q * 1e-3 * vth,
            max_relative = 1e-12
        );
        assert!(m.timescale() > 0.0);
    }

    #[test]
    fn test_curve_is_nondim_curve_rescaled() {
        let m = model();
        let dimensional = m.saturation_curve().unwrap();
        let normalized = nondim::WellStirred::new(m.damkohler())
            .unwrap()
            .saturation_curve(CURVE_SPAN, CURVE_SPAN / CURVE_POINTS as f64)
            .unwrap();
        assert_eq!(dimensional.len(), normalized.len());
        for i in (0..dimensional.len()).step_by(100) {
            assert_relative_eq!(
                dimensional.time[i],
                normalized.time[i] * m.timescale(),
                max_relative = 1e-12
            );
            assert_relative_eq!(
                dimensional.coverage[i],
                normalized.coverage[i],
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn test_refresh_tracks_kinetics_edit() {
        let mut m = model();
        let da_before = m.damkohler();
        // Halving the site density doubles the site area and halves t0,
        // but leaves Da (set by beta0 and flow) unchanged.
        let t0_before = m.timescale();
        m.kinetics_mut().set_nsites(5e18).unwrap();
        m.refresh().unwrap();
        assert_relative_eq!(m.damkohler(), da_before, max_relative = 1e-12);
        assert_relative_eq!(m.timescale(), 0.5 * t0_before, max_relative = 1e-12);
    }

    #[test]
    fn test_set_conditions_rederives() {
        let mut m = model();
        let da_before = m.damkohler();
        let mut c = conditions();
        c.surface_area *= 3.0;
        m.set_conditions(c).unwrap();
        assert_relative_eq!(m.damkohler(), 3.0 * da_before, max_relative = 1e-12);
    }
}
