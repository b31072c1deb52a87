//! Precursor molecules and their gas-phase properties

use crate::constants::{AMU, KB, RGAS};
use crate::error::{AldError, Result, ensure_positive};

/// Mean thermal velocity of a molecule (m/s)
///
/// `mass` in atomic mass units, `temperature` in K:
///
/// ```text
/// v_th = sqrt(8·kB·T / (π·amu·M))
/// ```
pub fn thermal_velocity(mass: f64, temperature: f64) -> f64 {
    (8.0 * KB * temperature / (std::f64::consts::PI * AMU * mass)).sqrt()
}

/// Molar masses of a few common precursors (amu).
const PRECURSOR_MASS: [(&str, f64); 2] = [("TMA", 144.17), ("H2O", 18.01)];

/// A precursor molecule
///
/// Immutable after construction. Exposes the two gas-kinetic quantities
/// the dose models need: mean thermal velocity and wall flux.
///
/// # Example
///
/// ```rust
/// use ald_rs::chem::Precursor;
///
/// let tma = Precursor::from_table("TMA").unwrap();
/// let v = tma.vth(473.15);
/// assert!(v > 200.0 && v < 400.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Precursor {
    name: String,
    mass: f64,
}

impl Precursor {
    /// Create a precursor from its name and molar mass (amu).
    ///
    /// # Errors
    ///
    /// [`AldError::Domain`] for a non-positive or non-finite mass.
    pub fn new(name: impl Into<String>, mass: f64) -> Result<Self> {
        let mass = ensure_positive("precursor mass", mass)?;
        Ok(Self {
            name: name.into(),
            mass,
        })
    }

    /// Look up a precursor in the built-in mass table.
    ///
    /// # Errors
    ///
    /// [`AldError::Configuration`] for an unknown name.
    pub fn from_table(name: &str) -> Result<Self> {
        PRECURSOR_MASS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(n, m)| Self {
                name: n.to_string(),
                mass: m,
            })
            .ok_or_else(|| {
                AldError::Configuration(format!("precursor '{name}' is not in the built-in table"))
            })
    }

    /// Precursor name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Molar mass (amu).
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Mean thermal velocity at temperature `t` (K), in m/s.
    pub fn vth(&self, t: f64) -> f64 {
        thermal_velocity(self.mass, t)
    }

    /// Flux per unit wall area at temperature `t` (K) and pressure `p`
    /// (Pa), in molecules/(m² s).
    pub fn wall_flux(&self, t: f64, p: f64) -> f64 {
        0.25 * self.vth(t) * p / (KB * t)
    }

    /// Wall flux in mol/(m² s).
    pub fn wall_flux_mol(&self, t: f64, p: f64) -> f64 {
        0.25 * self.vth(t) * p / (RGAS * t)
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::constants::NAV;

    #[test]
    fn test_custom_precursor() {
        let p = Precursor::new("TDMAT", 224.2).unwrap();
        assert_eq!(p.name(), "TDMAT");
        assert_eq!(p.mass(), 224.2);
    }

    #[test]
    fn test_table_lookup() {
        let water = Precursor::from_table("H2O").unwrap();
        assert_relative_eq!(water.mass(), 18.01);

        assert!(matches!(
            Precursor::from_table("XeF2"),
            Err(AldError::Configuration(_))
        ));
    }

    #[test]
    fn test_nonpositive_mass_rejected() {
        assert!(Precursor::new("bad", 0.0).is_err());
        assert!(Precursor::new("bad", -1.0).is_err());
    }

    #[test]
    fn test_thermal_velocity_water_room_temperature() {
        // v_th of water vapor at 300 K is about 594 m/s.
        let water = Precursor::from_table("H2O").unwrap();
        assert_relative_eq!(water.vth(300.0), 593.9, max_relative = 1e-3);
    }

    #[test]
    fn test_thermal_velocity_scales_with_sqrt_t() {
        let p = Precursor::new("X", 100.0).unwrap();
        assert_relative_eq!(p.vth(400.0) / p.vth(100.0), 2.0, max_relative = 1e-12);
    }

    #[test]
    fn test_wall_flux_consistency() {
        // Molecule and mol fluxes differ by exactly Avogadro's number.
        let p = Precursor::from_table("TMA").unwrap();
        let (t, pr) = (473.15, 26.0);
        assert_relative_eq!(
            p.wall_flux(t, pr) / p.wall_flux_mol(t, pr),
            NAV,
            max_relative = 1e-12
        );
    }
}
