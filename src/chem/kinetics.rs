//! Self-limited surface kinetics
//!
//! # Site bookkeeping
//!
//! Both rate laws assume a fraction `f` of the surface is reactive and
//! made of sites of equal area. Site density and site area are two views
//! of the same quantity:
//!
//! ```text
//! site_area · nsites = f
//! ```
//!
//! The canonical stored field is `site_area`; `nsites` is always derived
//! on read and recomputed through the canonical field on write. There is
//! no second field to fall out of sync.
//!
//! # Rate laws
//!
//! - [`IdealKinetics`]: first-order irreversible Langmuir law,
//!   `beta(θ) = f·beta0·(1−θ)`. At θ = 1 the probability is exactly zero.
//! - [`SoftSaturating`]: two independent pathways `(beta1, f1)` and
//!   `(beta2, f2)` with independent coverages; the aggregate probability
//!   is the fraction-weighted sum. Soft-saturating processes keep a slow
//!   residual uptake long after the fast pathway has closed.

use crate::constants::NAV;
use crate::error::{AldError, Result, ensure_positive};

use super::Precursor;

// =================================================================================================
// Surface Kinetics Capability
// =================================================================================================

/// Common capability of every surface-kinetics type: reactive-site
/// bookkeeping plus the gas-kinetic properties of the bound precursor.
pub trait SurfaceKinetics {
    /// The precursor this chemistry binds.
    fn precursor(&self) -> &Precursor;

    /// Fraction of the surface that is reactive.
    fn reactive_fraction(&self) -> f64;

    /// Area of a single reaction site (m²). Canonical stored quantity.
    fn site_area(&self) -> f64;

    /// Replace the site area.
    fn set_site_area(&mut self, value: f64) -> Result<()>;

    /// Number of reactive sites per unit surface area (1/m²).
    ///
    /// Always derived: `f / site_area`.
    fn nsites(&self) -> f64 {
        self.reactive_fraction() / self.site_area()
    }

    /// Replace the site density; recomputes the canonical site area.
    fn set_nsites(&mut self, value: f64) -> Result<()> {
        let value = ensure_positive("nsites", value)?;
        self.set_site_area(self.reactive_fraction() / value)
    }

    /// Site density in mol/m².
    fn nsites_mol(&self) -> f64 {
        self.nsites() / NAV
    }

    /// Mean thermal velocity of the precursor at `t` (K).
    fn vth(&self, t: f64) -> f64 {
        self.precursor().vth(t)
    }

    /// Precursor wall flux at `t` (K), `p` (Pa), molecules/(m² s).
    fn wall_flux(&self, t: f64, p: f64) -> f64 {
        self.precursor().wall_flux(t, p)
    }
}

// =================================================================================================
// Ideal (single-pathway) Kinetics
// =================================================================================================

/// First-order irreversible Langmuir kinetics
///
/// # Example
///
/// ```rust
/// use ald_rs::chem::{IdealKinetics, Precursor, SurfaceKinetics};
///
/// let tma = Precursor::from_table("TMA").unwrap();
/// let kin = IdealKinetics::new(tma, 1e19, 1e-3).unwrap();
/// assert_eq!(kin.beta(0.0), 1e-3);
/// assert_eq!(kin.beta(1.0), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IdealKinetics {
    precursor: Precursor,
    site_area: f64,
    fraction: f64,
    beta0: f64,
}

impl IdealKinetics {
    /// Create single-pathway kinetics with the whole surface reactive
    /// (`f = 1`).
    ///
    /// `nsites` in 1/m², `beta0` the intrinsic reaction probability.
    pub fn new(precursor: Precursor, nsites: f64, beta0: f64) -> Result<Self> {
        Self::with_fraction(precursor, nsites, beta0, 1.0)
    }

    /// Create single-pathway kinetics with a reactive fraction `f`.
    pub fn with_fraction(precursor: Precursor, nsites: f64, beta0: f64, f: f64) -> Result<Self> {
        let nsites = ensure_positive("nsites", nsites)?;
        let beta0 = validate_probability("beta0", beta0)?;
        let fraction = validate_fraction("f", f)?;
        Ok(Self {
            precursor,
            site_area: fraction / nsites,
            fraction,
            beta0,
        })
    }

    /// Intrinsic (zero-coverage, full-fraction) reaction probability.
    pub fn beta0(&self) -> f64 {
        self.beta0
    }

    /// Reaction probability at coverage `cov`:
    /// `beta = f·beta0·(1−cov)`. Exactly zero at full coverage.
    pub fn beta(&self, cov: f64) -> f64 {
        self.fraction * self.beta0 * (1.0 - cov)
    }

    /// Reaction probability for a batch-averaged unreacted-site fraction
    /// `av` (ensemble/particle formulations).
    pub fn beta_av(&self, av: f64) -> f64 {
        self.fraction * self.beta0 * av
    }
}

impl SurfaceKinetics for IdealKinetics {
    fn precursor(&self) -> &Precursor {
        &self.precursor
    }

    fn reactive_fraction(&self) -> f64 {
        self.fraction
    }

    fn site_area(&self) -> f64 {
        self.site_area
    }

    fn set_site_area(&mut self, value: f64) -> Result<()> {
        self.site_area = ensure_positive("site_area", value)?;
        Ok(())
    }
}

// =================================================================================================
// Soft-saturating (two-pathway) Kinetics
// =================================================================================================

/// Two-pathway first-order irreversible Langmuir kinetics
///
/// Pathways react independently, each with its own intrinsic probability
/// and site fraction; their coverages evolve separately.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftSaturating {
    precursor: Precursor,
    site_area: f64,
    beta1: f64,
    beta2: f64,
    f1: f64,
    f2: f64,
}

impl SoftSaturating {
    /// Create two-pathway kinetics; the second fraction defaults to
    /// `1 − f1`.
    pub fn new(precursor: Precursor, nsites: f64, beta1: f64, beta2: f64, f1: f64) -> Result<Self> {
        let f2 = 1.0 - f1;
        Self::with_fractions(precursor, nsites, beta1, beta2, f1, f2)
    }

    /// Create two-pathway kinetics with both fractions explicit.
    pub fn with_fractions(
        precursor: Precursor,
        nsites: f64,
        beta1: f64,
        beta2: f64,
        f1: f64,
        f2: f64,
    ) -> Result<Self> {
        let nsites = ensure_positive("nsites", nsites)?;
        let beta1 = validate_probability("beta1", beta1)?;
        let beta2 = validate_probability("beta2", beta2)?;
        let f1 = validate_fraction("f1", f1)?;
        let f2 = validate_fraction("f2", f2)?;
        if f1 + f2 > 1.0 + 1e-12 {
            return Err(AldError::domain("f1 + f2", f1 + f2, "at most 1"));
        }
        let fraction = f1 + f2;
        Ok(Self {
            precursor,
            site_area: fraction / nsites,
            beta1,
            beta2,
            f1,
            f2,
        })
    }

    /// Intrinsic probability of the first (fast) pathway.
    pub fn beta1(&self) -> f64 {
        self.beta1
    }

    /// Intrinsic probability of the second (slow) pathway.
    pub fn beta2(&self) -> f64 {
        self.beta2
    }

    /// Site fraction of the first pathway.
    pub fn f1(&self) -> f64 {
        self.f1
    }

    /// Site fraction of the second pathway.
    pub fn f2(&self) -> f64 {
        self.f2
    }

    /// Aggregate reaction probability at pathway coverages
    /// `(cov1, cov2)`: the fraction-weighted sum of both pathways.
    pub fn beta(&self, cov1: f64, cov2: f64) -> f64 {
        self.f1 * self.beta1 * (1.0 - cov1) + self.f2 * self.beta2 * (1.0 - cov2)
    }

    /// Aggregate probability for batch-averaged unreacted fractions.
    pub fn beta_av(&self, av1: f64, av2: f64) -> f64 {
        self.f1 * self.beta1 * av1 + self.f2 * self.beta2 * av2
    }
}

impl SurfaceKinetics for SoftSaturating {
    fn precursor(&self) -> &Precursor {
        &self.precursor
    }

    fn reactive_fraction(&self) -> f64 {
        self.f1 + self.f2
    }

    fn site_area(&self) -> f64 {
        self.site_area
    }

    fn set_site_area(&mut self, value: f64) -> Result<()> {
        self.site_area = ensure_positive("site_area", value)?;
        Ok(())
    }
}

// =================================================================================================
// Tagged variant for arity dispatch
// =================================================================================================

/// Kinetics with a discriminated pathway count
///
/// Dose models take this enum and dispatch on arity; models that only
/// support one arity use [`KineticsModel::as_ideal`] /
/// [`KineticsModel::as_soft`], which turn a mismatch into a
/// [`AldError::Configuration`] instead of a panic.
#[derive(Debug, Clone, PartialEq)]
pub enum KineticsModel {
    /// Single-pathway Langmuir kinetics
    Ideal(IdealKinetics),
    /// Two-pathway soft-saturating kinetics
    SoftSaturating(SoftSaturating),
}

impl KineticsModel {
    /// Number of reaction pathways (1 or 2).
    pub fn pathways(&self) -> usize {
        match self {
            KineticsModel::Ideal(_) => 1,
            KineticsModel::SoftSaturating(_) => 2,
        }
    }

    /// Borrow the single-pathway kinetics, or fail on arity mismatch.
    pub fn as_ideal(&self) -> Result<&IdealKinetics> {
        match self {
            KineticsModel::Ideal(k) => Ok(k),
            KineticsModel::SoftSaturating(_) => Err(AldError::Configuration(
                "this model requires single-pathway (ideal) kinetics, got two-pathway".into(),
            )),
        }
    }

    /// Borrow the two-pathway kinetics, or fail on arity mismatch.
    pub fn as_soft(&self) -> Result<&SoftSaturating> {
        match self {
            KineticsModel::SoftSaturating(k) => Ok(k),
            KineticsModel::Ideal(_) => Err(AldError::Configuration(
                "this model requires two-pathway (soft-saturating) kinetics, got single-pathway"
                    .into(),
            )),
        }
    }

    /// Area of a single reaction site (m²).
    pub fn site_area(&self) -> f64 {
        match self {
            KineticsModel::Ideal(k) => k.site_area(),
            KineticsModel::SoftSaturating(k) => k.site_area(),
        }
    }

    /// The bound precursor.
    pub fn precursor(&self) -> &Precursor {
        match self {
            KineticsModel::Ideal(k) => k.precursor(),
            KineticsModel::SoftSaturating(k) => k.precursor(),
        }
    }
}

impl From<IdealKinetics> for KineticsModel {
    fn from(k: IdealKinetics) -> Self {
        KineticsModel::Ideal(k)
    }
}

impl From<SoftSaturating> for KineticsModel {
    fn from(k: SoftSaturating) -> Self {
        KineticsModel::SoftSaturating(k)
    }
}

// =================================================================================================
// Validation helpers
// =================================================================================================

fn validate_probability(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(AldError::domain(name, value, "in (0, 1]"))
    }
}

fn validate_fraction(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(AldError::domain(name, value, "in [0, 1]"))
    }
}

// =================================================================================================
// Tests
// =================================================================================================
