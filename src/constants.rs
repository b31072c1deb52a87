//! Fundamental physical constants
//!
//! All values in SI units. These are process-wide, immutable inputs to the
//! kinetics and dose models; nothing in the crate ever overrides them.

/// Boltzmann constant (J/K)
pub const KB: f64 = 1.380649e-23;

/// Atomic mass unit (kg)
pub const AMU: f64 = 1.66053906e-27;

/// Avogadro's number (1/mol)
pub const NAV: f64 = 6.02214076e23;

/// Ideal gas constant (J/(mol K))
pub const RGAS: f64 = KB * NAV;
