//! Crate-wide error taxonomy
//!
//! Four failure classes cover everything the engine can report:
//!
//! - [`AldError::Domain`]: an input is outside its physical range
//!   (negative Damkohler number, coverage of 1 requested where the rate
//!   law divides by the unreacted fraction, non-positive mass or flow).
//! - [`AldError::Convergence`]: a solver exhausted its iteration or step
//!   budget without meeting tolerance. The engine never trades accuracy
//!   for an answer: when this is returned, no partial result exists.
//! - [`AldError::Configuration`]: an incompatible model/kinetics pairing,
//!   e.g. two-pathway kinetics handed to an ideal-only dose model.
//! - [`AldError::Io`]: a filesystem failure while exporting results.
//!
//! Errors propagate to the immediate caller; there are no retries inside
//! this crate. A higher orchestration layer may shrink `dt`, tighten the
//! damping, and resubmit.

use thiserror::Error;

/// Errors produced by the kinetics and dose models.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AldError {
    /// A parameter is outside its physically meaningful range.
    #[error("domain error: {quantity} = {value} must be {requirement}")]
    Domain {
        /// Name of the offending quantity
        quantity: &'static str,
        /// Value that was rejected
        value: f64,
        /// Human-readable constraint, e.g. "positive" or "in [0, 1)"
        requirement: &'static str,
    },

    /// A solver exceeded its iteration/step budget without converging.
    #[error("convergence failure in {solver}: {detail}")]
    Convergence {
        /// Which solver gave up
        solver: &'static str,
        /// Diagnostic detail (budget, last error estimate, ...)
        detail: String,
    },

    /// Incompatible model/kinetics pairing.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Filesystem failure during export. Stored as a message so the
    /// error type stays cloneable and comparable.
    #[error("i/o error: {0}")]
    Io(String),
}

impl From<std::io::Error> for AldError {
    fn from(err: std::io::Error) -> Self {
        AldError::Io(err.to_string())
    }
}

impl AldError {
    /// Shorthand for a [`AldError::Domain`] value.
    pub fn domain(quantity: &'static str, value: f64, requirement: &'static str) -> Self {
        AldError::Domain {
            quantity,
            value,
            requirement,
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AldError>;

/// Validate that a quantity is strictly positive and finite.
///
/// Used at every construction boundary; solvers assume their inputs have
/// already passed through this.
pub(crate) fn ensure_positive(quantity: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(AldError::domain(quantity, value, "positive and finite"))
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_message() {
        let err = AldError::domain("Da", -1.0, "positive and finite");
        assert_eq!(
            err.to_string(),
            "domain error: Da = -1 must be positive and finite"
        );
    }

    #[test]
    fn test_ensure_positive_accepts() {
        assert_eq!(ensure_positive("mass", 18.01).unwrap(), 18.01);
    }

    #[test]
    fn test_ensure_positive_rejects() {
        assert!(ensure_positive("mass", 0.0).is_err());
        assert!(ensure_positive("mass", -3.0).is_err());
        assert!(ensure_positive("mass", f64::NAN).is_err());
        assert!(ensure_positive("mass", f64::INFINITY).is_err());
    }
}
