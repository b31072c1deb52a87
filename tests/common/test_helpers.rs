//! Helper functions for integration tests

use ald_rs::nondim::SaturationCurve;

/// Compute relative error: |actual - expected| / |expected|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-10 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}

/// Assert the physical invariants every saturation curve must satisfy:
/// coverage in [0, 1], non-decreasing in time, zero at t = 0.
pub fn assert_curve_physical(curve: &SaturationCurve, label: &str) {
    assert!(!curve.is_empty(), "{label}: empty curve");
    assert!(
        curve.coverage[0].abs() < 1e-9,
        "{label}: coverage at t=0 is {}",
        curve.coverage[0]
    );
    let mut prev = -1.0;
    for (i, &theta) in curve.coverage.iter().enumerate() {
        assert!(
            (0.0..=1.0).contains(&theta),
            "{label}: coverage[{i}] = {theta} out of [0, 1]"
        );
        assert!(
            theta >= prev - 1e-9,
            "{label}: coverage decreases at index {i} ({prev} -> {theta})"
        );
        prev = theta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_error() {
        assert!((relative_error(1.0, 1.0) - 0.0).abs() < 1e-10);
        assert!((relative_error(1.1, 1.0) - 0.1).abs() < 1e-10);
        assert!((relative_error(0.9, 1.0) - 0.1).abs() < 1e-10);
    }
}
