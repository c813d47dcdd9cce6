//! Tolerance comparison
//!
//! Pure functions, no process execution involved, so the pass/fail math is
//! unit-testable on its own. Reference values for flow fields come from
//! analytic solutions; the additive floor keeps the relative bound meaningful
//! for quantities like velocity that legitimately approach zero.

/// Default relative tolerance for field comparisons
pub const DEFAULT_REL_TOL: f64 = 0.01;
/// Default additive floor in the relative-error denominator
pub const DEFAULT_FLOOR: f64 = 1.0;

/// Relative comparison with an additive floor:
/// `|observed - expected| / (|expected| + floor) < rel_tol`
pub fn within_relative(observed: f64, expected: f64, rel_tol: f64, floor: f64) -> bool {
    relative_error(observed, expected, floor) < rel_tol
}

/// The relative error term used by `within_relative`, exposed for diagnostics
pub fn relative_error(observed: f64, expected: f64, floor: f64) -> f64 {
    (observed - expected).abs() / (expected.abs() + floor)
}

/// Absolute comparison for integer-valued quantities such as step counts:
/// `|observed - expected| < max_delta`
pub fn within_absolute(observed: i64, expected: i64, max_delta: i64) -> bool {
    (observed - expected).abs() < max_delta
}
