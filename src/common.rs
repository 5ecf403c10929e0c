pub mod points;

/// Returns true if `value` is within `tol` of zero.
pub fn near_zero(value: f64, tol: f64) -> bool {
    value.abs() <= tol
}
