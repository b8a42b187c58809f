/// True when `actual` is within `abs_tol` of `expected`, or within `rel_tol`
/// relative to `expected`. Any NaN fails the check.
pub fn check_error(expected: f64, actual: f64, rel_tol: f64, abs_tol: f64) -> bool {
    let abs_diff = (actual - expected).abs();
    if abs_diff.is_nan() {
        return false;
    }
    let rel_diff = if expected.abs() > f64::EPSILON {
        abs_diff / expected.abs()
    } else {
        f64::INFINITY
    };
    abs_diff <= abs_tol || rel_diff <= rel_tol
}
