//! Text formatting for floating point values in model and output files.

/// Format `value` so that it parses back to the identical `f64`.
///
/// Values of moderate magnitude are written in plain decimal; very small or
/// very large ones use exponent notation instead of long runs of zeros.
pub fn format_float(value: f64) -> String {
    let magnitude = value.abs();
    if value == 0.0 || !value.is_finite() || (1e-4..1e16).contains(&magnitude) {
        format!("{value}")
    } else {
        format!("{value:e}")
    }
}
