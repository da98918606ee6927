//! Ratio and percent-string helpers shared by the report builders

/// `numerator / denominator`, or `None` when the denominator is zero
///
/// Never returns NaN or infinity for finite inputs.
pub fn safe_ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 || !denominator.is_finite() || !numerator.is_finite() {
        return None;
    }
    Some(numerator / denominator)
}

/// Percentage of `part` in `whole` (0..=100 scale), `None` for an empty whole
pub fn percent_of(part: f64, whole: f64) -> Option<f64> {
    safe_ratio(part, whole).map(|r| r * 100.0)
}

/// Two-decimal percent string with a literal `%` suffix: `60.53%`
pub fn percent_string(percent: f64) -> String {
    format!("{:.2}%", percent)
}
