//! Polynomial mean curves.
//!
//! A coefficient slice `[b0, b1, ..., bk]` describes `b0 + b1*t + ... + bk*t^k`.
//! Powers go through `f64::powi` so repeated evaluations are bit-identical.

/// Evaluate the polynomial at `t`. An empty slice evaluates to zero.
pub fn polyval(coeffs: &[f64], t: f64) -> f64 {
    let Some((&intercept, rest)) = coeffs.split_first() else {
        return 0.0;
    };
    rest.iter()
        .zip(1i32..)
        .fold(intercept, |acc, (b, power)| acc + b * t.powi(power))
}

/// Evaluate the polynomial at every point of `times`.
pub fn polyval_grid(coeffs: &[f64], times: &[f64]) -> Vec<f64> {
    times.iter().map(|&t| polyval(coeffs, t)).collect()
}
