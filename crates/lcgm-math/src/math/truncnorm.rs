//! Truncated (censored-support) normal density.
//!
//! The density of `N(mu, sigma^2)` restricted to `[lower, upper]`:
//!
//! `f(x) = phi((x - mu) / sigma) / (sigma * (Phi(beta) - Phi(alpha)))`
//!
//! with `alpha = (lower - mu) / sigma` and `beta = (upper - mu) / sigma`.
//! Either bound may be infinite.

use statrs::distribution::{Continuous, ContinuousCDF, Normal};

/// Past this standardized distance the normal tail comes from the Mills-ratio
/// expansion instead of `sf`, which underflows near 38.
const ASYMPTOTIC_TAIL_Z: f64 = 30.0;

/// Log density of the truncated normal at `x`.
///
/// Returns NEG_INFINITY outside `[lower, upper]` and NaN for invalid
/// parameters (non-positive sigma, inverted bounds).
pub fn truncated_normal_log_pdf(x: f64, mu: f64, sigma: f64, lower: f64, upper: f64) -> f64 {
    if x.is_nan() || mu.is_nan() || sigma.is_nan() || lower.is_nan() || upper.is_nan() {
        return f64::NAN;
    }
    if sigma <= 0.0 || !sigma.is_finite() || lower >= upper {
        return f64::NAN;
    }
    if x < lower || x > upper {
        return f64::NEG_INFINITY;
    }

    let standard = Normal::standard();
    let z = (x - mu) / sigma;
    let log_kernel = standard.ln_pdf(z) - sigma.ln();

    let log_mass = log_retained_mass(&standard, (lower - mu) / sigma, (upper - mu) / sigma);
    if log_mass.is_nan() {
        return f64::NAN;
    }
    log_kernel - log_mass
}

/// Truncated normal density at `x`.
#[cfg(test)]
pub(crate) fn truncated_normal_pdf(x: f64, mu: f64, sigma: f64, lower: f64, upper: f64) -> f64 {
    let log_pdf = truncated_normal_log_pdf(x, mu, sigma, lower, upper);
    if log_pdf.is_nan() {
        return f64::NAN;
    }
    if log_pdf == f64::NEG_INFINITY {
        return 0.0;
    }
    log_pdf.exp()
}

/// ln(Phi(beta) - Phi(alpha)) for standardized bounds.
///
/// An interval entirely on one side of the mean is computed from that side's
/// log tail, so the mass stays finite however far the support is from `mu`.
fn log_retained_mass(standard: &Normal, alpha: f64, beta: f64) -> f64 {
    if alpha == f64::NEG_INFINITY && beta == f64::INFINITY {
        return 0.0;
    }
    let log_mass = if alpha > 0.0 {
        let near = log_upper_tail(standard, alpha);
        near + ln_one_minus_exp(log_upper_tail(standard, beta) - near)
    } else if beta < 0.0 {
        let near = log_upper_tail(standard, -beta);
        near + ln_one_minus_exp(log_upper_tail(standard, -alpha) - near)
    } else {
        (standard.cdf(beta) - standard.cdf(alpha)).ln()
    };
    if log_mass.is_finite() {
        log_mass
    } else {
        f64::NAN
    }
}

/// ln(1 - Phi(z)).
fn log_upper_tail(standard: &Normal, z: f64) -> f64 {
    if z == f64::INFINITY {
        return f64::NEG_INFINITY;
    }
    if z < ASYMPTOTIC_TAIL_Z {
        return standard.sf(z).ln();
    }
    // 1 - Phi(z) ~ phi(z) / z * (1 - 1/z^2 + 3/z^4 - 15/z^6)
    let inv_z2 = (z * z).recip();
    let series = 1.0 - inv_z2 * (1.0 - 3.0 * inv_z2 * (1.0 - 5.0 * inv_z2));
    standard.ln_pdf(z) - z.ln() + series.ln()
}

/// ln(1 - exp(d)) for `d <= 0`.
fn ln_one_minus_exp(d: f64) -> f64 {
    if d > -std::f64::consts::LN_2 {
        (-d.exp_m1()).ln()
    } else {
        (-d.exp()).ln_1p()
    }
}
