//! Numerically stable primitives for log-domain mixture math.

/// Largest argument for which `exp` stays finite in f64.
pub const EXP_OVERFLOW_THRESHOLD: f64 = 709.782_712_893_384;

/// Below this argument `exp` underflows to zero in f64.
pub const EXP_UNDERFLOW_THRESHOLD: f64 = -745.133_219_101_941_1;

/// Stable log(sum(exp(values))).
///
/// Returns NEG_INFINITY for empty input or all -inf inputs.
pub fn log_sum_exp(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NEG_INFINITY;
    }
    if values.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    if max == f64::INFINITY {
        return f64::INFINITY;
    }
    let mut sum = 0.0;
    for v in values {
        sum += (*v - max).exp();
    }
    max + sum.ln()
}

/// Normalize unnormalized log weights so that `exp` of the output sums to one.
///
/// Propagates NaN when the normalizer is not finite (all -inf, any +inf, any NaN).
pub fn normalize_log_probs(values: &[f64]) -> Vec<f64> {
    let lse = log_sum_exp(values);
    if !lse.is_finite() {
        return vec![f64::NAN; values.len()];
    }
    values.iter().map(|v| v - lse).collect()
}

/// Softmax with max-subtraction.
///
/// A single finite score maps to exactly `[1.0]`.
pub fn softmax(scores: &[f64]) -> Vec<f64> {
    normalize_log_probs(scores)
        .into_iter()
        .map(f64::exp)
        .collect()
}

/// Whether exponentiating `values` directly and summing would leave f64 range.
///
/// True when the largest finite value overflows `exp`, or when every value
/// underflows so the raw sum would be zero.
pub fn raw_exp_sum_unstable(values: &[f64]) -> bool {
    let max = values
        .iter()
        .cloned()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return false;
    }
    max > EXP_OVERFLOW_THRESHOLD || max < EXP_UNDERFLOW_THRESHOLD
}

/// Dot product of two equal-length slices. Returns None on length mismatch.
pub fn dot(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }
    Some(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    #[test]
    fn log_sum_exp_basic() {
        let v = [0.0, 0.0];
        let out = log_sum_exp(&v);
        assert!(approx_eq(out, 2.0f64.ln(), 1e-12));
    }

    #[test]
    fn log_sum_exp_dominance() {
        let v = [-1000.0, 0.0];
        let out = log_sum_exp(&v);
        assert!(approx_eq(out, 0.0, 1e-12));
    }

    #[test]
    fn log_sum_exp_all_neg_inf() {
        let v = [f64::NEG_INFINITY, f64::NEG_INFINITY];
        let out = log_sum_exp(&v);
        assert!(out.is_infinite() && out.is_sign_negative());
    }

    #[test]
    fn log_sum_exp_nan_propagates() {
        let out = log_sum_exp(&[0.0, f64::NAN]);
        assert!(out.is_nan());
    }

    #[test]
    fn normalize_log_probs_sums_to_one() {
        let out = normalize_log_probs(&[-3.0, 1.5, 0.25]);
        let sum: f64 = out.iter().map(|v| v.exp()).sum();
        assert!(approx_eq(sum, 1.0, 1e-12));
    }

    #[test]
    fn normalize_log_probs_keeps_neg_inf_entries() {
        let out = normalize_log_probs(&[f64::NEG_INFINITY, 0.0]);
        assert_eq!(out[0], f64::NEG_INFINITY);
        assert_eq!(out[1], 0.0);
    }

    #[test]
    fn normalize_log_probs_all_neg_inf_is_nan() {
        let out = normalize_log_probs(&[f64::NEG_INFINITY, f64::NEG_INFINITY]);
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn softmax_single_score_is_exactly_one() {
        assert_eq!(softmax(&[42.0]), vec![1.0]);
        assert_eq!(softmax(&[-3.5]), vec![1.0]);
    }

    #[test]
    fn softmax_matches_closed_form() {
        let out = softmax(&[0.0, 1.0]);
        let e = 1.0f64.exp();
        assert!(approx_eq(out[0], 1.0 / (1.0 + e), 1e-15));
        assert!(approx_eq(out[1], e / (1.0 + e), 1e-15));
    }

    #[test]
    fn softmax_survives_huge_scores() {
        let out = softmax(&[1000.0, 1000.0]);
        assert!(approx_eq(out[0], 0.5, 1e-15));
        assert!(approx_eq(out[1], 0.5, 1e-15));
    }

    #[test]
    fn raw_exp_sum_flags_overflow_and_underflow() {
        assert!(raw_exp_sum_unstable(&[800.0, 0.0]));
        assert!(raw_exp_sum_unstable(&[-900.0, -1000.0]));
        assert!(!raw_exp_sum_unstable(&[-10.0, 10.0]));
        assert!(!raw_exp_sum_unstable(&[f64::NEG_INFINITY]));
    }

    #[test]
    fn dot_checks_lengths() {
        assert_eq!(dot(&[1.0, 2.0], &[3.0, 4.0]), Some(11.0));
        assert_eq!(dot(&[1.0], &[3.0, 4.0]), None);
        assert_eq!(dot(&[], &[]), Some(0.0));
    }
}
