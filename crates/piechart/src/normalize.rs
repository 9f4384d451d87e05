/// Converts raw slice values into fractions of the full circle.
///
/// Negative and non-finite values count as zero. When nothing is left to share
/// (empty input or a zero sum) every fraction is zero.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let sanitized: Vec<f64> = values.iter().map(|&v| sanitize(v)).collect();
    let total: f64 = sanitized.iter().sum();

    if total <= 0.0 || !total.is_finite() {
        return vec![0.0; sanitized.len()];
    }

    sanitized.iter().map(|v| v / total).collect()
}

pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_sums_to_one(fractions: &[f64]) {
        let sum: f64 = fractions.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12, "sum was {sum}");
    }

    #[test]
    fn test_normalize_proportions() {
        assert_eq!(normalize(&[1.0, 1.0, 2.0]), vec![0.25, 0.25, 0.5]);
        assert_eq!(normalize(&[0.0, 5.0, 0.0]), vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_normalize_sums_to_one() {
        let inputs: Vec<Vec<f64>> = vec![
            vec![3.0],
            vec![0.1, 0.2, 0.3],
            vec![1e-9, 1e9, 42.0],
            (1..=50).map(|i| i as f64 * 1.7).collect(),
        ];

        for values in inputs {
            assert_sums_to_one(&normalize(&values));
        }
    }

    #[test]
    fn test_normalize_degenerate_input() {
        assert!(normalize(&[]).is_empty());
        assert_eq!(normalize(&[0.0, 0.0]), vec![0.0, 0.0]);
        assert_eq!(normalize(&[-3.0, f64::NAN]), vec![0.0, 0.0]);
        assert!(normalize(&[0.0, 0.0]).iter().all(|f| !f.is_nan()));
    }

    #[test]
    fn test_normalize_ignores_invalid_values() {
        assert_eq!(
            normalize(&[-1.0, 2.0, f64::INFINITY, 2.0]),
            vec![0.0, 0.5, 0.0, 0.5]
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize(&[2.0, 3.0, 5.0]);
        let twice = normalize(&once);
        for (a, b) in once.iter().zip(&twice) {
            assert!((a - b).abs() < 1e-15);
        }
    }
}
