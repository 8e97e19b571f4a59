//! Scalar regression metrics over paired target/prediction slices.

/// Mean absolute error.
///
/// # Panics
/// Panics if the slices differ in length or are empty.
pub fn mae(targets: &[f32], predictions: &[f32]) -> f64 {
    assert_eq!(targets.len(), predictions.len(), "length mismatch");
    assert!(!targets.is_empty(), "empty metric input");
    let sum: f64 = targets
        .iter()
        .zip(predictions)
        .map(|(&t, &p)| (t as f64 - p as f64).abs())
        .sum();
    sum / targets.len() as f64
}

/// Root mean squared error.
///
/// # Panics
/// Panics if the slices differ in length or are empty.
pub fn rmse(targets: &[f32], predictions: &[f32]) -> f64 {
    assert_eq!(targets.len(), predictions.len(), "length mismatch");
    assert!(!targets.is_empty(), "empty metric input");
    let sum: f64 = targets
        .iter()
        .zip(predictions)
        .map(|(&t, &p)| {
            let d = t as f64 - p as f64;
            d * d
        })
        .sum();
    (sum / targets.len() as f64).sqrt()
}

/// Mean and population standard deviation of per-fold scores.
///
/// Returns `(0.0, 0.0)` for empty input.
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_mae_rmse() {
        let targets = [1.0_f32, 2.0, 3.0];
        let predictions = [1.0_f32, 2.0, 5.0];
        assert!((mae(&targets, &predictions) - 0.667).abs() < 1e-3);
        assert!((rmse(&targets, &predictions) - 1.155).abs() < 1e-3);
    }

    #[test]
    fn test_perfect_predictions() {
        let targets = [0.5_f32, -1.5, 2.25];
        assert_eq!(mae(&targets, &targets), 0.0);
        assert_eq!(rmse(&targets, &targets), 0.0);
    }

    #[test]
    fn test_rmse_at_least_mae() {
        let targets = [0.0_f32, 0.0, 0.0, 0.0];
        let predictions = [1.0_f32, -3.0, 0.5, 2.0];
        assert!(rmse(&targets, &predictions) >= mae(&targets, &predictions));
    }

    #[test]
    fn test_mean_std() {
        let (mean, std) = mean_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((mean - 5.0).abs() < 1e-12);
        assert!((std - 2.0).abs() < 1e-12);

        assert_eq!(mean_std(&[]), (0.0, 0.0));
    }

    #[test]
    #[should_panic(expected = "length mismatch")]
    fn test_length_mismatch_panics() {
        mae(&[1.0], &[1.0, 2.0]);
    }
}
