//! Per-channel standardization with train-partition statistics.
//!
//! Statistics are always computed on the training partition only and then
//! applied to held-out data, so test-set statistics never leak into the
//! transform.

use dosdata::DosTensor;

/// Channel-wise standard scaler over `(samples * bins, channels)`.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Vec<f64>,
    std: Vec<f64>,
}

impl StandardScaler {
    /// Compute per-channel mean and population standard deviation.
    pub fn fit(x: &DosTensor) -> Self {
        let channels = x.channels();
        let rows = (x.samples() * x.bins()) as f64;
        let mut sum = vec![0.0_f64; channels];
        let mut sum_sq = vec![0.0_f64; channels];

        for (i, &v) in x.as_slice().iter().enumerate() {
            let c = i % channels;
            let v = v as f64;
            sum[c] += v;
            sum_sq[c] += v * v;
        }

        let mean: Vec<f64> = sum.iter().map(|s| s / rows).collect();
        let std: Vec<f64> = sum_sq
            .iter()
            .zip(&mean)
            .map(|(&sq, &m)| {
                let var = (sq / rows - m * m).max(0.0);
                let std = var.sqrt();
                // Constant channels pass through unscaled.
                if std == 0.0 {
                    1.0
                } else {
                    std
                }
            })
            .collect();

        Self { mean, std }
    }

    /// Standardize in place using the fitted statistics.
    ///
    /// # Panics
    /// Panics if the channel count differs from the fitted tensor.
    pub fn transform(&self, x: &mut DosTensor) {
        assert_eq!(x.channels(), self.mean.len(), "channel count mismatch");
        let channels = x.channels();
        for s in 0..x.samples() {
            for b in 0..x.bins() {
                for c in 0..channels {
                    let v = (x.get(s, b, c) as f64 - self.mean[c]) / self.std[c];
                    x.set(s, b, c, v as f32);
                }
            }
        }
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn std(&self) -> &[f64] {
        &self.std
    }
}

/// Select and standardize a train/test partition.
///
/// The scaler is fitted on the training rows only; both partitions are
/// transformed with those statistics.
pub fn standardize_split(
    x: &DosTensor,
    train_idx: &[usize],
    test_idx: &[usize],
) -> (DosTensor, DosTensor) {
    let mut train = x.select_samples(train_idx);
    let mut test = x.select_samples(test_idx);
    let scaler = StandardScaler::fit(&train);
    scaler.transform(&mut train);
    scaler.transform(&mut test);
    (train, test)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel_mean_std(x: &DosTensor, c: usize) -> (f64, f64) {
        let mut vals = Vec::new();
        for s in 0..x.samples() {
            for b in 0..x.bins() {
                vals.push(x.get(s, b, c) as f64);
            }
        }
        let n = vals.len() as f64;
        let mean = vals.iter().sum::<f64>() / n;
        let var = vals.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        (mean, var.sqrt())
    }

    fn ramp_tensor(samples: usize, bins: usize, channels: usize, offset: f32) -> DosTensor {
        let mut t = DosTensor::zeros(samples, bins, channels);
        for s in 0..samples {
            for b in 0..bins {
                for c in 0..channels {
                    t.set(s, b, c, offset + (s * bins + b) as f32 * (c + 1) as f32);
                }
            }
        }
        t
    }

    #[test]
    fn test_fit_transform_standardizes_train() {
        let mut x = ramp_tensor(4, 10, 3, 0.0);
        let scaler = StandardScaler::fit(&x);
        scaler.transform(&mut x);

        for c in 0..3 {
            let (mean, std) = channel_mean_std(&x, c);
            assert!(mean.abs() < 1e-5, "channel {c} mean {mean}");
            assert!((std - 1.0).abs() < 1e-4, "channel {c} std {std}");
        }
    }

    #[test]
    fn test_test_statistics_do_not_leak() {
        // Train and test have very different distributions; the test partition
        // must be transformed with TRAIN statistics, so its transformed mean
        // is far from zero.
        let full = {
            let mut t = DosTensor::zeros(8, 5, 2);
            for s in 0..8 {
                for b in 0..5 {
                    for c in 0..2 {
                        let v = if s < 4 { 1.0 } else { 100.0 };
                        t.set(s, b, c, v + (b as f32) * 0.1);
                    }
                }
            }
            t
        };
        let (train, test) = standardize_split(&full, &[0, 1, 2, 3], &[4, 5, 6, 7]);

        let (train_mean, train_std) = channel_mean_std(&train, 0);
        assert!(train_mean.abs() < 1e-5);
        assert!((train_std - 1.0).abs() < 1e-3);

        let (test_mean, _) = channel_mean_std(&test, 0);
        assert!(
            test_mean > 10.0,
            "test partition standardized by its own stats? mean = {test_mean}"
        );
    }

    #[test]
    fn test_constant_channel_passthrough() {
        let mut x = DosTensor::zeros(2, 4, 2);
        for s in 0..2 {
            for b in 0..4 {
                x.set(s, b, 0, 5.0); // constant
                x.set(s, b, 1, (s * 4 + b) as f32);
            }
        }
        let scaler = StandardScaler::fit(&x);
        assert_eq!(scaler.std()[0], 1.0);
        scaler.transform(&mut x);
        // Constant channel is centered but not blown up by a zero divisor.
        assert_eq!(x.get(0, 0, 0), 0.0);
        assert!(x.get(0, 0, 0).is_finite());
    }
}
