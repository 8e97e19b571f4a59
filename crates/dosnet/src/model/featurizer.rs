//! Shared 1-D convolutional featurizer for a single DOS branch.
//!
//! Three parallel average-pooling branches at different receptive-field widths
//! feed five convolution stages with interleaved batch normalization and
//! pooling; strides progressively reduce the sequence length. The same
//! instance (shared weights) is applied to each bonding-site input.

use burn::nn::conv::{Conv1d, Conv1dConfig};
use burn::nn::pool::{AvgPool1d, AvgPool1dConfig};
use burn::nn::{BatchNorm, BatchNormConfig, PaddingConfig1d};
use burn::prelude::*;
use burn::tensor::activation::relu;

/// Filter counts of the five convolution stages.
const CONV_FILTERS: [usize; 5] = [50, 75, 100, 125, 150];

/// Configuration for the shared DOS featurizer.
///
/// ```text
/// (batch, channels, bins)
///   -> AvgPool(k4 s4) | AvgPool(k25 s4) | AvgPool(k200 s4)   (parallel)
///   -> concat channels
///   -> Conv(50, k20 s2) -> BatchNorm
///   -> Conv(75, k3 s2) -> AvgPool(k3 s2)
///   -> Conv(100, k3 s2) -> AvgPool(k3 s2)
///   -> Conv(125, k3 s2) -> AvgPool(k3 s2)
///   -> Conv(150, k3 s1)
///   -> (batch, 150, bins/512 rounded)
/// ```
///
/// All stages use ReLU and keras-style "same" padding realized as fixed
/// explicit paddings; `bins` must be a multiple of 4 so the three pooling
/// branches agree on their output length.
#[derive(Config, Debug)]
pub struct DosFeaturizerConfig {
    /// DOS channels per branch (9 orbitals by default).
    pub channels: usize,
    /// Energy bins per spectrum.
    #[config(default = 2000)]
    pub bins: usize,
}

/// Shared-weight convolutional feature extractor for one DOS branch.
#[derive(Module, Debug)]
pub struct DosFeaturizer<B: Backend> {
    pool_fine: AvgPool1d,
    pool_mid: AvgPool1d,
    pool_wide: AvgPool1d,
    conv1: Conv1d<B>,
    norm1: BatchNorm<B, 1>,
    conv2: Conv1d<B>,
    pool_a: AvgPool1d,
    conv3: Conv1d<B>,
    pool_b: AvgPool1d,
    conv4: Conv1d<B>,
    pool_c: AvgPool1d,
    conv5: Conv1d<B>,
}

/// Output length of a 1-D conv/pool stage (floor convention).
fn stage_out_len(len: usize, kernel: usize, stride: usize, padding: usize) -> usize {
    (len + 2 * padding - kernel) / stride + 1
}

impl DosFeaturizerConfig {
    /// Flattened feature length one branch contributes after the final stage.
    pub fn feature_dim(&self) -> usize {
        let mut len = stage_out_len(self.bins, 4, 4, 0);
        len = stage_out_len(len, 20, 2, 9); // conv1
        for _ in 0..6 {
            // conv2, pool_a, conv3, pool_b, conv4, pool_c: all k3 s2 p1
            len = stage_out_len(len, 3, 2, 1);
        }
        len = stage_out_len(len, 3, 1, 1); // conv5
        CONV_FILTERS[4] * len
    }

    /// Initialize a featurizer with the given configuration.
    ///
    /// # Panics
    /// Panics if `bins` is not a positive multiple of 4; the parallel pooling
    /// branches only produce equal lengths on a 4-aligned energy axis.
    pub fn init<B: Backend>(&self, device: &B::Device) -> DosFeaturizer<B> {
        assert!(
            self.bins >= 8 && self.bins % 4 == 0,
            "bins must be a multiple of 4 and >= 8, got {}",
            self.bins
        );
        let pool = |kernel: usize, stride: usize, padding: usize| {
            AvgPool1dConfig::new(kernel)
                .with_stride(stride)
                .with_padding(PaddingConfig1d::Explicit(padding))
                .init()
        };
        let conv = |c_in: usize, c_out: usize, kernel: usize, stride: usize, padding: usize| {
            Conv1dConfig::new(c_in, c_out, kernel)
                .with_stride(stride)
                .with_padding(PaddingConfig1d::Explicit(padding))
                .init(device)
        };

        DosFeaturizer {
            // Paddings chosen so every branch yields bins/4 positions.
            pool_fine: pool(4, 4, 0),
            pool_mid: pool(25, 4, 11),
            pool_wide: pool(200, 4, 98),
            conv1: conv(3 * self.channels, CONV_FILTERS[0], 20, 2, 9),
            norm1: BatchNormConfig::new(CONV_FILTERS[0]).init(device),
            conv2: conv(CONV_FILTERS[0], CONV_FILTERS[1], 3, 2, 1),
            pool_a: pool(3, 2, 1),
            conv3: conv(CONV_FILTERS[1], CONV_FILTERS[2], 3, 2, 1),
            pool_b: pool(3, 2, 1),
            conv4: conv(CONV_FILTERS[2], CONV_FILTERS[3], 3, 2, 1),
            pool_c: pool(3, 2, 1),
            conv5: conv(CONV_FILTERS[3], CONV_FILTERS[4], 3, 1, 1),
        }
    }
}

impl<B: Backend> DosFeaturizer<B> {
    /// Forward pass for one branch.
    ///
    /// Input shape: `(batch, channels, bins)`
    /// Output shape: `(batch, 150, reduced_len)`
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let fine = self.pool_fine.forward(x.clone());
        let mid = self.pool_mid.forward(x.clone());
        let wide = self.pool_wide.forward(x);
        let x = Tensor::cat(vec![fine, mid, wide], 1);

        let x = self.norm1.forward(relu(self.conv1.forward(x)));
        let x = self.pool_a.forward(relu(self.conv2.forward(x)));
        let x = self.pool_b.forward(relu(self.conv3.forward(x)));
        let x = self.pool_c.forward(relu(self.conv4.forward(x)));
        relu(self.conv5.forward(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::ndarray::NdArray;
    use burn::tensor::Distribution;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_feature_dim_full_resolution() {
        // 2000 -> 500 -> 250 -> 125 -> 63 -> 32 -> 16 -> 8 -> 4 -> 4
        let config = DosFeaturizerConfig::new(9);
        assert_eq!(config.feature_dim(), 150 * 4);
    }

    #[test]
    fn test_feature_dim_reduced_resolution() {
        // 512 -> 128 -> 64 -> 32 -> 16 -> 8 -> 4 -> 2 -> 1 -> 1
        let config = DosFeaturizerConfig::new(4).with_bins(512);
        assert_eq!(config.feature_dim(), 150);
    }

    #[test]
    fn test_forward_shape_matches_feature_dim() {
        let device = Default::default();
        let config = DosFeaturizerConfig::new(4).with_bins(512);
        let model = config.init::<TestBackend>(&device);

        let input = Tensor::<TestBackend, 3>::random(
            [2, 4, 512],
            Distribution::Normal(0.0, 1.0),
            &device,
        );
        let out = model.forward(input);
        let [batch, filters, len] = out.dims();
        assert_eq!(batch, 2);
        assert_eq!(filters * len, config.feature_dim());
        assert_eq!(filters, 150);
    }

    #[test]
    fn test_shared_instance_same_output_for_same_input() {
        let device = Default::default();
        let config = DosFeaturizerConfig::new(2).with_bins(64);
        let model = config.init::<TestBackend>(&device);

        let input = Tensor::<TestBackend, 3>::random(
            [1, 2, 64],
            Distribution::Normal(0.0, 1.0),
            &device,
        );
        let a: Vec<f32> = model.forward(input.clone()).into_data().to_vec().unwrap();
        let b: Vec<f32> = model.forward(input).into_data().to_vec().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic(expected = "multiple of 4")]
    fn test_rejects_misaligned_bins() {
        let device: <TestBackend as Backend>::Device = Default::default();
        DosFeaturizerConfig::new(9).with_bins(1999).init::<TestBackend>(&device);
    }
}
