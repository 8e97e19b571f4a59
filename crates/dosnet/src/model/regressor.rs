//! Branch regressor: shared featurizer over bonding sites, dense head to energy.

use burn::nn::{Dropout, DropoutConfig, Linear, LinearConfig};
use burn::prelude::*;
use burn::tensor::activation::relu;

use crate::model::featurizer::{DosFeaturizer, DosFeaturizerConfig};

/// Number of bonding-site branches fed through the shared featurizer.
pub const NUM_SITES: usize = 3;

/// Configuration for the full adsorption-energy model.
///
/// `channels` is the per-site channel count (9 orbitals); the surface tensor
/// carries `3 * channels` channels which the forward pass slices per site.
/// The multi-adsorbate variant adds a fourth, separately-weighted featurizer
/// for the gas-phase adsorbate DOS.
#[derive(Config, Debug)]
pub struct AdsorptionModelConfig {
    /// DOS channels per bonding site.
    pub channels: usize,
    /// Dropout rate applied to the concatenated flattened features.
    #[config(default = 0.2)]
    pub dropout: f64,
    /// Enable the adsorbate branch.
    #[config(default = false)]
    pub multi_adsorbate: bool,
    /// Energy bins per spectrum.
    #[config(default = 2000)]
    pub bins: usize,
}

/// Convolutional regression model: up to four DOS branches to one energy.
#[derive(Module, Debug)]
pub struct AdsorptionModel<B: Backend> {
    /// One featurizer applied to all three site branches (weight sharing).
    shared: DosFeaturizer<B>,
    /// Separately-weighted featurizer for the adsorbate branch.
    adsorbate: Option<DosFeaturizer<B>>,
    dropout: Dropout,
    dense1: Linear<B>,
    dense2: Linear<B>,
    dense3: Linear<B>,
    output: Linear<B>,
}

impl AdsorptionModelConfig {
    /// Initialize the model with the given configuration.
    pub fn init<B: Backend>(&self, device: &B::Device) -> AdsorptionModel<B> {
        let branch = DosFeaturizerConfig::new(self.channels).with_bins(self.bins);
        let per_branch = branch.feature_dim();
        let branches = if self.multi_adsorbate { NUM_SITES + 1 } else { NUM_SITES };
        let flat = branches * per_branch;

        AdsorptionModel {
            shared: branch.init(device),
            adsorbate: self
                .multi_adsorbate
                .then(|| DosFeaturizerConfig::new(self.channels).with_bins(self.bins).init(device)),
            dropout: DropoutConfig::new(self.dropout).init(),
            dense1: LinearConfig::new(flat, 200).init(device),
            dense2: LinearConfig::new(200, 1000).init(device),
            dense3: LinearConfig::new(1000, 1000).init(device),
            output: LinearConfig::new(1000, 1).init(device),
        }
    }
}

impl<B: Backend> AdsorptionModel<B> {
    /// Forward pass.
    ///
    /// `sites` are the three bonding-site slices, each `(batch, channels, bins)`;
    /// `adsorbate` must be `Some` exactly when the model was built with the
    /// adsorbate branch.
    ///
    /// Output shape: `(batch,)`
    pub fn forward(
        &self,
        sites: [Tensor<B, 3>; 3],
        adsorbate: Option<Tensor<B, 3>>,
    ) -> Tensor<B, 1> {
        let [s1, s2, s3] = sites;
        let mut features = vec![
            self.shared.forward(s1),
            self.shared.forward(s2),
            self.shared.forward(s3),
        ];
        if let (Some(featurizer), Some(ads)) = (&self.adsorbate, adsorbate) {
            features.push(featurizer.forward(ads));
        }

        let x = Tensor::cat(features, 1);
        let [batch, filters, len] = x.dims();
        let x = x.reshape([batch, filters * len]);

        let x = self.dropout.forward(x);
        let x = self.dense1.forward(x); // linear activation
        let x = relu(self.dense2.forward(x));
        let x = relu(self.dense3.forward(x));
        self.output.forward(x).squeeze::<1>(1)
    }

    /// Whether this model expects an adsorbate branch input.
    pub fn has_adsorbate_branch(&self) -> bool {
        self.adsorbate.is_some()
    }
}
