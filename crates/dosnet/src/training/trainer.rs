//! Adam training loop with a stepped learning-rate schedule.
//!
//! Ties the branch regressor, log-cosh loss, and tensor bridge into an
//! epoch/minibatch loop, plus checkpoint save/load for per-seed models.

use std::path::Path;

use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::prelude::*;
use burn::record::{FullPrecisionSettings, NamedMpkFileRecorder};
use burn::tensor::backend::AutodiffBackend;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use dosdata::DosInputs;

use crate::bridge::{dos_to_tensor, targets_to_tensor, tensor_to_vec};
use crate::model::regressor::{AdsorptionModel, NUM_SITES};
use crate::training::loss::log_cosh_loss;

/// Training hyperparameters (epoch count is passed per fit call).
#[derive(Config, Debug)]
pub struct TrainingConfig {
    /// Minibatch size.
    #[config(default = 128)]
    pub batch_size: usize,
    /// Learning rate before the first schedule step.
    #[config(default = 1e-3)]
    pub base_lr: f64,
}

/// Stepped learning-rate schedule keyed on epoch index.
///
/// Epochs 0/15/35/45/55 switch to 1e-3/5e-4/1e-4/5e-5/1e-5; any other epoch
/// retains the previous rate.
pub fn step_lr_schedule(epoch: usize, prev_lr: f64) -> f64 {
    match epoch {
        0 => 1e-3,
        15 => 5e-4,
        35 => 1e-4,
        45 => 5e-5,
        55 => 1e-5,
        _ => prev_lr,
    }
}

/// Slice one batch of site (and adsorbate) branches as burn tensors.
pub fn batch_inputs<B: Backend>(
    inputs: &DosInputs,
    indices: &[usize],
    device: &B::Device,
) -> ([Tensor<B, 3>; 3], Option<Tensor<B, 3>>) {
    let per_site = inputs.surface.channels() / NUM_SITES;
    let site = |i: usize| dos_to_tensor(&inputs.surface, indices, i * per_site..(i + 1) * per_site, device);
    let sites = [site(0), site(1), site(2)];
    let adsorbate = inputs
        .adsorbate
        .as_ref()
        .map(|ads| dos_to_tensor(ads, indices, 0..ads.channels(), device));
    (sites, adsorbate)
}

/// Fit the model for `epochs` epochs and return it.
///
/// Minibatch order is reshuffled per epoch from `rng`; with zero epochs the
/// model is returned untouched, which the determinism harness exploits.
pub fn fit<B: AutodiffBackend>(
    mut model: AdsorptionModel<B>,
    inputs: &DosInputs,
    targets: &[f32],
    epochs: usize,
    config: &TrainingConfig,
    rng: &mut StdRng,
    device: &B::Device,
) -> AdsorptionModel<B> {
    let mut optimizer = AdamConfig::new().init();
    let mut indices: Vec<usize> = (0..targets.len()).collect();
    let mut lr = config.base_lr;

    for epoch in 0..epochs {
        lr = step_lr_schedule(epoch, lr);
        indices.shuffle(rng);

        let mut epoch_loss = 0.0;
        let mut batches = 0usize;
        for chunk in indices.chunks(config.batch_size) {
            let (sites, adsorbate) = batch_inputs::<B>(inputs, chunk, device);
            let batch_targets = targets_to_tensor::<B>(targets, chunk, device);

            let predictions = model.forward(sites, adsorbate);
            let loss = log_cosh_loss(predictions, batch_targets);
            let loss_val: f64 = loss.clone().into_scalar().elem();

            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optimizer.step(lr, model, grads);

            epoch_loss += loss_val;
            batches += 1;
        }

        tracing::debug!(
            epoch,
            lr = %format!("{lr:.1e}"),
            loss = epoch_loss / batches.max(1) as f64,
            "epoch complete"
        );
    }

    model
}

/// Predict energies for every sample in `inputs`, in sample order.
pub fn predict<B: Backend>(
    model: &AdsorptionModel<B>,
    inputs: &DosInputs,
    batch_size: usize,
    device: &B::Device,
) -> Vec<f32> {
    let n = inputs.samples();
    let indices: Vec<usize> = (0..n).collect();
    let mut out = Vec::with_capacity(n);
    for chunk in indices.chunks(batch_size) {
        let (sites, adsorbate) = batch_inputs::<B>(inputs, chunk, device);
        out.extend(tensor_to_vec(model.forward(sites, adsorbate)));
    }
    out
}

/// Save model weights under `path` (`.mpk` appended by the recorder).
pub fn save_model<B: Backend>(model: &AdsorptionModel<B>, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    model
        .clone()
        .save_file(path, &recorder)
        .map_err(|e| anyhow::anyhow!("failed to save model to {}: {e}", path.display()))?;
    tracing::info!(path = %path.display(), "Saved model checkpoint");
    Ok(())
}

/// Load model weights saved by [`save_model`] onto a freshly built model.
pub fn load_model<B: Backend>(
    config: &crate::model::regressor::AdsorptionModelConfig,
    path: &Path,
    device: &B::Device,
) -> anyhow::Result<AdsorptionModel<B>> {
    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    config
        .init::<B>(device)
        .load_file(path, &recorder, device)
        .map_err(|e| anyhow::anyhow!("failed to load model from {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::ndarray::NdArray;
    use burn::backend::Autodiff;
    use burn::module::AutodiffModule;
    use tempfile::TempDir;

    use dosdata::DosTensor;

    use crate::model::regressor::AdsorptionModelConfig;
    use crate::training::seed::reset_random_seed;

    type TestBackend = NdArray<f32>;
    type TestAutodiffBackend = Autodiff<NdArray<f32>>;

    #[test]
    fn test_step_lr_schedule() {
        let mut lr = 1e-3;
        let mut seen = Vec::new();
        for epoch in 0..60 {
            lr = step_lr_schedule(epoch, lr);
            seen.push((epoch, lr));
        }
        assert_eq!(seen[0].1, 1e-3);
        assert_eq!(seen[14].1, 1e-3); // retains previous rate
        assert_eq!(seen[15].1, 5e-4);
        assert_eq!(seen[34].1, 5e-4);
        assert_eq!(seen[35].1, 1e-4);
        assert_eq!(seen[45].1, 5e-5);
        assert_eq!(seen[55].1, 1e-5);
        assert_eq!(seen[59].1, 1e-5);
    }

    fn tiny_inputs(samples: usize) -> (DosInputs, Vec<f32>) {
        let mut surface = DosTensor::zeros(samples, 64, 6);
        for s in 0..samples {
            for b in 0..64 {
                for c in 0..6 {
                    surface.set(s, b, c, ((s + 1) * (c + 1)) as f32 * (b as f32 / 64.0));
                }
            }
        }
        let targets: Vec<f32> = (0..samples).map(|s| s as f32).collect();
        (DosInputs { surface, adsorbate: None }, targets)
    }

    #[test]
    fn test_zero_epochs_leaves_model_untouched() {
        let device = Default::default();
        let mut rng = reset_random_seed::<TestAutodiffBackend>(3);
        let config = AdsorptionModelConfig::new(2).with_bins(64).with_dropout(0.0);
        let model = config.init::<TestAutodiffBackend>(&device);
        let (inputs, targets) = tiny_inputs(4);

        let before = predict(&model.valid(), &inputs, 4, &device);
        let model = fit(model, &inputs, &targets, 0, &TrainingConfig::new(), &mut rng, &device);
        let after = predict(&model.valid(), &inputs, 4, &device);

        assert_eq!(before, after);
        assert!(after.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_one_epoch_updates_model() {
        let device = Default::default();
        let mut rng = reset_random_seed::<TestAutodiffBackend>(3);
        let config = AdsorptionModelConfig::new(2).with_bins(64).with_dropout(0.0);
        let model = config.init::<TestAutodiffBackend>(&device);
        let (inputs, targets) = tiny_inputs(4);

        let before = predict(&model.valid(), &inputs, 4, &device);
        let training = TrainingConfig::new().with_batch_size(4);
        let model = fit(model, &inputs, &targets, 1, &training, &mut rng, &device);
        let after = predict(&model.valid(), &inputs, 4, &device);

        assert_ne!(before, after, "optimizer step did not change predictions");
    }

    #[test]
    fn test_checkpoint_round_trip() {
        let device = Default::default();
        reset_random_seed::<TestBackend>(11);
        let config = AdsorptionModelConfig::new(2).with_bins(64).with_dropout(0.0);
        let model = config.init::<TestBackend>(&device);
        let (inputs, _) = tiny_inputs(3);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("models").join("seed_11");
        save_model(&model, &path).unwrap();

        let reloaded = load_model::<TestBackend>(&config, &path, &device).unwrap();
        assert_eq!(
            predict(&model, &inputs, 3, &device),
            predict(&reloaded, &inputs, 3, &device)
        );
    }
}
