//! The fit/predict/evaluate seam between orchestration and the model.
//!
//! Sweep, cross-validation, and determinism logic are written against
//! [`Trainable`] so they can be exercised with a stub implementation; the
//! burn-backed [`BurnRegressor`] is the production implementation.

use std::path::Path;

use burn::module::AutodiffModule;
use burn::tensor::backend::AutodiffBackend;
use rand::rngs::StdRng;

use dosdata::DosInputs;

use crate::model::regressor::{AdsorptionModel, AdsorptionModelConfig};
use crate::training::metrics::mae;
use crate::training::trainer::{self, TrainingConfig};

/// Capability contract for anything the orchestrators can train and score.
pub trait Trainable {
    /// Fit on the given partition for `epochs` epochs.
    fn fit(&mut self, inputs: &DosInputs, targets: &[f32], epochs: usize) -> anyhow::Result<()>;

    /// Predict one energy per sample, in sample order.
    fn predict(&self, inputs: &DosInputs) -> Vec<f32>;

    /// Score a held-out partition; returns MAE.
    fn evaluate(&self, inputs: &DosInputs, targets: &[f32]) -> f64 {
        mae(targets, &self.predict(inputs))
    }

    /// Persist the model under `path`.
    fn save(&self, path: &Path) -> anyhow::Result<()>;
}

/// Burn-backed convolutional regressor.
///
/// Owns the model, the training hyperparameters, and the host-side RNG used
/// for minibatch shuffling. Construct it right after a global-seed reset so
/// parameter initialization is pinned to the seed.
pub struct BurnRegressor<B: AutodiffBackend> {
    // Taken during fit (the optimizer consumes the module) and always restored.
    model: Option<AdsorptionModel<B>>,
    training: TrainingConfig,
    rng: StdRng,
    device: B::Device,
}

impl<B: AutodiffBackend> BurnRegressor<B> {
    /// Build a fresh model from config.
    pub fn new(
        model_config: &AdsorptionModelConfig,
        training: TrainingConfig,
        rng: StdRng,
        device: &B::Device,
    ) -> Self {
        Self {
            model: Some(model_config.init(device)),
            training,
            rng,
            device: device.clone(),
        }
    }

    /// Build a model and load weights from a per-seed checkpoint.
    pub fn from_checkpoint(
        model_config: &AdsorptionModelConfig,
        training: TrainingConfig,
        path: &Path,
        rng: StdRng,
        device: &B::Device,
    ) -> anyhow::Result<Self> {
        let model = trainer::load_model(model_config, path, device)?;
        tracing::info!(path = %path.display(), "Loaded model checkpoint");
        Ok(Self { model: Some(model), training, rng, device: device.clone() })
    }
}

impl<B: AutodiffBackend> Trainable for BurnRegressor<B> {
    fn fit(&mut self, inputs: &DosInputs, targets: &[f32], epochs: usize) -> anyhow::Result<()> {
        let model = self
            .model
            .take()
            .ok_or_else(|| anyhow::anyhow!("model missing; previous fit did not complete"))?;
        let model = trainer::fit(
            model,
            inputs,
            targets,
            epochs,
            &self.training,
            &mut self.rng,
            &self.device,
        );
        self.model = Some(model);
        Ok(())
    }

    fn predict(&self, inputs: &DosInputs) -> Vec<f32> {
        match &self.model {
            Some(model) => {
                trainer::predict(&model.valid(), inputs, self.training.batch_size, &self.device)
            }
            None => Vec::new(),
        }
    }

    fn save(&self, path: &Path) -> anyhow::Result<()> {
        match &self.model {
            Some(model) => trainer::save_model(model, path),
            None => anyhow::bail!("model missing; nothing to save"),
        }
    }
}
