//! Convolutional regression model for adsorption energies from DOS spectra.
//!
//! A shared-weight 1-D convolutional featurizer is applied to each bonding
//! site's DOS channels; branch features are concatenated and regressed to a
//! scalar energy through dense layers. The training side provides a log-cosh
//! loss, an Adam loop with a stepped learning-rate schedule, standardization
//! and splitting utilities, and the [`Trainable`] seam the sweep orchestration
//! is written against.

pub mod bridge;
pub mod model;
pub mod training;

pub use model::featurizer::{DosFeaturizer, DosFeaturizerConfig};
pub use model::regressor::{AdsorptionModel, AdsorptionModelConfig};
pub use training::trainable::{BurnRegressor, Trainable};
