//! Model factory: shared convolutional featurizer and branch regressor.

pub mod featurizer;
pub mod regressor;

pub use featurizer::{DosFeaturizer, DosFeaturizerConfig};
pub use regressor::{AdsorptionModel, AdsorptionModelConfig};
