//! Training loop, loss, metrics, scaling, splitting, and the trainable seam.

pub mod loss;
pub mod metrics;
pub mod scaler;
pub mod seed;
pub mod split;
pub mod trainable;
pub mod trainer;

pub use metrics::{mae, mean_std, rmse};
pub use scaler::{standardize_split, StandardScaler};
pub use seed::reset_random_seed;
pub use split::{train_test_split, KFold};
pub use trainable::{BurnRegressor, Trainable};
pub use trainer::{step_lr_schedule, TrainingConfig};
