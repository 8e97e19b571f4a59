//! Run configuration and the fixed exploration constants of the study.

use std::path::PathBuf;

/// Seeds explored by the regular training sweep.
pub const SEED_LIST: [u64; 5] = [42, 666, 2023, 1, 3];

/// Dropout rates swept in k-fold mode.
pub const DROPOUT_VALUES: [f64; 5] = [0.0, 0.2, 0.4, 0.6, 0.8];

/// Dropout rate used by the regular (non-sweep) training mode.
pub const DEFAULT_DROPOUT: f64 = 0.2;

/// Fixed random state for the regular train/test split.
pub const SPLIT_STATE: u64 = 88;

/// Number of splits in the k-fold partition; `kfold_num` caps how many run.
pub const KFOLD_SPLITS: usize = 5;

/// Seeds explored per dropout value in k-fold mode.
pub fn cv_seed_list() -> Vec<u64> {
    (42..52).collect()
}

/// Which orchestrator a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Single train/test split, seed sweep.
    Regular,
    /// Dropout x seed sweep over k-fold splits.
    KFold,
}

impl RunMode {
    /// Name used in the log-file path.
    pub fn name(&self) -> &'static str {
        match self {
            RunMode::Regular => "regular",
            RunMode::KFold => "kfold",
        }
    }
}

/// Immutable per-invocation configuration.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub multi_adsorbate: bool,
    /// Container file name under `data_root`.
    pub data_dir: String,
    pub run_mode: RunMode,
    pub split_ratio: f64,
    pub epochs: usize,
    pub batch_size: usize,
    /// DOS channels per bonding site.
    pub channels: usize,
    /// Seed for the k-fold partition (already resolved if the CLI passed 0).
    pub seed: u64,
    pub save_model: bool,
    pub load_model: bool,
    /// Folds actually executed per (dropout, seed) pair.
    pub kfold_num: usize,
    pub data_root: PathBuf,
    pub results_dir: PathBuf,
    pub models_dir: PathBuf,
}

impl RunConfig {
    /// Path of the input container.
    pub fn data_path(&self) -> PathBuf {
        self.data_root.join(&self.data_dir)
    }

    /// Path of the JSON metrics log for this run.
    pub fn log_path(&self) -> PathBuf {
        self.results_dir.join("seed_dropout").join(format!(
            "{}_seed_dropout_{}{}_log.txt",
            self.data_dir,
            self.run_mode.name(),
            self.kfold_num
        ))
    }

    /// Checkpoint path for a given seed.
    pub fn model_path(&self, seed: u64) -> PathBuf {
        self.models_dir.join(format!("seed_{seed}"))
    }
}
