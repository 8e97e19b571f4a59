//! `dos-sweep`: seed/dropout reproducibility study over DOS adsorption models.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use burn::backend::ndarray::{NdArray, NdArrayDevice};
use burn::backend::Autodiff;
use clap::Parser;
use rand::Rng;
use tracing_subscriber::EnvFilter;

use dosdata::load_container;
use dosnet::training::{reset_random_seed, TrainingConfig};
use dosnet::{AdsorptionModelConfig, BurnRegressor};

use sweep_core::config::{RunConfig, RunMode};
use sweep_core::pipeline::{run_kfold, run_regular};

type TrainBackend = Autodiff<NdArray<f32>>;

#[derive(Parser, Debug)]
#[command(name = "dos-sweep", about = "Seed/dropout sweeps for DOS adsorption-energy models")]
struct Cli {
    /// Expect an adsorbate DOS array in the container (0 or 1).
    #[arg(long = "multi_adsorbate", default_value_t = 0)]
    multi_adsorbate: u8,

    /// Container file name under the data root.
    #[arg(long = "data_dir", default_value = "CH_data")]
    data_dir: String,

    /// 0 = seed sweep over a single split, 1 = dropout x seed k-fold sweep.
    #[arg(long = "run_mode", default_value_t = 0)]
    run_mode: u8,

    /// Test fraction for the single-split mode.
    #[arg(long = "split_ratio", default_value_t = 0.2)]
    split_ratio: f64,

    #[arg(long, default_value_t = 60)]
    epochs: usize,

    #[arg(long = "batch_size", default_value_t = 128)]
    batch_size: usize,

    /// DOS channels per bonding site.
    #[arg(long, default_value_t = 9)]
    channels: usize,

    /// Seed for the k-fold partition; 0 draws one at random.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Save the trained model per seed (0 or 1).
    #[arg(long = "save_model", default_value_t = 0)]
    save_model: u8,

    /// Reload per-seed checkpoints instead of fresh initialization (0 or 1).
    #[arg(long = "load_model", default_value_t = 0)]
    load_model: u8,

    /// Folds to run per (dropout, seed) pair, capped at the split count.
    #[arg(long = "kfold_num", default_value_t = 5)]
    kfold_num: usize,

    /// Directory holding the input container.
    #[arg(long = "data_root", default_value = "data")]
    data_root: PathBuf,

    #[arg(long = "results_dir", default_value = "result")]
    results_dir: PathBuf,

    #[arg(long = "models_dir", default_value = "models")]
    models_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let started = Instant::now();

    let seed = if cli.seed == 0 {
        let drawn = rand::thread_rng().gen_range(1..1_000_000u64);
        tracing::info!(seed = drawn, "Seed 0 requested, drew a random partition seed");
        drawn
    } else {
        cli.seed
    };

    let config = RunConfig {
        multi_adsorbate: cli.multi_adsorbate != 0,
        data_dir: cli.data_dir,
        run_mode: if cli.run_mode == 0 { RunMode::Regular } else { RunMode::KFold },
        split_ratio: cli.split_ratio,
        epochs: cli.epochs,
        batch_size: cli.batch_size,
        channels: cli.channels,
        seed,
        save_model: cli.save_model != 0,
        load_model: cli.load_model != 0,
        kfold_num: cli.kfold_num,
        data_root: cli.data_root,
        results_dir: cli.results_dir,
        models_dir: cli.models_dir,
    };

    let data_path = config.data_path();
    let dataset = load_container(&data_path, config.multi_adsorbate)
        .with_context(|| format!("failed to load {}", data_path.display()))?;
    tracing::info!(
        samples = dataset.samples(),
        mode = config.run_mode.name(),
        epochs = config.epochs,
        "Dataset loaded"
    );

    let device = NdArrayDevice::default();
    let build = |seed: u64, dropout: f64| -> anyhow::Result<BurnRegressor<TrainBackend>> {
        // Global reset first so parameter init is pinned to the seed.
        let rng = reset_random_seed::<TrainBackend>(seed);
        let model_config = AdsorptionModelConfig::new(config.channels)
            .with_dropout(dropout)
            .with_multi_adsorbate(config.multi_adsorbate);
        let training = TrainingConfig::new().with_batch_size(config.batch_size);
        if config.load_model && config.run_mode == RunMode::Regular {
            BurnRegressor::from_checkpoint(
                &model_config,
                training,
                &config.model_path(seed),
                rng,
                &device,
            )
        } else {
            Ok(BurnRegressor::new(&model_config, training, rng, &device))
        }
    };

    let log = match config.run_mode {
        RunMode::Regular => run_regular(&config, &dataset, build)?,
        RunMode::KFold => run_kfold(&config, &dataset, build)?,
    };
    log.write(&config.log_path())?;

    tracing::info!(elapsed_s = started.elapsed().as_secs_f64(), "Run complete");
    Ok(())
}
