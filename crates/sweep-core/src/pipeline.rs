//! Determinism harness plus the two sweep orchestrators.
//!
//! Everything here is written against the [`Trainable`] seam: the caller
//! supplies a builder closure that constructs a fresh model for a (seed,
//! dropout) pair, which keeps the orchestration testable with a stub model.

use anyhow::bail;

use dosdata::{DosDataset, DosInputs};
use dosnet::training::{mae, mean_std, rmse, standardize_split, train_test_split, KFold};
use dosnet::Trainable;

use crate::config::{
    cv_seed_list, RunConfig, DEFAULT_DROPOUT, DROPOUT_VALUES, KFOLD_SPLITS, SEED_LIST, SPLIT_STATE,
};
use crate::results::{write_predictions, RunLog};

/// Standardize one train/test partition, fitting statistics on the train
/// side only. The adsorbate tensor gets its own scaler.
fn standardize_inputs(
    dataset: &DosDataset,
    train_idx: &[usize],
    test_idx: &[usize],
) -> (DosInputs, DosInputs) {
    let (train_surface, test_surface) = standardize_split(&dataset.surface, train_idx, test_idx);
    let (train_ads, test_ads) = match &dataset.adsorbate {
        Some(ads) => {
            let (train, test) = standardize_split(ads, train_idx, test_idx);
            (Some(train), Some(test))
        }
        None => (None, None),
    };
    (
        DosInputs { surface: train_surface, adsorbate: train_ads },
        DosInputs { surface: test_surface, adsorbate: test_ads },
    )
}

/// Double-run equality check on freshly built, unfitted models.
///
/// Builds the model twice from the same (seed, dropout) pair, runs a
/// zero-epoch fit and predicts on both partitions each time, and requires the
/// prediction arrays to match bit for bit. Returns both runs' (train, test)
/// predictions so the caller can persist them. Any mismatch is fatal: sweep
/// results from non-reproducible infrastructure are worthless.
pub fn verify_reproducibility<T, F>(
    mut build: F,
    train_inputs: &DosInputs,
    train_targets: &[f32],
    test_inputs: &DosInputs,
    seed: u64,
    dropout: f64,
) -> anyhow::Result<[(Vec<f32>, Vec<f32>); 2]>
where
    T: Trainable,
    F: FnMut(u64, f64) -> anyhow::Result<T>,
{
    let mut run = || -> anyhow::Result<(Vec<f32>, Vec<f32>)> {
        let mut model = build(seed, dropout)?;
        model.fit(train_inputs, train_targets, 0)?;
        Ok((model.predict(train_inputs), model.predict(test_inputs)))
    };
    let first = run()?;
    let second = run()?;

    if first != second {
        bail!(
            "reproducibility check failed for seed {seed}: identically seeded runs \
             produced different predictions"
        );
    }
    tracing::info!(seed, dropout, "Reproducibility check passed");
    Ok([first, second])
}

/// Seed sweep over a single fixed train/test split.
///
/// For each seed in [`SEED_LIST`]: build (or reload) a model, fit for the
/// configured epochs, score train and test partitions with MAE/RMSE, and
/// persist paired (target, prediction) rows per seed.
pub fn run_regular<T, F>(
    config: &RunConfig,
    dataset: &DosDataset,
    mut build: F,
) -> anyhow::Result<RunLog>
where
    T: Trainable,
    F: FnMut(u64, f64) -> anyhow::Result<T>,
{
    let (train_idx, test_idx) = train_test_split(dataset.samples(), config.split_ratio, SPLIT_STATE);
    let (train_inputs, test_inputs) = standardize_inputs(dataset, &train_idx, &test_idx);
    let train_targets = dataset.gather_targets(&train_idx);
    let test_targets = dataset.gather_targets(&test_idx);

    let seed_dir = config.results_dir.join("seed");
    let probe_runs = verify_reproducibility(
        &mut build,
        &train_inputs,
        &train_targets,
        &test_inputs,
        SEED_LIST[0],
        DEFAULT_DROPOUT,
    )?;
    for (i, (train_preds, test_preds)) in probe_runs.iter().enumerate() {
        write_predictions(
            &seed_dir.join(format!("{}_initial_value{i}_train.txt", config.data_dir)),
            &train_targets,
            train_preds,
        )?;
        write_predictions(
            &seed_dir.join(format!("{}_initial_value{i}_test.txt", config.data_dir)),
            &test_targets,
            test_preds,
        )?;
    }

    let mut log = RunLog::default();
    for &seed in &SEED_LIST {
        let mut model = build(seed, DEFAULT_DROPOUT)?;
        model.fit(&train_inputs, &train_targets, config.epochs)?;

        let train_preds = model.predict(&train_inputs);
        let test_preds = model.predict(&test_inputs);
        let test_mae = mae(&test_targets, &test_preds);
        let test_rmse = rmse(&test_targets, &test_preds);
        log.record_split_metrics(
            seed,
            "train",
            mae(&train_targets, &train_preds),
            rmse(&train_targets, &train_preds),
        );
        log.record_split_metrics(seed, "test", test_mae, test_rmse);
        tracing::info!(seed, test_mae, test_rmse, "Seed run complete");

        write_predictions(
            &seed_dir.join(format!("{}_seed{seed}_predict_train.txt", config.data_dir)),
            &train_targets,
            &train_preds,
        )?;
        write_predictions(
            &seed_dir.join(format!("{}_seed{seed}_predict_test.txt", config.data_dir)),
            &test_targets,
            &test_preds,
        )?;

        if config.save_model {
            model.save(&config.model_path(seed))?;
        }
    }
    Ok(log)
}

/// Dropout x seed sweep over k-fold cross-validation splits.
///
/// The fold partition is computed once from `config.seed` and shared by every
/// (dropout, seed) pair; `kfold_num` caps how many of the folds actually run.
/// Per fold the data is re-standardized with fold-local train statistics and
/// a fresh model is built, so no state leaks between folds. Held-out
/// predictions are pooled across folds and scored once per seed.
pub fn run_kfold<T, F>(
    config: &RunConfig,
    dataset: &DosDataset,
    mut build: F,
) -> anyhow::Result<RunLog>
where
    T: Trainable,
    F: FnMut(u64, f64) -> anyhow::Result<T>,
{
    let n = dataset.samples();
    let folds: Vec<_> = KFold::new(KFOLD_SPLITS)
        .split(n, config.seed)
        .into_iter()
        .take(config.kfold_num)
        .collect();

    {
        let (train_idx, test_idx) = &folds[0];
        let (train_inputs, test_inputs) = standardize_inputs(dataset, train_idx, test_idx);
        let train_targets = dataset.gather_targets(train_idx);
        verify_reproducibility(
            &mut build,
            &train_inputs,
            &train_targets,
            &test_inputs,
            cv_seed_list()[0],
            DEFAULT_DROPOUT,
        )?;
    }

    let mut log = RunLog::default();
    for &dropout in &DROPOUT_VALUES {
        let dropout_dir = config
            .results_dir
            .join("seed_dropout")
            .join(format!("{dropout:.1}"));
        for seed in cv_seed_list() {
            let mut pooled_targets: Vec<f32> = Vec::with_capacity(n);
            let mut pooled_preds: Vec<f32> = Vec::with_capacity(n);
            let mut pooled_indices: Vec<usize> = Vec::with_capacity(n);
            let mut fold_scores: Vec<f64> = Vec::with_capacity(folds.len());

            for (fold, (train_idx, test_idx)) in folds.iter().enumerate() {
                let (train_inputs, test_inputs) = standardize_inputs(dataset, train_idx, test_idx);
                let train_targets = dataset.gather_targets(train_idx);
                let test_targets = dataset.gather_targets(test_idx);

                let mut model = build(seed, dropout)?;
                model.fit(&train_inputs, &train_targets, config.epochs)?;
                fold_scores.push(model.evaluate(&test_inputs, &test_targets));

                pooled_preds.extend(model.predict(&test_inputs));
                pooled_targets.extend(test_targets);
                pooled_indices.extend(test_idx.iter().copied());
                tracing::debug!(dropout, seed, fold, "fold complete");
            }

            // Pooling covers each sample exactly once when every fold runs.
            if folds.len() == KFOLD_SPLITS {
                pooled_indices.sort_unstable();
                assert!(pooled_indices.iter().copied().eq(0..n), "k-fold pooling gap");
            }

            let pooled_mae = mae(&pooled_targets, &pooled_preds);
            let pooled_rmse = rmse(&pooled_targets, &pooled_preds);
            log.record_cv_metrics(seed, pooled_mae, pooled_rmse);
            let (fold_mean, fold_std) = mean_std(&fold_scores);
            tracing::info!(
                dropout,
                seed,
                pooled_mae,
                pooled_rmse,
                fold_mean,
                fold_std,
                "CV seed complete"
            );

            write_predictions(
                &dropout_dir.join(format!(
                    "{}_CV{}_seed{seed}.txt",
                    config.data_dir, config.kfold_num
                )),
                &pooled_targets,
                &pooled_preds,
            )?;
        }
    }
    Ok(log)
}
