//! Run-log dictionary and prediction-file persistence.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

/// Flat metrics log keyed `{seed}_{split}_{metric}`, JSON-serialized once at
/// the end of a run.
#[derive(Debug, Default, Serialize)]
pub struct RunLog {
    #[serde(flatten)]
    entries: BTreeMap<String, f64>,
}

impl RunLog {
    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.entries.insert(key.into(), value);
    }

    /// Record train or test MAE/RMSE for one seed of the regular sweep.
    pub fn record_split_metrics(&mut self, seed: u64, split: &str, mae: f64, rmse: f64) {
        self.insert(format!("{seed}_{split}_mae"), mae);
        self.insert(format!("{seed}_{split}_rmse"), rmse);
    }

    /// Record pooled CV MAE/RMSE for one seed.
    pub fn record_cv_metrics(&mut self, seed: u64, mae: f64, rmse: f64) {
        self.insert(format!("{seed}_mae"), mae);
        self.insert(format!("{seed}_rmse"), rmse);
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the log as a flat JSON object, creating parent directories.
    pub fn write(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        serde_json::to_writer(file, self)?;
        tracing::info!(path = %path.display(), entries = self.len(), "Wrote run log");
        Ok(())
    }
}

/// Write paired `target prediction` rows, one sample per line.
pub fn write_predictions(path: &Path, targets: &[f32], predictions: &[f32]) -> anyhow::Result<()> {
    assert_eq!(targets.len(), predictions.len(), "length mismatch");
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create prediction file {}", path.display()))?;
    let mut writer = std::io::BufWriter::new(file);
    for (t, p) in targets.iter().zip(predictions) {
        writeln!(writer, "{t:.18e} {p:.18e}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_keys_and_json_shape() {
        let mut log = RunLog::default();
        log.record_split_metrics(42, "train", 0.1, 0.2);
        log.record_split_metrics(42, "test", 0.3, 0.4);
        log.record_cv_metrics(7, 0.5, 0.6);

        assert_eq!(log.len(), 6);
        assert_eq!(log.get("42_train_mae"), Some(0.1));
        assert_eq!(log.get("42_test_rmse"), Some(0.4));
        assert_eq!(log.get("7_rmse"), Some(0.6));

        let json = serde_json::to_value(&log).unwrap();
        // Flat object, no wrapper key.
        assert!(json.get("42_train_mae").is_some());
    }

    #[test]
    fn test_log_write_creates_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("result").join("seed_dropout").join("log.txt");

        let mut log = RunLog::default();
        log.insert("42_train_mae", 0.25);
        log.write(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed["42_train_mae"], 0.25);
    }

    #[test]
    fn test_prediction_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("result").join("seed").join("preds.txt");

        write_predictions(&path, &[1.0, -2.5], &[0.5, -2.0]).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let row: Vec<f64> = lines[0]
            .split_whitespace()
            .map(|v| v.parse().unwrap())
            .collect();
        assert!((row[0] - 1.0).abs() < 1e-12);
        assert!((row[1] - 0.5).abs() < 1e-12);
    }
}
