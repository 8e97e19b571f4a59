//! Shuffled train/test and k-fold index partitioning.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shuffled train/test split of `0..n` with a fixed random state.
///
/// The test partition takes `ceil(n * test_ratio)` indices from the front of
/// the shuffled permutation; the rest train.
///
/// # Panics
/// Panics unless `0 < test_ratio < 1` and the split leaves both partitions
/// non-empty.
pub fn train_test_split(n: usize, test_ratio: f64, state: u64) -> (Vec<usize>, Vec<usize>) {
    assert!(test_ratio > 0.0 && test_ratio < 1.0, "test_ratio must be in (0, 1)");
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(state);
    indices.shuffle(&mut rng);

    let n_test = ((n as f64) * test_ratio).ceil() as usize;
    assert!(n_test > 0 && n_test < n, "split leaves an empty partition");
    let test = indices[..n_test].to_vec();
    let train = indices[n_test..].to_vec();
    (train, test)
}

/// Shuffled k-fold partitioner (sklearn `KFold(shuffle=True)` semantics).
#[derive(Debug, Clone, Copy)]
pub struct KFold {
    n_splits: usize,
}

impl KFold {
    /// # Panics
    /// Panics if `n_splits < 2`.
    pub fn new(n_splits: usize) -> Self {
        assert!(n_splits >= 2, "k-fold requires at least 2 splits");
        Self { n_splits }
    }

    /// Produce all `(train, test)` index pairs for `0..n`.
    ///
    /// Indices are shuffled once with `seed`; the first `n % n_splits` folds
    /// receive one extra index. Every index lands in exactly one test fold.
    ///
    /// # Panics
    /// Panics if `n < n_splits`.
    pub fn split(&self, n: usize, seed: u64) -> Vec<(Vec<usize>, Vec<usize>)> {
        assert!(n >= self.n_splits, "cannot split {n} samples into {} folds", self.n_splits);
        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let base = n / self.n_splits;
        let extra = n % self.n_splits;

        let mut folds = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for fold in 0..self.n_splits {
            let size = base + usize::from(fold < extra);
            let stop = start + size;
            let test = indices[start..stop].to_vec();
            let mut train = indices[..start].to_vec();
            train.extend_from_slice(&indices[stop..]);
            folds.push((train, test));
            start = stop;
        }
        folds
    }
}
