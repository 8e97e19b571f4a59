//! Experiment-control logic for the seed/dropout reproducibility study.
//!
//! The heavy numerics live in `dosnet`; this crate owns run configuration,
//! the determinism harness, the seed sweep and k-fold cross-validation
//! orchestrators, and artifact persistence.

pub mod config;
pub mod pipeline;
pub mod results;
