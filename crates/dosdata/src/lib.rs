//! Binary container I/O for density-of-states (DOS) datasets.
//!
//! Provides the dense tensor types used throughout the workspace and the
//! loader that deserializes a surface-DOS / targets / adsorbate-DOS container,
//! truncates the energy axis, and zeroes the unphysical high-energy window.

pub mod loader;
pub mod types;

pub use loader::{load_container, write_container};
pub use types::{
    DosDataset, DosInputs, DosTensor, RawArray, ADSORBATE_CHANNELS, ENERGY_BINS, SURFACE_CHANNELS,
    ZERO_BIN_START,
};
