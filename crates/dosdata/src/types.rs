//! Dense tensor types for DOS spectra and the raw on-disk array format.

use serde::{Deserialize, Serialize};

/// Number of energy bins kept after truncation.
pub const ENERGY_BINS: usize = 2000;
/// Surface DOS channels: 9 orbitals x 3 bonding sites.
pub const SURFACE_CHANNELS: usize = 27;
/// Adsorbate DOS channels: 9 orbitals, single species.
pub const ADSORBATE_CHANNELS: usize = 9;
/// Bins at and above this index are forced to zero after load. States this
/// far above the Fermi level are not physically meaningful.
pub const ZERO_BIN_START: usize = 1800;

/// Raw f64 array as stored in the binary container: shape + flat row-major data.
///
/// The on-disk surface array carries one extra leading channel (the energy
/// axis) which the loader drops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawArray {
    /// Dimensions, outermost first. 3-D for DOS arrays, 1-D for targets.
    pub dims: Vec<usize>,
    /// Row-major data; `dims` must multiply out to `data.len()`.
    pub data: Vec<f64>,
}

impl RawArray {
    /// Build a raw 3-D array from flat data.
    pub fn new_3d(samples: usize, bins: usize, channels: usize, data: Vec<f64>) -> Self {
        assert_eq!(samples * bins * channels, data.len(), "dims/data mismatch");
        Self { dims: vec![samples, bins, channels], data }
    }

    /// Build a raw 1-D array (targets).
    pub fn new_1d(data: Vec<f64>) -> Self {
        Self { dims: vec![data.len()], data }
    }
}

/// Dense f32 DOS tensor, row-major `(samples, bins, channels)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DosTensor {
    samples: usize,
    bins: usize,
    channels: usize,
    data: Vec<f32>,
}

impl DosTensor {
    /// Allocate a zero-filled tensor.
    pub fn zeros(samples: usize, bins: usize, channels: usize) -> Self {
        Self { samples, bins, channels, data: vec![0.0; samples * bins * channels] }
    }

    /// Wrap flat row-major data.
    ///
    /// # Panics
    /// Panics if `data.len() != samples * bins * channels`.
    pub fn from_flat(samples: usize, bins: usize, channels: usize, data: Vec<f32>) -> Self {
        assert_eq!(samples * bins * channels, data.len(), "dims/data mismatch");
        Self { samples, bins, channels, data }
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    fn index(&self, sample: usize, bin: usize, channel: usize) -> usize {
        (sample * self.bins + bin) * self.channels + channel
    }

    #[inline]
    pub fn get(&self, sample: usize, bin: usize, channel: usize) -> f32 {
        self.data[self.index(sample, bin, channel)]
    }

    #[inline]
    pub fn set(&mut self, sample: usize, bin: usize, channel: usize, value: f32) {
        let idx = self.index(sample, bin, channel);
        self.data[idx] = value;
    }

    /// Flat row-major view of the data.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Copy out the rows for the given sample indices, preserving their order.
    pub fn select_samples(&self, indices: &[usize]) -> DosTensor {
        let row = self.bins * self.channels;
        let mut data = Vec::with_capacity(indices.len() * row);
        for &s in indices {
            let start = s * row;
            data.extend_from_slice(&self.data[start..start + row]);
        }
        DosTensor { samples: indices.len(), bins: self.bins, channels: self.channels, data }
    }
}

/// One partition's model inputs: surface DOS plus optional adsorbate DOS.
///
/// Both tensors cover the same samples in the same order.
#[derive(Debug, Clone)]
pub struct DosInputs {
    pub surface: DosTensor,
    pub adsorbate: Option<DosTensor>,
}

impl DosInputs {
    pub fn samples(&self) -> usize {
        self.surface.samples()
    }
}

/// A fully loaded dataset: surface DOS, optional adsorbate DOS, and targets.
#[derive(Debug, Clone)]
pub struct DosDataset {
    pub surface: DosTensor,
    pub adsorbate: Option<DosTensor>,
    /// One adsorption energy per sample.
    pub targets: Vec<f32>,
}

impl DosDataset {
    pub fn samples(&self) -> usize {
        self.surface.samples()
    }

    /// Gather targets for the given sample indices, preserving order.
    pub fn gather_targets(&self, indices: &[usize]) -> Vec<f32> {
        indices.iter().map(|&i| self.targets[i]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexing_round_trip() {
        let mut t = DosTensor::zeros(2, 4, 3);
        t.set(1, 3, 2, 7.5);
        t.set(0, 0, 0, -1.0);
        assert_eq!(t.get(1, 3, 2), 7.5);
        assert_eq!(t.get(0, 0, 0), -1.0);
        assert_eq!(t.get(1, 3, 1), 0.0);
    }

    #[test]
    fn test_select_samples_order() {
        let data: Vec<f32> = (0..3 * 2 * 2).map(|v| v as f32).collect();
        let t = DosTensor::from_flat(3, 2, 2, data);
        let picked = t.select_samples(&[2, 0]);
        assert_eq!(picked.samples(), 2);
        // Sample 2 occupies flat positions 8..12.
        assert_eq!(picked.get(0, 0, 0), 8.0);
        assert_eq!(picked.get(0, 1, 1), 11.0);
        // Sample 0 comes second.
        assert_eq!(picked.get(1, 0, 0), 0.0);
    }

    #[test]
    fn test_raw_array_constructors() {
        let raw = RawArray::new_3d(1, 2, 3, vec![0.0; 6]);
        assert_eq!(raw.dims, vec![1, 2, 3]);
        let targets = RawArray::new_1d(vec![1.0, 2.0]);
        assert_eq!(targets.dims, vec![2]);
    }

    #[test]
    #[should_panic(expected = "dims/data mismatch")]
    fn test_from_flat_rejects_bad_len() {
        DosTensor::from_flat(2, 2, 2, vec![0.0; 7]);
    }
}
