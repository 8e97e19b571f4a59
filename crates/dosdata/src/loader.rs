//! Reads the binary DOS container and prepares model-ready tensors.
//!
//! A container holds 2 or 3 bincode-framed [`RawArray`]s in order: surface
//! DOS, targets, and (multi-adsorbate mode only) adsorbate DOS. Preparation
//! truncates the energy axis to [`ENERGY_BINS`] bins, drops the leading
//! energy-axis channel, zeroes bins above [`ZERO_BIN_START`], and downcasts
//! to f32.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::Context;

use crate::types::{
    DosDataset, DosTensor, RawArray, ADSORBATE_CHANNELS, ENERGY_BINS, SURFACE_CHANNELS,
    ZERO_BIN_START,
};

/// Load a dataset from a binary container file.
///
/// With `multi_adsorbate` set, a third array (adsorbate DOS) is required;
/// a container holding fewer objects than the selected mode expects fails
/// with a deserialization error naming the path.
pub fn load_container(path: &Path, multi_adsorbate: bool) -> anyhow::Result<DosDataset> {
    let file = File::open(path)
        .with_context(|| format!("failed to open data container {}", path.display()))?;
    let mut reader = BufReader::new(file);

    let surface_raw: RawArray = bincode::deserialize_from(&mut reader)
        .with_context(|| format!("{}: missing or malformed surface DOS array", path.display()))?;
    let targets_raw: RawArray = bincode::deserialize_from(&mut reader)
        .with_context(|| format!("{}: missing or malformed targets array", path.display()))?;

    let surface = prepare_dos(&surface_raw, SURFACE_CHANNELS)
        .with_context(|| format!("{}: surface DOS array", path.display()))?;
    let targets = prepare_targets(&targets_raw, surface.samples())
        .with_context(|| format!("{}: targets array", path.display()))?;

    let adsorbate = if multi_adsorbate {
        let adsorbate_raw: RawArray = bincode::deserialize_from(&mut reader).with_context(|| {
            format!("{}: missing or malformed adsorbate DOS array (multi-adsorbate mode)", path.display())
        })?;
        let adsorbate = prepare_dos(&adsorbate_raw, ADSORBATE_CHANNELS)
            .with_context(|| format!("{}: adsorbate DOS array", path.display()))?;
        if adsorbate.samples() != surface.samples() {
            anyhow::bail!(
                "{}: adsorbate samples ({}) != surface samples ({})",
                path.display(),
                adsorbate.samples(),
                surface.samples()
            );
        }
        Some(adsorbate)
    } else {
        None
    };

    tracing::info!(
        path = %path.display(),
        samples = surface.samples(),
        channels = surface.channels(),
        multi_adsorbate,
        "Loaded DOS container"
    );

    Ok(DosDataset { surface, adsorbate, targets })
}

/// Write a container file: surface, targets, and optionally adsorbate.
///
/// Arrays are framed sequentially so a reader in the wrong mode fails on the
/// missing object rather than reading garbage.
pub fn write_container(
    path: &Path,
    surface: &RawArray,
    targets: &RawArray,
    adsorbate: Option<&RawArray>,
) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)
        .with_context(|| format!("failed to create data container {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, surface)?;
    bincode::serialize_into(&mut writer, targets)?;
    if let Some(ads) = adsorbate {
        bincode::serialize_into(&mut writer, ads)?;
    }
    Ok(())
}

/// Truncate, drop the energy-axis channel, zero the high-energy window, downcast.
fn prepare_dos(raw: &RawArray, out_channels: usize) -> anyhow::Result<DosTensor> {
    let [samples, bins, channels] = match raw.dims[..] {
        [s, b, c] => [s, b, c],
        _ => anyhow::bail!("expected a 3-D array, got dims {:?}", raw.dims),
    };
    if raw.data.len() != samples * bins * channels {
        anyhow::bail!(
            "dims {:?} do not match data length {}",
            raw.dims,
            raw.data.len()
        );
    }
    if bins < ENERGY_BINS {
        anyhow::bail!("expected at least {ENERGY_BINS} energy bins, got {bins}");
    }
    // Channel 0 is the energy axis; out_channels real DOS channels follow.
    if channels < out_channels + 1 {
        anyhow::bail!("expected at least {} channels, got {channels}", out_channels + 1);
    }

    let mut out = DosTensor::zeros(samples, ENERGY_BINS, out_channels);
    for s in 0..samples {
        for b in 0..ZERO_BIN_START {
            let row = (s * bins + b) * channels;
            for c in 0..out_channels {
                out.set(s, b, c, raw.data[row + 1 + c] as f32);
            }
        }
        // Bins ZERO_BIN_START..ENERGY_BINS stay zero from allocation.
    }
    Ok(out)
}

fn prepare_targets(raw: &RawArray, samples: usize) -> anyhow::Result<Vec<f32>> {
    if raw.dims.len() != 1 {
        anyhow::bail!("expected a 1-D targets array, got dims {:?}", raw.dims);
    }
    if raw.data.len() != samples {
        anyhow::bail!("expected {samples} targets, got {}", raw.data.len());
    }
    Ok(raw.data.iter().map(|&v| v as f32).collect())
}
