//! Generate a synthetic DOS container for smoke-testing `dos-sweep`.
//!
//! Usage: cargo run -p sweep-core --example gen_synthetic_data -- [path] [samples]

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use dosdata::{write_container, RawArray, ENERGY_BINS, SURFACE_CHANNELS};

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let path = PathBuf::from(args.next().unwrap_or_else(|| "data/CH_data".to_string()));
    let samples: usize = args.next().map(|v| v.parse()).transpose()?.unwrap_or(50);

    let mut rng = StdRng::seed_from_u64(7);
    let raw_channels = SURFACE_CHANNELS + 1;
    let mut data = Vec::with_capacity(samples * ENERGY_BINS * raw_channels);
    for _ in 0..samples {
        for b in 0..ENERGY_BINS {
            // Channel 0 is the energy axis; the loader drops it.
            let energy = -15.0 + 20.0 * b as f64 / ENERGY_BINS as f64;
            data.push(energy);
            for _ in 1..raw_channels {
                let center = energy + rng.gen_range(-0.5..0.5);
                data.push((-center * center / 8.0).exp() * rng.gen_range(0.5..1.5));
            }
        }
    }
    let surface = RawArray::new_3d(samples, ENERGY_BINS, raw_channels, data);
    let targets = RawArray::new_1d((0..samples).map(|_| rng.gen_range(-3.0..1.0)).collect());
    write_container(&path, &surface, &targets, None)?;

    println!("wrote {samples} samples to {}", path.display());
    Ok(())
}
