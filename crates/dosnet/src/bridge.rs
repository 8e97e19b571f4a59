//! Tensor bridge: converts between [`DosTensor`] slices and burn tensors.
//!
//! Conv layers want `(batch, channels, bins)`; the dataset stores
//! `(samples, bins, channels)`. The conversion transposes on the fly while
//! gathering the requested sample indices and channel window.

use std::ops::Range;

use burn::prelude::*;
use burn::tensor::TensorData;
use dosdata::DosTensor;

/// Gather `indices` x `channels` from a DOS tensor as a `(batch, ch, bins)` tensor.
///
/// # Panics
/// Panics if the channel range exceeds the tensor's channels or an index is
/// out of bounds.
pub fn dos_to_tensor<B: Backend>(
    dos: &DosTensor,
    indices: &[usize],
    channels: Range<usize>,
    device: &B::Device,
) -> Tensor<B, 3> {
    assert!(channels.end <= dos.channels(), "channel range out of bounds");
    let batch = indices.len();
    let ch = channels.len();
    let bins = dos.bins();

    let mut flat = Vec::with_capacity(batch * ch * bins);
    for &s in indices {
        for c in channels.clone() {
            for b in 0..bins {
                flat.push(dos.get(s, b, c));
            }
        }
    }
    Tensor::from_data(TensorData::new(flat, [batch, ch, bins]), device)
}

/// Build a 1-D target tensor for the given sample indices.
pub fn targets_to_tensor<B: Backend>(
    targets: &[f32],
    indices: &[usize],
    device: &B::Device,
) -> Tensor<B, 1> {
    let gathered: Vec<f32> = indices.iter().map(|&i| targets[i]).collect();
    let len = gathered.len();
    Tensor::from_data(TensorData::new(gathered, [len]), device)
}

/// Extract f32 values from a burn 1-D tensor.
pub fn tensor_to_vec<B: Backend>(tensor: Tensor<B, 1>) -> Vec<f32> {
    tensor.into_data().to_vec::<f32>().unwrap()
}
