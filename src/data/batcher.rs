// ============================================================
// Layer 4 — Rating Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<RatingSample>
// into backend-ready tensors.
//
// What is a Batcher?
//   A Batcher takes a list of individual samples and stacks
//   them into batch tensors. Numeric backends are most
//   efficient when processing many samples at once.
//
// How batching works here:
//   Input:  Vec of N RatingSamples
//   Output: RatingBatch with
//     users   [N, 1] — one ID column per sample (the "sequence"
//                      an embedding layer expects has length 1)
//     movies  [N, 1] — same for movie IDs
//     targets [N]    — normalized ratings
//
// Reference: Burn Book §4 (Batcher)
//            Rust Book §8 (Vectors)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::RatingSample;

// ─── RatingBatch ──────────────────────────────────────────────────────────────
/// A batch of rating samples ready for the model forward pass.
/// All tensors have batch_size as their first dimension.
///
/// B is the Burn Backend (e.g. NdArray, Wgpu) —
/// generic so the same batcher works on any device.
#[derive(Debug, Clone)]
pub struct RatingBatch<B: Backend> {
    /// Encoded user indices — shape: [batch_size, 1]
    pub users: Tensor<B, 2, Int>,

    /// Encoded movie indices — shape: [batch_size, 1]
    pub movies: Tensor<B, 2, Int>,

    /// Normalized rating targets in [0, 1] — shape: [batch_size]
    pub targets: Tensor<B, 1>,
}

// ─── RatingBatcher ────────────────────────────────────────────────────────────
/// The batcher struct — holds the target device so tensors
/// are created on the correct backend device.
#[derive(Clone, Debug)]
pub struct RatingBatcher<B: Backend> {
    /// The device to create tensors on
    pub device: B::Device,
}

impl<B: Backend> RatingBatcher<B> {
    /// Create a new batcher for the given device
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

// ─── Burn Batcher Trait Implementation ────────────────────────────────────────
// This is what makes RatingBatcher work with Burn's DataLoader.
// The DataLoader calls .batch(items) with each mini-batch of samples.
impl<B: Backend> Batcher<RatingSample, RatingBatch<B>> for RatingBatcher<B> {
    fn batch(&self, items: Vec<RatingSample>) -> RatingBatch<B> {
        let batch_size = items.len();

        // Burn uses i32 slices as the input for Int tensors
        let user_ids: Vec<i32> = items.iter().map(|s| s.user_idx as i32).collect();
        let movie_ids: Vec<i32> = items.iter().map(|s| s.movie_idx as i32).collect();
        let targets: Vec<f32> = items.iter().map(|s| s.target).collect();

        // Embedding layers expect [batch, seq_len]; each sample is a
        // single ID, so the sequence dimension is 1
        let users = Tensor::<B, 1, Int>::from_ints(
            user_ids.as_slice(), &self.device
        ).reshape([batch_size, 1]);

        let movies = Tensor::<B, 1, Int>::from_ints(
            movie_ids.as_slice(), &self.device
        ).reshape([batch_size, 1]);

        let targets = Tensor::<B, 1>::from_floats(
            targets.as_slice(), &self.device
        );

        RatingBatch { users, movies, targets }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_batch_shapes() {
        let device  = burn::backend::ndarray::NdArrayDevice::default();
        let batcher = RatingBatcher::<NdArray>::new(device);

        let items = vec![
            RatingSample { user_idx: 0, movie_idx: 5, target: 0.5 },
            RatingSample { user_idx: 1, movie_idx: 2, target: 1.0 },
            RatingSample { user_idx: 2, movie_idx: 0, target: 0.1 },
        ];

        let batch = batcher.batch(items);
        assert_eq!(batch.users.dims(),   [3, 1]);
        assert_eq!(batch.movies.dims(),  [3, 1]);
        assert_eq!(batch.targets.dims(), [3]);
    }
}
