use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One fully encoded training sample: dense indices ready for
/// embedding lookup, plus the normalized rating target in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingSample {
    pub user_idx:  usize,
    pub movie_idx: usize,
    pub target:    f32,
}

pub struct RatingDataset {
    samples: Vec<RatingSample>,
}

impl RatingDataset {
    pub fn new(samples: Vec<RatingSample>) -> Self { Self { samples } }
}

impl Dataset<RatingSample> for RatingDataset {
    fn get(&self, index: usize) -> Option<RatingSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
