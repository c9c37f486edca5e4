// ============================================================
// Layer 2 — Predict Use Case
// ============================================================
// Serves a trained checkpoint:
//   1. Load the fitted ID encoders      (Layer 6 - infra)
//   2. Rebuild the model from config    (Layer 5 - ml)
//   3. predict:   score one pair
//   4. recommend: score the catalogue, drop already-rated
//      movies, return the top-k

use anyhow::Result;
use std::collections::HashSet;

use crate::data::loader::CsvRatingLoader;
use crate::domain::traits::{RatingPredictor, RatingSource};
use crate::infra::{checkpoint::CheckpointManager, encoder_store::EncoderStore};
use crate::ml::predictor::Predictor;

pub struct PredictUseCase {
    predictor: Predictor,
}

impl PredictUseCase {
    pub fn new(checkpoint_dir: String) -> Result<Self> {
        let encoder_store = EncoderStore::new(&checkpoint_dir);
        let (user_encoder, movie_encoder) = encoder_store.load()?;

        let ckpt      = CheckpointManager::new(&checkpoint_dir);
        let predictor = Predictor::from_checkpoint(&ckpt, user_encoder, movie_encoder)?;

        Ok(Self { predictor })
    }

    /// Predicted star rating for one (user, movie) pair.
    pub fn predict(&self, user_id: u32, movie_id: u32) -> Result<f32> {
        self.predictor.predict(user_id, movie_id)
    }

    /// Top-k movies for a user, excluding everything they already
    /// rated in the given CSV. A missing or unreadable CSV is an
    /// error: recommending movies the user has seen defeats the point.
    pub fn recommend(
        &self,
        user_id:     u32,
        top_k:       usize,
        ratings_csv: &str,
    ) -> Result<Vec<(u32, f32)>> {
        let loader  = CsvRatingLoader::new(ratings_csv);
        let ratings = loader.load_all()?;

        let already_rated: HashSet<u32> = ratings
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.movie_id)
            .collect();

        tracing::info!(
            "User {} has rated {} movies — excluding them from recommendations",
            user_id,
            already_rated.len()
        );

        self.predictor.recommend(user_id, top_k, &already_rated)
    }
}
