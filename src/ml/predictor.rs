// ============================================================
// Layer 5 — Predictor (Inference Engine)
// ============================================================
// Loads the best checkpoint plus the fitted ID encoders and
// serves predictions on the plain (non-autodiff) backend.
//
// Two operations:
//   predict   — score a single (user, movie) pair
//   recommend — score the whole movie catalogue for one user
//               in a single batched forward pass, then return
//               the top-k by predicted rating
//
// Raw MovieLens IDs come in, star ratings come out. All the
// encoding/decoding between raw IDs and embedding rows happens
// here so callers never see dense indices.

use anyhow::{anyhow, Result};
use burn::prelude::*;
use std::collections::HashSet;

use crate::data::encoder::IdEncoder;
use crate::domain::rating::RATING_SCALE;
use crate::domain::traits::RatingPredictor;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{NcfConfig, NcfModel};

type MyInnerBackend = burn::backend::NdArray;

pub struct Predictor {
    model:         NcfModel<MyInnerBackend>,
    user_encoder:  IdEncoder,
    movie_encoder: IdEncoder,
    device:        burn::backend::ndarray::NdArrayDevice,
}

impl Predictor {
    /// Rebuild the trained model from a checkpoint directory.
    ///
    /// The architecture comes from the saved train config, the
    /// embedding table sizes from the encoder cardinalities, and
    /// the weights from the best saved checkpoint.
    pub fn from_checkpoint(
        ckpt:          &CheckpointManager,
        user_encoder:  IdEncoder,
        movie_encoder: IdEncoder,
    ) -> Result<Self> {
        let cfg    = ckpt.load_config()?;
        let device = burn::backend::ndarray::NdArrayDevice::default();

        let model_cfg = NcfConfig::new(
            user_encoder.len(), movie_encoder.len(),
            cfg.embedding_dim, cfg.hidden1, cfg.hidden2, cfg.dropout,
        );
        let model = ckpt.load_model(model_cfg.init(&device), &device)?;

        Ok(Self { model, user_encoder, movie_encoder, device })
    }

    /// Score an already-encoded batch of (user, movie) index pairs.
    /// Returns predictions on the normalized [0, 1] scale.
    fn score(&self, user_indices: &[i32], movie_indices: &[i32]) -> Result<Vec<f32>> {
        let n = user_indices.len();

        let users = Tensor::<MyInnerBackend, 1, Int>::from_ints(
            user_indices, &self.device
        ).reshape([n, 1]);
        let movies = Tensor::<MyInnerBackend, 1, Int>::from_ints(
            movie_indices, &self.device
        ).reshape([n, 1]);

        self.model
            .forward(users, movies)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("Cannot read predictions from tensor: {e:?}"))
    }

    /// Score every movie the model knows for one user, skip the ones
    /// in `exclude` (already rated), and return the k best as
    /// (raw movie ID, predicted stars) in descending order.
    pub fn recommend(
        &self,
        user_id: u32,
        k:       usize,
        exclude: &HashSet<u32>,
    ) -> Result<Vec<(u32, f32)>> {
        let user_idx = self.user_encoder.encode(user_id).ok_or_else(|| {
            anyhow!("User {} was not seen during training", user_id)
        })? as i32;

        // Every embedding row that decodes to an unrated movie
        let mut candidates: Vec<(usize, u32)> = Vec::new();
        for idx in 0..self.movie_encoder.len() {
            if let Some(movie_id) = self.movie_encoder.decode(idx) {
                if !exclude.contains(&movie_id) {
                    candidates.push((idx, movie_id));
                }
            }
        }

        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        // One batched forward pass over the whole candidate set
        let user_indices: Vec<i32>  = vec![user_idx; candidates.len()];
        let movie_indices: Vec<i32> = candidates.iter().map(|(idx, _)| *idx as i32).collect();
        let scores = self.score(&user_indices, &movie_indices)?;

        let mut ranked: Vec<(u32, f32)> = candidates
            .iter()
            .zip(scores.iter())
            .map(|((_, movie_id), score)| (*movie_id, score * RATING_SCALE))
            .collect();

        // Highest predicted rating first; NaN cannot occur after sigmoid
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(k);

        Ok(ranked)
    }
}

impl RatingPredictor for Predictor {
    fn predict(&self, user_id: u32, movie_id: u32) -> Result<f32> {
        let user_idx = self.user_encoder.encode(user_id).ok_or_else(|| {
            anyhow!("User {} was not seen during training", user_id)
        })? as i32;
        let movie_idx = self.movie_encoder.encode(movie_id).ok_or_else(|| {
            anyhow!("Movie {} was not seen during training", movie_id)
        })? as i32;

        let scores = self.score(&[user_idx], &[movie_idx])?;
        let normalized = scores
            .first()
            .copied()
            .ok_or_else(|| anyhow!("Model returned no prediction"))?;

        tracing::debug!(
            "predict(user={}, movie={}) -> {:.4} normalized",
            user_id, movie_id, normalized
        );

        Ok(normalized * RATING_SCALE)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
// These go through the full persistence round-trip: config, encoders
// and a checkpoint are written to a temp directory, then the predictor
// is rebuilt from disk exactly as the `predict` command would do it.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainConfig;
    use crate::infra::encoder_store::EncoderStore;

    type TestAutodiff = burn::backend::Autodiff<burn::backend::NdArray>;

    /// Write config, encoders and an (untrained) checkpoint to `dir`,
    /// then rebuild a Predictor from those files alone.
    fn predictor_from_dir(dir: &str) -> Predictor {
        let cfg = TrainConfig {
            checkpoint_dir: dir.to_string(),
            embedding_dim:  4,
            hidden1:        8,
            hidden2:        4,
            ..TrainConfig::default()
        };

        let users  = IdEncoder::fit([5, 9]);
        let movies = IdEncoder::fit([31, 1029, 50]);

        let ckpt = CheckpointManager::new(dir);
        ckpt.save_config(&cfg).unwrap();

        let store = EncoderStore::new(dir);
        store.save(&users, &movies).unwrap();

        let device = burn::backend::ndarray::NdArrayDevice::default();
        let model: crate::ml::model::NcfModel<TestAutodiff> = NcfConfig::new(
            users.len(), movies.len(),
            cfg.embedding_dim, cfg.hidden1, cfg.hidden2, cfg.dropout,
        ).init(&device);
        ckpt.save_model(&model, 1).unwrap();

        let (users, movies) = store.load().unwrap();
        Predictor::from_checkpoint(&ckpt, users, movies).unwrap()
    }

    #[test]
    fn test_unknown_ids_error_instead_of_panic() {
        let tmp       = tempfile::tempdir().unwrap();
        let predictor = predictor_from_dir(tmp.path().to_str().unwrap());

        // User 999 and movie 999 were never fitted — no embedding row
        assert!(predictor.predict(999, 31).is_err());
        assert!(predictor.predict(5, 999).is_err());
        assert!(predictor.recommend(999, 10, &HashSet::new()).is_err());
    }

    #[test]
    fn test_known_pair_predicts_in_star_range() {
        let tmp       = tempfile::tempdir().unwrap();
        let predictor = predictor_from_dir(tmp.path().to_str().unwrap());

        let stars = predictor.predict(5, 1029).unwrap();
        // Sigmoid output times the scale stays inside (0, 5]
        assert!(stars > 0.0 && stars <= RATING_SCALE);
    }

    #[test]
    fn test_recommend_excludes_rated_movies() {
        let tmp       = tempfile::tempdir().unwrap();
        let predictor = predictor_from_dir(tmp.path().to_str().unwrap());

        let rated: HashSet<u32> = [31].into_iter().collect();
        let recs = predictor.recommend(9, 10, &rated).unwrap();

        // Only the two unrated movies can come back, best first
        assert_eq!(recs.len(), 2);
        assert!(recs.iter().all(|(movie_id, _)| *movie_id != 31));
        assert!(recs[0].1 >= recs[1].1);
        assert!(recs.iter().all(|(_, stars)| *stars > 0.0 && *stars <= RATING_SCALE));
    }
}
