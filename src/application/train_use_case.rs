// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load ratings CSV          (Layer 4 - data)
//   Step 2: Fit ID encoders           (Layer 4 - data)
//   Step 3: Encode + normalize        (Layer 4 - data)
//   Step 4: Split train/holdout       (Layer 4 - data)
//   Step 5: Build Burn datasets       (Layer 4 - data)
//   Step 6: Save config + encoders    (Layer 6 - infra)
//   Step 7: Run training loop         (Layer 5 - ml)
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::{RatingDataset, RatingSample},
    encoder::IdEncoder,
    loader::CsvRatingLoader,
    splitter::split_train_holdout,
};
use crate::domain::rating::Rating;
use crate::domain::traits::RatingSource;
use crate::infra::{
    checkpoint::CheckpointManager,
    encoder_store::EncoderStore,
    metrics::MetricsLogger,
};
use crate::ml::trainer::run_training;

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Serialisable so it can be saved to disk and reloaded for inference.
// The #[derive(Serialize, Deserialize)] macros from serde handle
// reading/writing this struct to JSON automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub ratings_csv:    String,
    pub checkpoint_dir: String,
    pub epochs:         usize,
    pub batch_size:     usize,
    pub lr:             f64,
    pub embedding_dim:  usize,
    pub hidden1:        usize,
    pub hidden2:        usize,
    pub dropout:        f64,
    pub patience:       usize,
    pub train_fraction: f64,
    pub seed:           u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            ratings_csv:    "data/ratings.csv".to_string(),
            checkpoint_dir: "checkpoints".to_string(),
            epochs:         20,
            batch_size:     256,
            lr:             1e-3,
            embedding_dim:  32,
            hidden1:        128,
            hidden2:        32,
            dropout:        0.2,
            patience:       3,
            train_fraction: 0.8,
            seed:           42,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
// Owns the config and runs the full training pipeline.
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    /// Create a new TrainUseCase with the given configuration
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Load the ratings CSV ──────────────────────────────────────
        tracing::info!("Loading ratings from '{}'", cfg.ratings_csv);
        let loader  = CsvRatingLoader::new(&cfg.ratings_csv);
        let ratings = loader.load_all()?;
        if ratings.is_empty() {
            bail!("'{}' contains no usable ratings", cfg.ratings_csv);
        }

        // ── Step 2: Fit the ID encoders ───────────────────────────────────────
        // Sparse MovieLens IDs become contiguous embedding row indices.
        // One encoder per ID space, fitted over the full file so every
        // rating (train or holdout) has a row.
        let user_encoder  = IdEncoder::fit(ratings.iter().map(|r| r.user_id));
        let movie_encoder = IdEncoder::fit(ratings.iter().map(|r| r.movie_id));
        tracing::info!(
            "Encoded {} distinct users and {} distinct movies",
            user_encoder.len(),
            movie_encoder.len()
        );

        // ── Step 3: Encode records and normalize targets ──────────────────────
        let samples = encode_samples(&ratings, &user_encoder, &movie_encoder);
        tracing::info!("Built {} training samples", samples.len());

        // ── Step 4: Train / holdout split (80/20) ─────────────────────────────
        // Shuffle and split so the model is evaluated on unseen data
        let (train_samples, holdout_samples) =
            split_train_holdout(samples, cfg.train_fraction);
        tracing::info!(
            "Split: {} train, {} holdout",
            train_samples.len(),
            holdout_samples.len()
        );
        if holdout_samples.is_empty() {
            bail!("Holdout split is empty — lower --train-fraction or add more ratings");
        }

        // ── Step 5: Build Burn datasets ───────────────────────────────────────
        // RatingDataset implements Burn's Dataset trait so the DataLoader
        // can call .get(index) and .len() on it
        let train_dataset   = RatingDataset::new(train_samples);
        let holdout_dataset = RatingDataset::new(holdout_samples);

        // ── Step 6: Persist config and encoders for inference ─────────────────
        // The predictor needs the architecture AND the exact ID mapping
        // to rebuild the model and address its embedding rows
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        ckpt_manager.save_config(cfg)?;

        let encoder_store = EncoderStore::new(&cfg.checkpoint_dir);
        encoder_store.save(&user_encoder, &movie_encoder)?;

        let metrics_logger = MetricsLogger::new(&cfg.checkpoint_dir)?;

        // ── Step 7: Run training loop (Layer 5) ───────────────────────────────
        run_training(
            cfg,
            user_encoder.len(),
            movie_encoder.len(),
            train_dataset,
            holdout_dataset,
            ckpt_manager,
            metrics_logger,
        )?;

        Ok(())
    }
}

// ─── Sample Encoding ──────────────────────────────────────────────────────────
/// Turn raw ratings into encoded samples with normalized targets.
/// The encoders were fitted over these exact records, so every ID
/// encodes; filter_map is just belt-and-braces against a mismatch.
fn encode_samples(
    ratings:       &[Rating],
    user_encoder:  &IdEncoder,
    movie_encoder: &IdEncoder,
) -> Vec<RatingSample> {
    ratings
        .iter()
        .filter_map(|r| {
            let user_idx  = user_encoder.encode(r.user_id)?;
            let movie_idx = movie_encoder.encode(r.movie_id)?;
            Some(RatingSample {
                user_idx,
                movie_idx,
                target: r.normalized(),
            })
        })
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_samples_maps_ids_and_normalizes() {
        let ratings = vec![
            Rating::new(10, 200, 5.0, 0),
            Rating::new(20, 100, 2.5, 0),
            Rating::new(10, 100, 1.0, 0),
        ];
        let users  = IdEncoder::fit(ratings.iter().map(|r| r.user_id));
        let movies = IdEncoder::fit(ratings.iter().map(|r| r.movie_id));

        let samples = encode_samples(&ratings, &users, &movies);

        assert_eq!(samples.len(), 3);
        // User 10 was seen first → index 0; movie 100 second → index 1
        assert_eq!(samples[0].user_idx,  0);
        assert_eq!(samples[0].movie_idx, 0);
        assert_eq!(samples[0].target,    1.0);
        assert_eq!(samples[2].user_idx,  0);
        assert_eq!(samples[2].movie_idx, 1);
        assert_eq!(samples[2].target,    0.2);
    }

    #[test]
    fn test_default_config_matches_cli_defaults() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.train_fraction, 0.8);
        assert_eq!(cfg.patience, 3);
        assert_eq!(cfg.embedding_dim, 32);
    }
}
