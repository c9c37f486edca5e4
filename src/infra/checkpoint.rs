// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder.
//
// What gets saved per checkpoint:
//   1. Model weights (.mpk.gz file) — all learned parameters
//   2. best_epoch.json              — which epoch holds the best weights
//   3. train_config.json            — model hyperparameters
//
// Why save the config separately?
//   When loading for inference, we need to know the exact
//   architecture (embedding_dim, hidden sizes, etc.) to rebuild
//   the model before loading the weights into it.
//   Without the config, we can't reconstruct the model.
//
// Why a "best" pointer instead of "latest"?
//   The trainer only writes a checkpoint when the holdout loss
//   improves. best_epoch.json therefore always names the file
//   with the best-seen weights, which is what early stopping
//   restores and what inference should use.
//
// Burn's CompactRecorder:
//   - Serialises model parameters to MessagePack format
//   - Compresses with gzip for smaller file size
//   - Type-safe: loading fails if architecture doesn't match
//
// File naming convention:
//   checkpoints/
//     model_epoch_1.mpk.gz   ← weights after epoch 1
//     model_epoch_4.mpk.gz   ← weights after epoch 4
//     ...
//     best_epoch.json        ← number of the best epoch
//     train_config.json      ← model hyperparameters
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::NcfModel;

/// Manages saving and loading of model checkpoints.
/// All files are stored in the configured directory.
pub struct CheckpointManager {
    /// Path to the directory where checkpoints are stored
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager.
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl Into<String>) -> Self {
        let dir = PathBuf::from(dir.into());
        // create_dir_all creates parent directories too, like `mkdir -p`
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    /// Save model weights for a given epoch and point
    /// best_epoch.json at it. The trainer calls this only on
    /// holdout-loss improvement.
    pub fn save_model<B: AutodiffBackend>(
        &self,
        model: &NcfModel<B>,
        epoch: usize,
    ) -> Result<()> {
        // Build the file path (without extension — recorder adds it)
        let path = self.dir.join(format!("model_epoch_{epoch}"));

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| {
                format!("Failed to save checkpoint to '{}'", path.display())
            })?;

        // Update the best epoch pointer
        let best_path = self.dir.join("best_epoch.json");
        fs::write(&best_path, serde_json::to_string(&epoch)?)
            .with_context(|| "Failed to write best_epoch.json")?;

        tracing::debug!("Saved checkpoint: epoch {}", epoch);
        Ok(())
    }

    /// Load model weights from the best saved checkpoint.
    ///
    /// The model parameter must have the correct architecture
    /// (matching the saved checkpoint) or loading will fail.
    pub fn load_model<B: Backend>(
        &self,
        model:  NcfModel<B>,
        device: &B::Device,
    ) -> Result<NcfModel<B>> {
        let epoch = self.best_epoch()?;
        let path  = self.dir.join(format!("model_epoch_{epoch}"));

        tracing::info!("Loading checkpoint from epoch {}", epoch);

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load checkpoint '{}'. Have you trained the model first?",
                    path.display())
            })?;

        // load_record() returns a new model with the loaded weights
        Ok(model.load_record(record))
    }

    /// Save the training configuration to JSON.
    ///
    /// This must be called before training starts so inference
    /// can reconstruct the exact model architecture.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join("train_config.json");

        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| {
                format!("Cannot write config to '{}'", path.display())
            })?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Load the training configuration from JSON.
    ///
    /// Called by the Predictor to know what model architecture
    /// was used during training so it can rebuild the same model.
    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join("train_config.json");

        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read config from '{}'. \
                     Make sure you have run 'train' before 'predict'.",
                    path.display()
                )
            })?;

        Ok(serde_json::from_str(&json)?)
    }

    /// Read best_epoch.json and return the epoch number.
    /// Returns an error if training hasn't been run yet.
    fn best_epoch(&self) -> Result<usize> {
        let path = self.dir.join("best_epoch.json");

        let s = fs::read_to_string(&path)
            .with_context(|| {
                "Cannot find 'best_epoch.json'. \
                 Have you run 'train' first?"
            })?;

        Ok(serde_json::from_str::<usize>(&s)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip() {
        let tmp  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(tmp.path().to_str().unwrap());

        let cfg = TrainConfig {
            embedding_dim: 16,
            hidden1: 64,
            ..TrainConfig::default()
        };
        ckpt.save_config(&cfg).unwrap();

        let loaded = ckpt.load_config().unwrap();
        assert_eq!(loaded.embedding_dim, 16);
        assert_eq!(loaded.hidden1, 64);
        assert_eq!(loaded.epochs, cfg.epochs);
    }

    #[test]
    fn test_missing_config_is_a_clear_error() {
        let tmp  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(tmp.path().to_str().unwrap());
        assert!(ckpt.load_config().is_err());
    }

    #[test]
    fn test_missing_best_epoch_is_an_error() {
        let tmp  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(tmp.path().to_str().unwrap());
        assert!(ckpt.best_epoch().is_err());
    }
}
