// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full train + holdout loop using Burn's DataLoader and Adam,
// with early stopping on the holdout loss.
//
// Key Burn backend insight:
//   - Training uses MyBackend (Autodiff<NdArray>) for gradients
//   - model.valid() returns the model on MyInnerBackend (NdArray)
//   - The holdout batcher must also use MyInnerBackend
//   - Dropout is inert on the inner backend, so holdout
//     evaluation is deterministic
//
// Early stopping policy:
//   A checkpoint is written only when the holdout loss improves,
//   so the checkpoint on disk is always the best-seen weights.
//   After `patience` epochs without improvement the loop halts and
//   the best checkpoint is reloaded for the final test metrics —
//   the weights from the overfit tail epochs are never reported.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};
use std::sync::Arc;

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::{RatingBatch, RatingBatcher}, dataset::RatingDataset};
use crate::domain::rating::RATING_SCALE;
use crate::infra::{checkpoint::CheckpointManager, metrics::{EpochMetrics, MetricsLogger}};
use crate::ml::model::{NcfConfig, NcfModel};

type MyBackend      = burn::backend::Autodiff<burn::backend::NdArray>;
type MyInnerBackend = burn::backend::NdArray;

// ─── Early Stopping ───────────────────────────────────────────────────────────
/// Bookkeeping for the holdout-loss plateau detector.
/// Pure arithmetic, no tensors — trivially unit testable.
pub struct EarlyStopping {
    patience:   usize,
    best_loss:  f64,
    best_epoch: usize,
    stale:      usize,
}

impl EarlyStopping {
    pub fn new(patience: usize) -> Self {
        Self {
            patience,
            best_loss:  f64::INFINITY,
            best_epoch: 0,
            stale:      0,
        }
    }

    /// Record one epoch's holdout loss.
    /// Returns true if this epoch improved on the best seen so far.
    pub fn observe(&mut self, epoch: usize, holdout_loss: f64) -> bool {
        if holdout_loss < self.best_loss {
            self.best_loss  = holdout_loss;
            self.best_epoch = epoch;
            self.stale      = 0;
            true
        } else {
            self.stale += 1;
            false
        }
    }

    /// True once the loss has failed to improve for `patience` epochs.
    pub fn should_stop(&self) -> bool {
        self.stale >= self.patience
    }

    pub fn best_epoch(&self) -> usize { self.best_epoch }

    pub fn best_loss(&self) -> f64 { self.best_loss }
}

// ─── Training Entry Point ─────────────────────────────────────────────────────
pub fn run_training(
    cfg:             &TrainConfig,
    num_users:       usize,
    num_movies:      usize,
    train_dataset:   RatingDataset,
    holdout_dataset: RatingDataset,
    ckpt_manager:    CheckpointManager,
    metrics_logger:  MetricsLogger,
) -> Result<()> {
    let device = burn::backend::ndarray::NdArrayDevice::default();
    tracing::info!("Using NdArray device: {:?}", device);

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = NcfConfig::new(
        num_users, num_movies,
        cfg.embedding_dim, cfg.hidden1, cfg.hidden2, cfg.dropout,
    );
    let mut model: NcfModel<MyBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: {} users x {} movies, embedding_dim={}",
        num_users, num_movies, cfg.embedding_dim
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let optim_cfg = AdamConfig::new().with_epsilon(1e-8);
    let mut optim = optim_cfg.init();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_batcher = RatingBatcher::<MyBackend>::new(device.clone());
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    // ── Holdout data loader (InnerBackend — no autodiff overhead) ─────────────
    let holdout_batcher = RatingBatcher::<MyInnerBackend>::new(device.clone());
    let holdout_loader  = DataLoaderBuilder::new(holdout_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(holdout_dataset);

    let mut early = EarlyStopping::new(cfg.patience);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_batches  = 0usize;

        for batch in train_loader.iter() {
            let (loss, _) = model.forward_loss(
                batch.users,
                batch.movies,
                batch.targets,
            );

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            train_loss_sum += loss_val;
            train_batches  += 1;

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let avg_train_loss = if train_batches > 0 {
            train_loss_sum / train_batches as f64
        } else { f64::NAN };

        // ── Holdout phase ─────────────────────────────────────────────────────
        // model.valid() → NcfModel<MyInnerBackend>, dropout inert
        let model_valid = model.valid();
        let (holdout_loss, holdout_rmse) = evaluate(&model_valid, &holdout_loader);

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4} | val_rmse={:.4} stars",
            epoch, cfg.epochs, avg_train_loss, holdout_loss, holdout_rmse,
        );

        metrics_logger.log(&EpochMetrics::new(
            epoch, avg_train_loss, holdout_loss, holdout_rmse,
        ))?;

        // ── Early stopping bookkeeping ────────────────────────────────────────
        if early.observe(epoch, holdout_loss) {
            // Only improving epochs reach disk, so the saved
            // checkpoint is always the best-seen weights
            ckpt_manager.save_model(&model, epoch)?;
            tracing::info!("Checkpoint saved for epoch {} (new best)", epoch);
        } else if early.should_stop() {
            tracing::info!(
                "Holdout loss has not improved for {} epochs — stopping early",
                cfg.patience
            );
            break;
        }
    }

    // ── Final test metrics on the best-seen weights ───────────────────────────
    // Reload the best checkpoint rather than evaluating whatever the
    // last epoch left in memory.
    let best_model: NcfModel<MyInnerBackend> =
        ckpt_manager.load_model(model_cfg.init(&device), &device)?;
    let (test_loss, test_rmse) = evaluate(&best_model, &holdout_loader);

    println!(
        "Best epoch {} | test_loss={:.4} | test_rmse={:.4} stars",
        early.best_epoch(), test_loss, test_rmse,
    );

    tracing::info!("Training complete!");
    Ok(())
}

/// Run the model over a loader and return (mean MSE on the normalized
/// scale, RMSE on the original star scale).
///
/// The squared error is accumulated per sample rather than averaged
/// per batch, so a smaller final batch does not skew the RMSE.
fn evaluate(
    model:  &NcfModel<MyInnerBackend>,
    loader: &Arc<dyn DataLoader<RatingBatch<MyInnerBackend>>>,
) -> (f64, f64) {
    let mut loss_sum      = 0.0f64;
    let mut batches       = 0usize;
    let mut sq_error_sum  = 0.0f64;
    let mut total_samples = 0usize;

    for batch in loader.iter() {
        let batch_size = batch.targets.dims()[0];

        let (loss, _) = model.forward_loss(
            batch.users,
            batch.movies,
            batch.targets,
        );
        let batch_mse: f64 = loss.into_scalar().elem::<f64>();

        loss_sum      += batch_mse;
        batches       += 1;
        sq_error_sum  += batch_mse * batch_size as f64;
        total_samples += batch_size;
    }

    let avg_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };
    let rmse = if total_samples > 0 {
        (sq_error_sum / total_samples as f64).sqrt() * RATING_SCALE as f64
    } else {
        f64::NAN
    };

    (avg_loss, rmse)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_observation_is_an_improvement() {
        let mut early = EarlyStopping::new(3);
        assert!(early.observe(1, 0.9));
        assert_eq!(early.best_epoch(), 1);
        assert!(!early.should_stop());
    }

    #[test]
    fn test_improvement_resets_patience() {
        let mut early = EarlyStopping::new(2);
        early.observe(1, 0.9);
        early.observe(2, 0.95); // worse, stale = 1
        assert!(early.observe(3, 0.8)); // better, stale resets
        early.observe(4, 0.85); // worse, stale = 1
        assert!(!early.should_stop());
    }

    #[test]
    fn test_stops_after_patience_exhausted() {
        let mut early = EarlyStopping::new(2);
        early.observe(1, 0.9);
        early.observe(2, 0.91);
        assert!(!early.should_stop());
        early.observe(3, 0.92);
        assert!(early.should_stop());
        // The best epoch is still the first one
        assert_eq!(early.best_epoch(), 1);
        assert_eq!(early.best_loss(), 0.9);
    }

    #[test]
    fn test_equal_loss_is_not_an_improvement() {
        let mut early = EarlyStopping::new(1);
        early.observe(1, 0.5);
        assert!(!early.observe(2, 0.5));
        assert!(early.should_stop());
    }
}
