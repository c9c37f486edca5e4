// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly — only this one
// and the data batcher/dataset glue in Layer 4.
//
// What's in this layer:
//
//   model.rs     — The NCF architecture
//                  • User embedding table
//                  • Movie embedding table
//                  • Flatten + concatenate
//                  • Two dense layers (ReLU) with dropout
//                  • Single sigmoid output in [0, 1]
//
//   trainer.rs   — The training loop
//                  Handles forward pass, MSE loss, backward
//                  pass, Adam step, early stopping on holdout
//                  loss, and best-checkpoint saving
//
//   predictor.rs — The inference engine
//                  Loads the best checkpoint plus the fitted
//                  ID encoders, predicts single ratings and
//                  scores whole movie catalogues for top-k
//                  recommendations
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            He et al. (2017) Neural Collaborative Filtering

/// NCF model architecture (embeddings + dense stack)
pub mod model;

/// Full training loop with early stopping and checkpointing
pub mod trainer;

/// Inference engine — loads checkpoint and predicts ratings
pub mod predictor;
