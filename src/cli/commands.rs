// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `train`, `predict`, `recommend`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

/// The three top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the NCF model on a MovieLens ratings CSV
    Train(TrainArgs),

    /// Predict the rating a user would give a movie
    Predict(PredictArgs),

    /// Recommend the top-k unrated movies for a user
    Recommend(RecommendArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    /// Path to the ratings CSV (columns: userId,movieId,rating,timestamp)
    #[arg(long, default_value = "data/ratings.csv")]
    pub ratings_csv: String,

    /// Directory to save model checkpoints and ID encoders
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Maximum number of full passes through the training data.
    /// Early stopping usually halts the run before this is reached.
    #[arg(long, default_value_t = 20)]
    pub epochs: usize,

    /// Number of (user, movie) pairs processed together in one forward pass
    #[arg(long, default_value_t = 256)]
    pub batch_size: usize,

    /// How fast the model learns — too high causes instability,
    /// too low causes slow convergence
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Width of the learned user and movie embedding vectors.
    /// Each user and each movie is represented as a vector of this size.
    #[arg(long, default_value_t = 32)]
    pub embedding_dim: usize,

    /// Width of the first dense layer (after the embeddings are concatenated)
    #[arg(long, default_value_t = 128)]
    pub hidden1: usize,

    /// Width of the second dense layer
    #[arg(long, default_value_t = 32)]
    pub hidden2: usize,

    /// Dropout probability — randomly zeroes activations during training
    /// to prevent overfitting
    #[arg(long, default_value_t = 0.2)]
    pub dropout: f64,

    /// Early stopping patience: number of epochs the holdout loss may
    /// fail to improve before training halts
    #[arg(long, default_value_t = 3)]
    pub patience: usize,

    /// Proportion of ratings used for training, e.g. 0.8 = 80%.
    /// The remainder is held out for validation and final metrics.
    #[arg(long, default_value_t = 0.8)]
    pub train_fraction: f64,

    /// Seed for the training data loader shuffle
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            ratings_csv:    a.ratings_csv,
            checkpoint_dir: a.checkpoint_dir,
            epochs:         a.epochs,
            batch_size:     a.batch_size,
            lr:             a.lr,
            embedding_dim:  a.embedding_dim,
            hidden1:        a.hidden1,
            hidden2:        a.hidden2,
            dropout:        a.dropout,
            patience:       a.patience,
            train_fraction: a.train_fraction,
            seed:           a.seed,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    /// The raw MovieLens user ID (as it appears in the CSV)
    #[arg(long)]
    pub user: u32,

    /// The raw MovieLens movie ID (as it appears in the CSV)
    #[arg(long)]
    pub movie: u32,

    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}

/// All arguments for the `recommend` command
#[derive(Args, Debug, Clone)]
pub struct RecommendArgs {
    /// The raw MovieLens user ID to recommend for
    #[arg(long)]
    pub user: u32,

    /// How many movies to recommend
    #[arg(long, default_value_t = 10)]
    pub top_k: usize,

    /// Path to the ratings CSV — used to exclude movies
    /// the user has already rated
    #[arg(long, default_value = "data/ratings.csv")]
    pub ratings_csv: String,

    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}
