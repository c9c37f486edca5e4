// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Three commands are supported:
//   1. `train`     — trains the NCF model on a MovieLens ratings CSV
//   2. `predict`   — loads a checkpoint and predicts one user-movie rating
//   3. `recommend` — loads a checkpoint and prints top-k movies for a user
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, TrainArgs, PredictArgs, RecommendArgs};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "movielens-ncf",
    version = "0.1.0",
    about = "Train a neural collaborative filtering model on MovieLens ratings, then predict and recommend."
)]
pub struct Cli {
    /// The subcommand to run (train, predict or recommend)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match &self.command {
            Commands::Train(args)     => self.run_train(args.clone()),
            Commands::Predict(args)   => self.run_predict(args.clone()),
            Commands::Recommend(args) => self.run_recommend(args.clone()),
        }
    }

    /// Handles the `train` subcommand.
    /// Converts CLI args into a TrainConfig and hands off to Layer 2.
    fn run_train(&self, args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting training on ratings in: {}", args.ratings_csv);

        // Convert CLI args → application config (separates presentation from domain)
        let use_case = TrainUseCase::new(args.into());
        use_case.execute()?;

        println!("Training complete. Checkpoint saved.");
        Ok(())
    }

    /// Handles the `predict` subcommand.
    /// Loads the model from checkpoint and prints the predicted rating.
    fn run_predict(&self, args: PredictArgs) -> Result<()> {
        use crate::application::predict_use_case::PredictUseCase;

        let use_case = PredictUseCase::new(args.checkpoint_dir.clone())?;
        let stars    = use_case.predict(args.user, args.movie)?;

        println!(
            "Predicted rating for user {} on movie {}: {:.2} stars",
            args.user, args.movie, stars
        );
        Ok(())
    }

    /// Handles the `recommend` subcommand.
    /// Scores every known movie for the user and prints the top-k
    /// the user has not already rated.
    fn run_recommend(&self, args: RecommendArgs) -> Result<()> {
        use crate::application::predict_use_case::PredictUseCase;

        let use_case = PredictUseCase::new(args.checkpoint_dir.clone())?;
        let recs     = use_case.recommend(args.user, args.top_k, &args.ratings_csv)?;

        if recs.is_empty() {
            println!("No unrated movies left to recommend for user {}.", args.user);
            return Ok(());
        }

        println!("Top {} recommendations for user {}:", recs.len(), args.user);
        for (rank, (movie_id, stars)) in recs.iter().enumerate() {
            println!("{:>3}. movie {:<8} predicted {:.2} stars", rank + 1, movie_id, stars);
        }
        Ok(())
    }
}
