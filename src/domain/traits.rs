// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// Traits are Rust's way of defining shared behaviour —
// similar to interfaces in Java or abstract classes in Python.
//
// By programming against traits instead of concrete types,
// we can swap implementations without changing the code
// that uses them. For example:
//   - CsvRatingLoader implements RatingSource
//   - A future ParquetLoader could also implement RatingSource
//   - The application layer only sees RatingSource
//     and works with both without any changes
//
// This is the Dependency Inversion Principle from SOLID,
// applied using Rust's trait system.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)
//            Rust Book §17 (Object Oriented Patterns)

use anyhow::Result;
use crate::domain::rating::Rating;

// ─── RatingSource ─────────────────────────────────────────────────────────────
/// Any component that can load rating records from a source.
///
/// Implementations:
///   - CsvRatingLoader → loads from a MovieLens ratings.csv
///   - (future) ParquetLoader → loads from Parquet files
///   - (future) DbLoader → loads from a ratings table
pub trait RatingSource {
    /// Load all available ratings from this source.
    /// Returns a Vec of Ratings or an error.
    fn load_all(&self) -> Result<Vec<Rating>>;
}

// ─── RatingPredictor ──────────────────────────────────────────────────────────
/// Any component that can predict the rating a user would give a movie.
///
/// Implementations:
///   - Predictor → uses the trained NCF model
///   - (future) MeanBaseline → uses per-movie average ratings
pub trait RatingPredictor {
    /// Predict the star rating (on the original 0-5 scale) the
    /// given user would assign the given movie. Both IDs are the
    /// raw MovieLens identifiers; unknown IDs are an error.
    fn predict(&self, user_id: u32, movie_id: u32) -> Result<f32>;
}
