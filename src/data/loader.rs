// ============================================================
// Layer 4 — Ratings Loader
// ============================================================
// Loads rating records from a MovieLens CSV file using the
// csv crate with serde deserialization.
//
// The expected file layout (MovieLens "latest" format):
//
//   userId,movieId,rating,timestamp
//   1,31,2.5,1260759144
//   1,1029,3.0,1260759179
//   ...
//
// serde handles the column-to-field mapping; the #[serde(rename)]
// attributes bridge the camelCase headers to snake_case fields.
//
// A malformed row (wrong column count, unparseable number) is
// logged and skipped rather than aborting the whole run — one
// bad line in a 25-million-row file should not kill training.
// A missing file IS an error: there is nothing to train on.
//
// Reference: csv crate documentation (Reader::deserialize)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::domain::rating::Rating;
use crate::domain::traits::RatingSource;

/// One raw CSV row as serde sees it.
/// Kept private — the rest of the crate only sees domain Ratings.
#[derive(Debug, Deserialize)]
struct RatingRow {
    #[serde(rename = "userId")]
    user_id: u32,

    #[serde(rename = "movieId")]
    movie_id: u32,

    rating: f32,

    timestamp: i64,
}

/// Loads all ratings from a single CSV file.
/// Implements the RatingSource trait from Layer 3.
pub struct CsvRatingLoader {
    /// Path to the ratings CSV file
    path: String,
}

impl CsvRatingLoader {
    /// Create a new CsvRatingLoader pointed at a file
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Implement the RatingSource trait so the application layer
/// can call load_all() without knowing about CSV internals
impl RatingSource for CsvRatingLoader {
    fn load_all(&self) -> Result<Vec<Rating>> {
        let path = Path::new(&self.path);

        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Cannot open ratings file '{}'", self.path))?;

        let mut ratings = Vec::new();
        let mut skipped = 0usize;

        for (line, row) in reader.deserialize::<RatingRow>().enumerate() {
            match row {
                Ok(r) => {
                    let rating = Rating::new(r.user_id, r.movie_id, r.rating, r.timestamp);

                    // Star values outside (0, 5] are corrupt data
                    if !rating.is_in_range() {
                        tracing::warn!(
                            "Skipping row {}: rating {} out of range",
                            line + 2, // +2: 1-based and past the header
                            rating.rating
                        );
                        skipped += 1;
                        continue;
                    }

                    ratings.push(rating);
                }
                // Log a warning but continue — don't fail on one bad row
                Err(e) => {
                    tracing::warn!("Skipping malformed row {}: {}", line + 2, e);
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            tracing::warn!("Skipped {} malformed rows in '{}'", skipped, self.path);
        }
        tracing::info!("Loaded {} ratings from '{}'", ratings.len(), self.path);

        Ok(ratings)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_loads_valid_rows() {
        let f = write_csv(
            "userId,movieId,rating,timestamp\n\
             1,31,2.5,1260759144\n\
             2,1029,3.0,1260759179\n",
        );
        let loader  = CsvRatingLoader::new(f.path().to_str().unwrap());
        let ratings = loader.load_all().unwrap();

        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[0], Rating::new(1, 31, 2.5, 1260759144));
        assert_eq!(ratings[1].movie_id, 1029);
    }

    #[test]
    fn test_skips_malformed_rows() {
        let f = write_csv(
            "userId,movieId,rating,timestamp\n\
             1,31,2.5,1260759144\n\
             not,a,valid,row\n\
             2,50,4.0,1260759200\n",
        );
        let loader  = CsvRatingLoader::new(f.path().to_str().unwrap());
        let ratings = loader.load_all().unwrap();

        // The bad row is dropped, the good ones survive
        assert_eq!(ratings.len(), 2);
    }

    #[test]
    fn test_skips_out_of_range_ratings() {
        let f = write_csv(
            "userId,movieId,rating,timestamp\n\
             1,31,9.5,1260759144\n\
             1,32,4.5,1260759150\n",
        );
        let loader  = CsvRatingLoader::new(f.path().to_str().unwrap());
        let ratings = loader.load_all().unwrap();

        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings[0].movie_id, 32);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let loader = CsvRatingLoader::new("does/not/exist.csv");
        assert!(loader.load_all().is_err());
    }
}
