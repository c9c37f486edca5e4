// ============================================================
// Layer 3 — Rating Domain Type
// ============================================================
// Represents one row of the MovieLens ratings file in domain
// terms: a user gave a movie a star rating at some point in
// time. This is the only input the whole pipeline consumes.
//
// The model trains on a normalized target in [0, 1], because
// its output head is a sigmoid. Dividing by the maximum star
// value (5.0) is the constant rescaling used everywhere:
// targets are divided by it before training and predictions
// are multiplied by it before being shown to the user.
//
// Reference: Harper & Konstan (2015) - The MovieLens Datasets
//            Rust Book §5 (Structs)

use serde::{Deserialize, Serialize};

/// MovieLens ratings run from 0.5 to 5.0 stars in half-star steps.
/// Dividing by this constant maps them into (0, 1] for the sigmoid head.
pub const RATING_SCALE: f32 = 5.0;

/// One observed user-movie rating.
///
/// The IDs here are the RAW MovieLens identifiers as they appear
/// in the CSV — sparse and non-contiguous. They must be passed
/// through a fitted IdEncoder before any embedding lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Raw MovieLens user identifier
    pub user_id: u32,

    /// Raw MovieLens movie identifier
    pub movie_id: u32,

    /// The star rating the user gave, in (0, 5]
    pub rating: f32,

    /// Unix timestamp of when the rating was made.
    /// Carried for traceability; the model does not use it.
    pub timestamp: i64,
}

impl Rating {
    /// Create a new Rating
    pub fn new(user_id: u32, movie_id: u32, rating: f32, timestamp: i64) -> Self {
        Self { user_id, movie_id, rating, timestamp }
    }

    /// The rating rescaled into (0, 1] — the training target.
    pub fn normalized(&self) -> f32 {
        self.rating / RATING_SCALE
    }

    /// Whether the star value lies in the range MovieLens produces.
    /// Rows outside this range are corrupt and get skipped at load time.
    pub fn is_in_range(&self) -> bool {
        self.rating > 0.0 && self.rating <= RATING_SCALE
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_maps_five_stars_to_one() {
        let r = Rating::new(1, 2, 5.0, 0);
        assert_eq!(r.normalized(), 1.0);
    }

    #[test]
    fn test_normalized_half_star() {
        let r = Rating::new(1, 2, 2.5, 0);
        assert_eq!(r.normalized(), 0.5);
    }

    #[test]
    fn test_range_check_rejects_zero_and_overflow() {
        assert!(!Rating::new(1, 2, 0.0, 0).is_in_range());
        assert!(!Rating::new(1, 2, 5.5, 0).is_in_range());
        assert!(Rating::new(1, 2, 0.5, 0).is_in_range());
    }
}
