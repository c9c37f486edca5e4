// ============================================================
// Layer 4 — Train/Holdout Splitter
// ============================================================
// Randomly shuffles samples and splits them into two sets:
//   - Training set: used to update model weights
//   - Holdout set:  used to measure performance on unseen data
//
// The holdout set does double duty here, matching the usual
// recommender-notebook setup: early stopping monitors its loss
// during training and the final RMSE is reported on it.
//
// Why shuffle before splitting?
//   MovieLens ratings are ordered by user. Without shuffling,
//   the holdout set would contain only the last users in the
//   file, and the model would be evaluated on users it barely
//   trained on. Shuffling gives both sets a representative mix.
//
// Split ratio: 80% training, 20% holdout (configurable)
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom
// which is the standard unbiased shuffle algorithm.
//
// Reference: Rust Book §8 (Vectors)
//            rand crate documentation

use rand::seq::SliceRandom;

/// Randomly shuffle `samples` and split into (train, holdout).
///
/// # Arguments
/// * `samples`        - All available samples (consumed by this function)
/// * `train_fraction` - Proportion for training, e.g. 0.8 = 80%
///
/// # Returns
/// A tuple (train_samples, holdout_samples)
pub fn split_train_holdout<T>(mut samples: Vec<T>, train_fraction: f64) -> (Vec<T>, Vec<T>) {
    let mut rng = rand::thread_rng();

    // Fisher-Yates shuffle — every permutation is equally likely
    samples.shuffle(&mut rng);

    // Calculate the split index
    // e.g. 100 samples * 0.8 = 80 → first 80 are training
    let total    = samples.len();
    let split_at = ((total as f64) * train_fraction).round() as usize;

    // Clamp to valid range to avoid panics on tiny datasets
    let split_at = split_at.min(total);

    // split_off(n) removes elements [n..] from the Vec and returns them
    // After this: samples = [0..split_at], holdout = [split_at..total]
    let holdout = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} holdout ({}% / {}%)",
        samples.len(),
        holdout.len(),
        (samples.len()  * 100) / total.max(1),
        (holdout.len()  * 100) / total.max(1),
    );

    (samples, holdout)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let (train, holdout)  = split_train_holdout(items, 0.8);
        assert_eq!(train.len(),   80);
        assert_eq!(holdout.len(), 20);
    }

    #[test]
    fn test_all_items_preserved() {
        // No items should be lost in the split
        let items: Vec<usize> = (0..50).collect();
        let (train, holdout)  = split_train_holdout(items, 0.7);
        assert_eq!(train.len() + holdout.len(), 50);
    }

    #[test]
    fn test_empty_dataset() {
        let items: Vec<usize> = Vec::new();
        let (train, holdout)  = split_train_holdout(items, 0.8);
        assert!(train.is_empty());
        assert!(holdout.is_empty());
    }

    #[test]
    fn test_full_training_split() {
        // 1.0 fraction means everything goes to training
        let items: Vec<usize> = (0..10).collect();
        let (train, holdout)  = split_train_holdout(items, 1.0);
        assert_eq!(train.len(), 10);
        assert!(holdout.is_empty());
    }
}
