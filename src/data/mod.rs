// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from the raw ratings CSV
// all the way to backend-ready tensor batches.
//
// The pipeline flows in this order:
//
//   ratings.csv
//       │
//       ▼
//   CsvRatingLoader   → reads rows, parses typed Rating records
//       │
//       ▼
//   IdEncoder         → maps sparse user/movie IDs to dense indices
//       │
//       ▼
//   Splitter          → shuffles and splits train/holdout sets
//       │
//       ▼
//   RatingDataset     → implements Burn's Dataset trait
//       │
//       ▼
//   RatingBatcher     → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Each module is responsible for exactly one step.
// This makes each step independently testable and replaceable.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Rust Book §13 (Iterators and Closures)

/// Loads rating rows from a MovieLens CSV using the csv crate
pub mod loader;

/// Maps sparse IDs to contiguous zero-based indices
pub mod encoder;

/// Shuffles and splits data into train/holdout sets
pub mod splitter;

/// Implements Burn's Dataset trait for encoded rating samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
