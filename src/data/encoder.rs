// ============================================================
// Layer 4 — Categorical ID Encoder
// ============================================================
// Maps arbitrary sparse identifiers to a dense integer range
// [0, cardinality) — the classic "label encoding" step.
//
// Why is this needed?
//   Embedding tables are indexed by row number. MovieLens IDs
//   are sparse (movie IDs run into the hundreds of thousands
//   with big gaps), so using them directly would allocate a
//   huge table of mostly-unused rows. Encoding first means the
//   table has exactly one row per ID that actually occurs.
//
// Properties:
//   - Bijective over the fitted IDs: encode then decode is
//     the identity, and no two IDs share an index.
//   - First-seen order: the first distinct ID gets index 0,
//     the second gets 1, and so on. Deterministic for a given
//     input ordering.
//   - Unknown IDs encode to None — a user or movie the model
//     has never seen has no embedding row to look up.
//
// The same encoder type is used for users and for movies;
// one fitted instance each. Both are serialized to JSON at
// train time so inference uses the exact same mapping.
//
// Reference: Rust Book §8 (HashMaps)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A fitted bijective mapping from raw IDs to dense indices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdEncoder {
    /// raw ID → dense index
    index: HashMap<u32, usize>,

    /// dense index → raw ID (the inverse mapping).
    /// Invariant: ids[index[id]] == id for every fitted id.
    ids: Vec<u32>,
}

impl IdEncoder {
    /// Fit an encoder over a stream of raw IDs.
    /// Duplicates are fine — each distinct ID is assigned
    /// exactly one index, in order of first appearance.
    pub fn fit(raw_ids: impl IntoIterator<Item = u32>) -> Self {
        let mut index = HashMap::new();
        let mut ids   = Vec::new();
        for id in raw_ids {
            if !index.contains_key(&id) {
                index.insert(id, ids.len());
                ids.push(id);
            }
        }
        Self { index, ids }
    }

    /// Map a raw ID to its dense index.
    /// Returns None for IDs not seen during fitting.
    pub fn encode(&self, raw_id: u32) -> Option<usize> {
        self.index.get(&raw_id).copied()
    }

    /// Map a dense index back to the raw ID it stands for.
    pub fn decode(&self, index: usize) -> Option<u32> {
        self.ids.get(index).copied()
    }

    /// Number of distinct IDs — the embedding table row count.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_are_contiguous_and_first_seen() {
        let enc = IdEncoder::fit([50, 7, 50, 9001, 7]);

        // Three distinct IDs → indices 0, 1, 2 in first-seen order
        assert_eq!(enc.len(), 3);
        assert_eq!(enc.encode(50),   Some(0));
        assert_eq!(enc.encode(7),    Some(1));
        assert_eq!(enc.encode(9001), Some(2));
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let raw = [12u32, 400, 3, 77];
        let enc = IdEncoder::fit(raw);

        for id in raw {
            let idx = enc.encode(id).unwrap();
            assert_eq!(enc.decode(idx), Some(id));
        }
    }

    #[test]
    fn test_unknown_id_encodes_to_none() {
        let enc = IdEncoder::fit([1, 2, 3]);
        assert_eq!(enc.encode(99), None);
        assert_eq!(enc.decode(99), None);
    }

    #[test]
    fn test_empty_encoder() {
        let enc = IdEncoder::fit([]);
        assert!(enc.is_empty());
        assert_eq!(enc.len(), 0);
    }

    #[test]
    fn test_json_roundtrip_preserves_mapping() {
        let enc  = IdEncoder::fit([10, 20, 30]);
        let json = serde_json::to_string(&enc).unwrap();
        let back: IdEncoder = serde_json::from_str(&json).unwrap();

        assert_eq!(back.len(), 3);
        assert_eq!(back.encode(20), Some(1));
        assert_eq!(back.decode(2),  Some(30));
    }
}
