// ============================================================
// Layer 6 — Encoder Store
// ============================================================
// Persists the fitted ID encoders next to the model checkpoint.
//
// Why persist the encoders at all?
//   The model identifies a user purely by which embedding row
//   was looked up for them during training. If inference fitted
//   fresh encoders (or fitted them over a different file), row 0
//   could mean a different user and every prediction would be
//   garbage. Training therefore saves the exact mapping and
//   inference reloads it — the same contract the model weights
//   themselves follow.
//
// Files written to the checkpoint directory:
//   user_encoder.json   ← fitted user ID → row mapping
//   movie_encoder.json  ← fitted movie ID → row mapping
//
// Reference: Rust Book §9 (Error Handling)
//            serde_json documentation

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::data::encoder::IdEncoder;

pub struct EncoderStore {
    dir: PathBuf,
}

impl EncoderStore {
    pub fn new(dir: impl Into<String>) -> Self {
        Self { dir: PathBuf::from(dir.into()) }
    }

    /// Save both fitted encoders. Called once, before training starts.
    pub fn save(&self, users: &IdEncoder, movies: &IdEncoder) -> Result<()> {
        fs::create_dir_all(&self.dir).ok();

        self.write_one("user_encoder.json", users)?;
        self.write_one("movie_encoder.json", movies)?;

        tracing::info!(
            "Saved encoders: {} users, {} movies",
            users.len(),
            movies.len()
        );
        Ok(())
    }

    /// Load both encoders back.
    /// Returns (user_encoder, movie_encoder).
    pub fn load(&self) -> Result<(IdEncoder, IdEncoder)> {
        let users  = self.read_one("user_encoder.json")?;
        let movies = self.read_one("movie_encoder.json")?;
        Ok((users, movies))
    }

    fn write_one(&self, name: &str, encoder: &IdEncoder) -> Result<()> {
        let path = self.dir.join(name);
        let json = serde_json::to_string(encoder)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write encoder to '{}'", path.display()))?;
        Ok(())
    }

    fn read_one(&self, name: &str) -> Result<IdEncoder> {
        let path = self.dir.join(name);
        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read encoder from '{}'. Have you run 'train' first?",
                    path.display()
                )
            })?;
        Ok(serde_json::from_str(&json)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_roundtrip() {
        let tmp   = tempfile::tempdir().unwrap();
        let store = EncoderStore::new(tmp.path().to_str().unwrap());

        let users  = IdEncoder::fit([5, 9, 300]);
        let movies = IdEncoder::fit([31, 1029]);
        store.save(&users, &movies).unwrap();

        let (u, m) = store.load().unwrap();
        assert_eq!(u.len(), 3);
        assert_eq!(u.encode(9), Some(1));
        assert_eq!(m.len(), 2);
        assert_eq!(m.decode(0), Some(31));
    }

    #[test]
    fn test_load_without_save_is_an_error() {
        let tmp   = tempfile::tempdir().unwrap();
        let store = EncoderStore::new(tmp.path().to_str().unwrap());
        assert!(store.load().is_err());
    }
}
