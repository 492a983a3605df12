//! Best-score persistence
//!
//! The simulation sees storage as "load/save a sealed integer":
//! - Versioned JSON envelope
//! - BLAKE3 keyed keystream + digest (tamper and corruption detection)
//! - Atomic replace (tmp → save)
//! - Key file generated on first run

pub mod envelope;
pub mod store;

use std::fmt;

pub use envelope::{ENVELOPE_VERSION, Envelope, SealKey};
pub use store::{MemoryStore, SealedFileStore, open_or_memory};

#[derive(Debug)]
pub enum PersistenceError {
    /// Nothing saved yet
    NotFound,
    /// Saved data exists but does not open with our key
    Decryption(String),
    Io(std::io::Error),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::NotFound => write!(f, "no saved score"),
            PersistenceError::Decryption(why) => write!(f, "failed to decrypt score: {why}"),
            PersistenceError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            PersistenceError::NotFound
        } else {
            PersistenceError::Io(e)
        }
    }
}

/// Where the best-ever score lives between runs
pub trait ScoreStore {
    fn load_best_score(&mut self) -> Result<u32, PersistenceError>;
    fn save_best_score(&mut self, score: u32) -> Result<(), PersistenceError>;
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn load_best_score(&mut self) -> Result<u32, PersistenceError> {
        (**self).load_best_score()
    }

    fn save_best_score(&mut self, score: u32) -> Result<(), PersistenceError> {
        (**self).save_best_score(score)
    }
}
