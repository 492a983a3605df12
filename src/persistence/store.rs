//! Score store implementations

use std::fs;
use std::path::{Path, PathBuf};

use super::envelope::{Envelope, SealKey};
use super::{PersistenceError, ScoreStore};

/// Sealed score file next to its key file
pub struct SealedFileStore {
    path: PathBuf,
    key: SealKey,
}

impl SealedFileStore {
    /// Read the key, creating one if this is the first run
    pub fn open(score_path: impl Into<PathBuf>, key_path: &Path) -> Result<Self, PersistenceError> {
        let key = match fs::read(key_path) {
            Ok(bytes) => match SealKey::from_bytes(&bytes) {
                Some(key) => key,
                None => {
                    log::warn!(
                        "Key file {} is malformed, generating a new key",
                        key_path.display()
                    );
                    write_key(key_path)?
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Generating score key at {}", key_path.display());
                write_key(key_path)?
            }
            Err(e) => return Err(PersistenceError::Io(e)),
        };

        Ok(Self {
            path: score_path.into(),
            key,
        })
    }

    pub fn with_key(score_path: impl Into<PathBuf>, key: SealKey) -> Self {
        Self {
            path: score_path.into(),
            key,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Sealed file store, or a volatile one if the key cannot be read or created.
///
/// Losing persistence only costs the best score, so it never stops the game.
pub fn open_or_memory(score_path: impl Into<PathBuf>, key_path: &Path) -> Box<dyn ScoreStore> {
    match SealedFileStore::open(score_path, key_path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("Best score will not be kept between runs: {e}");
            Box::new(MemoryStore::new())
        }
    }
}

fn write_key(path: &Path) -> Result<SealKey, PersistenceError> {
    let key = SealKey::generate();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(PersistenceError::Io)?;
    }
    fs::write(path, key.as_bytes()).map_err(PersistenceError::Io)?;
    Ok(key)
}

impl ScoreStore for SealedFileStore {
    fn load_best_score(&mut self) -> Result<u32, PersistenceError> {
        let bytes = fs::read(&self.path)?;
        let json = String::from_utf8(bytes)
            .map_err(|_| PersistenceError::Decryption("score file is not text".to_string()))?;
        let score = Envelope::from_json(&json)?.open(&self.key)?;
        log::debug!("Loaded best score {score} from {}", self.path.display());
        Ok(score)
    }

    fn save_best_score(&mut self, score: u32) -> Result<(), PersistenceError> {
        let json = Envelope::seal(&self.key, score).to_json()?;
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(PersistenceError::Io)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).map_err(PersistenceError::Io)?;
        fs::rename(&tmp, &self.path).map_err(PersistenceError::Io)?;
        log::debug!("Saved best score {score} to {}", self.path.display());
        Ok(())
    }
}

/// Volatile store with switchable failure modes
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    score: Option<u32>,
    corrupt: bool,
    fail_saves: bool,
    /// Every successful save, oldest first
    pub saves: Vec<u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u32) -> Self {
        Self {
            score: Some(score),
            ..Self::default()
        }
    }

    /// Loads fail to decrypt until the next successful save
    pub fn corrupted() -> Self {
        Self {
            score: Some(0),
            corrupt: true,
            ..Self::default()
        }
    }

    pub fn set_fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }
}

impl ScoreStore for MemoryStore {
    fn load_best_score(&mut self) -> Result<u32, PersistenceError> {
        if self.corrupt {
            return Err(PersistenceError::Decryption("corrupted".to_string()));
        }
        self.score.ok_or(PersistenceError::NotFound)
    }

    fn save_best_score(&mut self, score: u32) -> Result<(), PersistenceError> {
        if self.fail_saves {
            return Err(PersistenceError::Io(std::io::Error::other("disk full")));
        }
        self.score = Some(score);
        self.corrupt = false;
        self.saves.push(score);
        Ok(())
    }
}
