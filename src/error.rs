//! Error taxonomy
//!
//! Only `Configuration` is fatal; everything else is recovered inside the
//! loop and surfaces as a log line or a HUD flag.

use std::fmt;

use crate::assets::AssetError;
use crate::persistence::PersistenceError;

#[derive(Debug)]
pub enum GameError {
    /// No usable skin, or an invalid balance sheet. Halts the loop.
    Configuration(String),
    /// A skin's frames could not be loaded
    Asset(AssetError),
    /// Best-score storage failed
    Persistence(PersistenceError),
}

impl GameError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, GameError::Configuration(_))
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Configuration(msg) => write!(f, "configuration error: {msg}"),
            GameError::Asset(e) => write!(f, "asset error: {e}"),
            GameError::Persistence(e) => write!(f, "persistence error: {e}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Configuration(_) => None,
            GameError::Asset(e) => Some(e),
            GameError::Persistence(e) => Some(e),
        }
    }
}

impl From<AssetError> for GameError {
    fn from(e: AssetError) -> Self {
        GameError::Asset(e)
    }
}

impl From<PersistenceError> for GameError {
    fn from(e: PersistenceError) -> Self {
        GameError::Persistence(e)
    }
}
