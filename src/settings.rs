//! Game settings and preferences
//!
//! Persisted separately from the sealed best score, as plain JSON.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::sim::GameMode;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty variant
    pub mode: GameMode,
    /// Preferred skin; falls back through the catalog if unavailable
    pub skin: String,
    pub sound_on: bool,
    /// Fixed RNG seed; `None` picks one per launch
    pub seed: Option<u64>,

    // === Paths ===
    /// Asset root; skins live in `<assets>/sprites/player/<skin>/`
    pub asset_root: PathBuf,
    /// Sealed score and its key
    pub data_dir: PathBuf,
    /// Optional balance sheet override
    pub tuning_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: GameMode::Normal,
            skin: "yellow".to_string(),
            sound_on: true,
            seed: None,

            asset_root: PathBuf::from("assets"),
            data_dir: PathBuf::from("assets/data"),
            tuning_path: PathBuf::from("assets/data/tuning.json"),
        }
    }
}

impl Settings {
    /// Default location next to the working directory
    pub const FILE_NAME: &'static str = "settings.json";

    pub fn skins_dir(&self) -> PathBuf {
        self.asset_root.join("sprites").join("player")
    }

    pub fn score_path(&self) -> PathBuf {
        self.data_dir.join("score.dat")
    }

    pub fn key_path(&self) -> PathBuf {
        self.data_dir.join("key.key")
    }

    /// Load settings; a missing file means defaults, a broken one is an error
    pub fn load(path: &Path) -> Result<Self, GameError> {
        match fs::read_to_string(path) {
            Ok(json) => {
                let settings = serde_json::from_str(&json).map_err(|e| {
                    GameError::Configuration(format!("invalid settings {}: {e}", path.display()))
                })?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
            Err(e) => Err(GameError::Configuration(format!(
                "cannot read settings {}: {e}",
                path.display()
            ))),
        }
    }

    /// Best effort; a failed save only costs the preference
    pub fn save(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => match fs::write(path, json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Failed to save settings to {}: {e}", path.display()),
            },
            Err(e) => log::warn!("Failed to serialize settings: {e}"),
        }
    }
}
