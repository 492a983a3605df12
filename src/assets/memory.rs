//! In-memory skin catalog for tests and embedding

use std::collections::HashSet;

use super::{AssetError, FrameTable, SkinCatalog};

#[derive(Debug, Clone, Default)]
pub struct MemorySkinCatalog {
    skins: Vec<(String, u32)>,
    stationary: HashSet<String>,
    broken: HashSet<String>,
}

impl MemorySkinCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skin(mut self, name: &str, frames: u32) -> Self {
        self.skins.push((name.to_string(), frames));
        self
    }

    pub fn with_stationary_skin(mut self, name: &str, frames: u32) -> Self {
        self.stationary.insert(name.to_string());
        self.with_skin(name, frames)
    }

    /// Listed, but its frames fail to load
    pub fn with_broken_skin(mut self, name: &str, frames: u32) -> Self {
        self.broken.insert(name.to_string());
        self.with_skin(name, frames)
    }
}

impl SkinCatalog for MemorySkinCatalog {
    fn list_skins(&self) -> Vec<String> {
        self.skins.iter().map(|(name, _)| name.clone()).collect()
    }

    fn frame_count(&self, skin: &str) -> Result<u32, AssetError> {
        self.skins
            .iter()
            .find(|(name, _)| name == skin)
            .map(|(_, frames)| *frames)
            .ok_or_else(|| AssetError::UnknownSkin(skin.to_string()))
    }

    fn is_stationary(&self, skin: &str) -> bool {
        self.stationary.contains(skin)
    }

    fn load_frames(&self, skin: &str) -> Result<FrameTable, AssetError> {
        let count = self.frame_count(skin)?;
        let missing = || AssetError::MissingFrame {
            skin: skin.to_string(),
            path: format!("{skin}/{skin}1.png").into(),
        };
        if self.broken.contains(skin) {
            return Err(missing());
        }
        let frames = (1..=count).map(|n| format!("{skin}/{skin}{n}")).collect();
        FrameTable::new(skin, self.is_stationary(skin), frames).ok_or_else(missing)
    }
}
