//! Preloaded animation frames for the active skin

use serde::{Deserialize, Serialize};

/// Frame keys of one skin, indexed 1..=len
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFrameTable")]
pub struct FrameTable {
    pub skin: String,
    pub stationary: bool,
    frames: Vec<String>,
}

/// Wire form, checked through [`FrameTable::new`] on the way in
#[derive(Deserialize)]
struct RawFrameTable {
    skin: String,
    stationary: bool,
    frames: Vec<String>,
}

impl TryFrom<RawFrameTable> for FrameTable {
    type Error = String;

    fn try_from(raw: RawFrameTable) -> Result<Self, Self::Error> {
        let skin = raw.skin.clone();
        FrameTable::new(raw.skin, raw.stationary, raw.frames)
            .ok_or_else(|| format!("skin '{skin}' has no frames"))
    }
}

impl FrameTable {
    /// An empty frame list is not a usable skin, so callers get `None`
    pub fn new(skin: impl Into<String>, stationary: bool, frames: Vec<String>) -> Option<Self> {
        if frames.is_empty() {
            return None;
        }
        Some(Self {
            skin: skin.into(),
            stationary,
            frames,
        })
    }

    pub fn len(&self) -> u32 {
        self.frames.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame key for a 1-based index, clamped into range
    pub fn frame(&self, index: u32) -> &str {
        let i = (index.max(1) as usize - 1).min(self.frames.len() - 1);
        &self.frames[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_rejected() {
        assert!(FrameTable::new("ghost", false, Vec::new()).is_none());
    }

    #[test]
    fn test_empty_table_rejected_when_deserialized() {
        let json = r#"{"skin":"ghost","stationary":false,"frames":[]}"#;
        assert!(serde_json::from_str::<FrameTable>(json).is_err());

        let json = r#"{"skin":"kirby","stationary":true,"frames":["k1"]}"#;
        let table: FrameTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.frame(4), "k1");
    }

    #[test]
    fn test_frame_lookup_is_one_based_and_clamped() {
        let table = FrameTable::new(
            "yellow",
            false,
            vec!["y1".into(), "y2".into(), "y3".into()],
        )
        .unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.frame(1), "y1");
        assert_eq!(table.frame(3), "y3");
        assert_eq!(table.frame(0), "y1");
        assert_eq!(table.frame(9), "y3");
    }
}
