//! Skin catalog
//!
//! The simulation never touches image files. It asks a [`SkinCatalog`] which
//! skins exist, how many animation frames each has, and whether the skin is
//! stationary (never rotates). Selecting a skin builds a [`FrameTable`] once;
//! after that the core only indexes into it.

pub mod frames;
pub mod fs;
pub mod import;
pub mod memory;

use std::fmt;
use std::path::PathBuf;

pub use frames::FrameTable;
pub use fs::FsSkinCatalog;
pub use import::{ImportError, ImportPlan};
pub use memory::MemorySkinCatalog;

/// Skins that never rotate regardless of the stationary list on disk
pub const BUILTIN_STATIONARY: [&str; 2] = ["mario", "kirby"];

#[derive(Debug)]
pub enum AssetError {
    /// Skin is not in the catalog
    UnknownSkin(String),
    /// A frame image the skin needs does not exist
    MissingFrame { skin: String, path: PathBuf },
    /// Skin tool rejected the files
    Import(ImportError),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::UnknownSkin(skin) => write!(f, "unknown skin '{skin}'"),
            AssetError::MissingFrame { skin, path } => {
                write!(f, "skin '{skin}' is missing frame {}", path.display())
            }
            AssetError::Import(e) => write!(f, "import rejected: {e}"),
            AssetError::Io { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Import(e) => Some(e),
            AssetError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ImportError> for AssetError {
    fn from(e: ImportError) -> Self {
        AssetError::Import(e)
    }
}

/// Source of player skins
pub trait SkinCatalog {
    /// Skin ids in stable cycling order
    fn list_skins(&self) -> Vec<String>;

    /// Number of animation frames for a skin
    fn frame_count(&self, skin: &str) -> Result<u32, AssetError>;

    /// Stationary skins are drawn upright at all times
    fn is_stationary(&self, skin: &str) -> bool;

    /// Resolve every frame of a skin up front
    fn load_frames(&self, skin: &str) -> Result<FrameTable, AssetError>;

    /// Pick up skins added or removed by the skin tool
    fn rescan(&mut self) -> Result<(), AssetError> {
        Ok(())
    }
}
