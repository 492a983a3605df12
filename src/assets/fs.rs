//! Skins stored as PNG folders on disk
//!
//! Layout under the player sprite root:
//!
//! ```text
//! player/
//!   data_stationary.txt     one skin name per line
//!   yellow/yellow1.png ...  multi-frame skin
//!   mario/mario.png         single-frame skin
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::import::{ImportPlan, collapse_single_frame, deletion_breaks_sequence};
use super::{AssetError, BUILTIN_STATIONARY, FrameTable, SkinCatalog};

const STATIONARY_FILE: &str = "data_stationary.txt";

pub struct FsSkinCatalog {
    root: PathBuf,
    skins: Vec<String>,
    stationary: HashSet<String>,
}

impl FsSkinCatalog {
    /// Scan `root` for skin folders
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, AssetError> {
        let mut catalog = Self {
            root: root.into(),
            skins: Vec::new(),
            stationary: HashSet::new(),
        };
        catalog.scan()?;
        Ok(catalog)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn scan(&mut self) -> Result<(), AssetError> {
        let entries = fs::read_dir(&self.root).map_err(|source| AssetError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut skins = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() && !png_files(&path).is_empty() {
                skins.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        skins.sort();

        self.stationary = BUILTIN_STATIONARY.iter().map(|s| s.to_string()).collect();
        match fs::read_to_string(self.root.join(STATIONARY_FILE)) {
            Ok(list) => self.stationary.extend(
                list.lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from),
            ),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(AssetError::Io {
                    path: self.root.join(STATIONARY_FILE),
                    source,
                });
            }
        }

        log::debug!("Found {} skins under {}", skins.len(), self.root.display());
        self.skins = skins;
        Ok(())
    }

    /// Copy a validated import into place. Returns the new skin names.
    pub fn import(&mut self, plan: &ImportPlan, stationary: bool) -> Result<Vec<String>, AssetError> {
        let mut created = Vec::new();
        for (folder, files) in &plan.folders {
            let dest = self.root.join(folder);
            if dest.exists() {
                return Err(super::ImportError::FolderExists(folder.clone()).into());
            }
            fs::create_dir_all(&dest).map_err(|source| AssetError::Io {
                path: dest.clone(),
                source,
            })?;
            for file in files {
                let target = dest.join(&file.file_name);
                fs::copy(&file.source, &target).map_err(|source| AssetError::Io {
                    path: target.clone(),
                    source,
                })?;
            }
            created.push(folder.clone());
        }

        if let Some(folder) = plan.single_folder() {
            self.set_stationary(folder, stationary)?;
        }
        log::info!("Imported skins: {}", created.join(", "));
        self.scan()?;
        Ok(created)
    }

    /// Remove one frame, refusing to leave a gap in the numbering
    pub fn delete_frame(&mut self, skin: &str, file_name: &str) -> Result<(), AssetError> {
        let folder = self.root.join(skin);
        let files = png_files(&folder);
        if deletion_breaks_sequence(&files, file_name) {
            return Err(super::ImportError::BrokenSequence(skin.to_string()).into());
        }

        let target = folder.join(file_name);
        fs::remove_file(&target).map_err(|source| AssetError::Io {
            path: target.clone(),
            source,
        })?;

        let remaining = png_files(&folder);
        if let Some((from, to)) = collapse_single_frame(&remaining) {
            fs::rename(folder.join(&from), folder.join(&to)).map_err(|source| AssetError::Io {
                path: folder.join(&from),
                source,
            })?;
            log::info!("Renamed {from} to {to}");
        }
        self.scan()
    }

    /// Remove a whole skin folder
    pub fn delete_skin(&mut self, skin: &str) -> Result<(), AssetError> {
        let folder = self.root.join(skin);
        fs::remove_dir_all(&folder).map_err(|source| AssetError::Io {
            path: folder.clone(),
            source,
        })?;
        log::info!("Deleted skin '{skin}'");
        self.scan()
    }

    fn set_stationary(&mut self, skin: &str, stationary: bool) -> Result<(), AssetError> {
        let path = self.root.join(STATIONARY_FILE);
        let existing = match fs::read_to_string(&path) {
            Ok(list) => list,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(source) => return Err(AssetError::Io { path, source }),
        };
        let mut lines: Vec<&str> = existing
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && *l != skin)
            .collect();
        if stationary {
            lines.push(skin);
        }
        let mut contents = lines.join("\n");
        contents.push('\n');
        fs::write(&path, contents).map_err(|source| AssetError::Io { path, source })
    }
}

impl SkinCatalog for FsSkinCatalog {
    fn list_skins(&self) -> Vec<String> {
        self.skins.clone()
    }

    fn frame_count(&self, skin: &str) -> Result<u32, AssetError> {
        if !self.skins.iter().any(|s| s == skin) {
            return Err(AssetError::UnknownSkin(skin.to_string()));
        }
        Ok(png_files(&self.root.join(skin)).len() as u32)
    }

    fn is_stationary(&self, skin: &str) -> bool {
        self.stationary.contains(skin)
    }

    fn load_frames(&self, skin: &str) -> Result<FrameTable, AssetError> {
        let count = self.frame_count(skin)?;
        let folder = self.root.join(skin);

        let paths: Vec<PathBuf> = if count > 1 {
            (1..=count)
                .map(|n| folder.join(format!("{skin}{n}.png")))
                .collect()
        } else {
            vec![folder.join(format!("{skin}.png"))]
        };

        let mut frames = Vec::with_capacity(paths.len());
        for path in paths {
            if !path.is_file() {
                return Err(AssetError::MissingFrame {
                    skin: skin.to_string(),
                    path,
                });
            }
            frames.push(path.to_string_lossy().into_owned());
        }

        FrameTable::new(skin, self.is_stationary(skin), frames).ok_or_else(|| {
            AssetError::MissingFrame {
                skin: skin.to_string(),
                path: folder,
            }
        })
    }

    fn rescan(&mut self) -> Result<(), AssetError> {
        self.scan()
    }
}

fn png_files(folder: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(folder) else {
        return Vec::new();
    };
    let mut files: Vec<String> = entries
        .flatten()
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.to_ascii_lowercase().ends_with(".png"))
        .collect();
    files.sort();
    files
}
