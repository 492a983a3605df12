//! Rules for adding and removing custom skins
//!
//! Files are grouped into skin folders by their name with digits stripped
//! (`bat1.png`, `bat2.png` → `bat`). A multi-frame skin must be numbered
//! 1..=n without gaps. A lone file becomes a single-frame skin named after
//! its base (`bat7.png` → `bat/bat.png`).

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    NoFiles,
    NotPng(PathBuf),
    /// Frame numbers are not exactly 1..=n
    BrokenSequence(String),
    FolderExists(String),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::NoFiles => write!(f, "no files selected"),
            ImportError::NotPng(path) => {
                write!(f, "'{}' is not a PNG file, only PNG files are allowed", path.display())
            }
            ImportError::BrokenSequence(folder) => write!(
                f,
                "files for '{folder}' have missing numbers, the sequence must run 1..n without gaps"
            ),
            ImportError::FolderExists(folder) => {
                write!(f, "folder '{folder}' already exists, choose another name")
            }
        }
    }
}

impl std::error::Error for ImportError {}

/// One file to copy into a skin folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFile {
    pub source: PathBuf,
    pub file_name: String,
}

/// Validated import, folder name → files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportPlan {
    pub folders: BTreeMap<String, Vec<ImportFile>>,
}

impl ImportPlan {
    /// Validate a selection against the skins that already exist
    pub fn new(files: &[PathBuf], existing: &[String]) -> Result<Self, ImportError> {
        if files.is_empty() {
            return Err(ImportError::NoFiles);
        }
        for file in files {
            if !is_png(file) {
                return Err(ImportError::NotPng(file.clone()));
            }
        }

        let mut folders: BTreeMap<String, Vec<ImportFile>> = BTreeMap::new();

        if let [file] = files {
            let base = strip_digits(&stem(file));
            folders.insert(
                base.clone(),
                vec![ImportFile {
                    source: file.clone(),
                    file_name: format!("{base}.png"),
                }],
            );
        } else {
            let mut numbered: BTreeMap<String, Vec<(u32, &PathBuf)>> = BTreeMap::new();
            for file in files {
                let stem = stem(file);
                let base = strip_digits(&stem);
                let number = first_number(&stem).ok_or_else(|| ImportError::BrokenSequence(base.clone()))?;
                numbered.entry(base).or_default().push((number, file));
            }

            for (base, mut frames) in numbered {
                frames.sort_by_key(|(n, _)| *n);
                let numbers: Vec<u32> = frames.iter().map(|(n, _)| *n).collect();
                if !is_continuous(&numbers) {
                    return Err(ImportError::BrokenSequence(base));
                }
                let files = frames
                    .into_iter()
                    .map(|(_, path)| ImportFile {
                        source: path.clone(),
                        file_name: file_name(path),
                    })
                    .collect();
                folders.insert(base, files);
            }
        }

        if let Some(taken) = folders.keys().find(|f| existing.iter().any(|e| e == *f)) {
            return Err(ImportError::FolderExists(taken.clone()));
        }

        Ok(Self { folders })
    }

    /// Only single-skin imports ask whether the skin is stationary
    pub fn single_folder(&self) -> Option<&str> {
        match self.folders.len() {
            1 => self.folders.keys().next().map(String::as_str),
            _ => None,
        }
    }
}

/// Would removing `to_delete` from a folder leave a gap in its numbering?
///
/// Files without a trailing number never break a sequence.
pub fn deletion_breaks_sequence(folder_files: &[String], to_delete: &str) -> bool {
    let Some((base, number)) = split_numbered(to_delete) else {
        return false;
    };

    let mut numbers: Vec<u32> = folder_files
        .iter()
        .filter_map(|f| split_numbered(f))
        .filter(|(b, _)| *b == base)
        .map(|(_, n)| n)
        .collect();
    numbers.sort_unstable();

    if !is_continuous(&numbers) {
        return true;
    }
    numbers.retain(|n| *n != number);
    !is_continuous(&numbers)
}

/// After deleting down to one frame, `bat1.png` is renamed to `bat.png`.
/// Returns the (from, to) rename if one is needed.
pub fn collapse_single_frame(folder_files: &[String]) -> Option<(String, String)> {
    let max = folder_files
        .iter()
        .filter_map(|f| split_numbered(f))
        .map(|(_, n)| n)
        .max();
    if max.is_some_and(|n| n > 1) {
        return None;
    }
    folder_files.iter().find_map(|f| {
        let stem = f.strip_suffix(".png").or_else(|| f.strip_suffix(".PNG"))?;
        let base = stem.strip_suffix('1')?;
        Some((f.clone(), format!("{base}.png")))
    })
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn strip_digits(s: &str) -> String {
    s.chars().filter(|c| !c.is_ascii_digit()).collect()
}

fn first_number(s: &str) -> Option<u32> {
    let digits: String = s
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// `bat12.png` → ("bat", 12)
fn split_numbered(file: &str) -> Option<(&str, u32)> {
    let stem = file.strip_suffix(".png")?;
    let base = stem.trim_end_matches(|c: char| c.is_ascii_digit());
    if base.is_empty() || base.len() == stem.len() {
        return None;
    }
    let number = stem[base.len()..].parse().ok()?;
    Some((base, number))
}

fn is_continuous(sorted: &[u32]) -> bool {
    sorted.iter().zip(1u32..).all(|(n, expected)| *n == expected)
}
