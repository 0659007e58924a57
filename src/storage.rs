// SPDX-License-Identifier: MPL-2.0

//! Storage utilities for locating and listing snapshot exports

use crate::constants::{DEFAULT_SAVE_FOLDER, GALLERY_FOLDER, SidecarKind};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::warn;

/// Resolve the snapshot export directory
///
/// Documents directory with the save folder appended, falling back to the
/// home directory, then the current directory. The directory itself is not
/// created here; the caller creates it before writing.
pub fn snapshot_dir(folder: &str) -> PathBuf {
    dirs::document_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join(folder)
}

/// Resolve the gallery image directory under the user pictures directory
pub fn gallery_dir() -> PathBuf {
    dirs::picture_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join(GALLERY_FOLDER)
}

/// Default export directory using the standard save folder name
pub fn default_snapshot_dir() -> PathBuf {
    snapshot_dir(DEFAULT_SAVE_FOLDER)
}

/// One group of sidecar files sharing a stem
#[derive(Debug, Clone)]
pub struct ExportSet {
    /// Shared timestamp stem
    pub stem: String,
    /// Sidecar kinds present on disk for this stem
    pub present: Vec<SidecarKind>,
    /// Most recent modification time across the set's files
    pub modified: Option<SystemTime>,
}

impl ExportSet {
    /// Whether all five sidecar files are present
    pub fn is_complete(&self) -> bool {
        self.present.len() == SidecarKind::ALL.len()
    }

    /// Path of one sidecar file of this set
    pub fn path(&self, dir: &Path, kind: SidecarKind) -> PathBuf {
        dir.join(format!("{}{}", self.stem, kind.suffix()))
    }
}

/// Scan a directory for export sets, newest first
///
/// Files are grouped by stripping the known sidecar suffixes; anything
/// else in the directory (gallery images, stray files) is ignored. A
/// missing or unreadable directory yields an empty list.
pub fn list_export_sets(dir: &Path) -> Vec<ExportSet> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Cannot read snapshot directory");
            return Vec::new();
        }
    };

    let mut sets: BTreeMap<String, ExportSet> = BTreeMap::new();

    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };

        let Some((stem, kind)) = split_sidecar_name(name) else {
            continue;
        };

        let modified = entry.metadata().ok().and_then(|m| m.modified().ok());
        let set = sets.entry(stem.to_string()).or_insert_with(|| ExportSet {
            stem: stem.to_string(),
            present: Vec::new(),
            modified: None,
        });
        set.present.push(kind);
        if modified > set.modified {
            set.modified = modified;
        }
    }

    let mut sets: Vec<ExportSet> = sets.into_values().collect();
    // Newest first; unknown mtimes sort last
    sets.sort_by(|a, b| b.modified.cmp(&a.modified));
    sets
}

/// Split a file name into (stem, sidecar kind) if it matches a known suffix
fn split_sidecar_name(name: &str) -> Option<(&str, SidecarKind)> {
    for kind in SidecarKind::ALL {
        if let Some(stem) = name.strip_suffix(kind.suffix()) {
            if !stem.is_empty() {
                return Some((stem, kind));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sidecar_name() {
        let (stem, kind) = split_sidecar_name("12345.0_intri.txt").unwrap();
        assert_eq!(stem, "12345.0");
        assert_eq!(kind, SidecarKind::Intrinsics);

        let (stem, kind) = split_sidecar_name("12345.0_depthBuffer.bin").unwrap();
        assert_eq!(stem, "12345.0");
        assert_eq!(kind, SidecarKind::DepthBuffer);
    }

    #[test]
    fn test_split_rejects_foreign_files() {
        assert!(split_sidecar_name("color_20260101.png").is_none());
        assert!(split_sidecar_name("_intri.txt").is_none());
    }
}
