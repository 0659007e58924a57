// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::DEFAULT_SAVE_FOLDER;
use crate::errors::{AppError, AppResult};
use crate::visualization::VizStyle;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Export directory override; None resolves under the documents directory
    pub export_dir: Option<PathBuf>,
    /// Folder name appended to the documents directory when no override is set
    pub save_folder: String,
    /// Whether exports also save color/depth images to the gallery
    pub gallery_enabled: bool,
    /// Depth visualization rendering style
    pub viz_style: VizStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            export_dir: None,
            save_folder: DEFAULT_SAVE_FOLDER.to_string(),
            gallery_enabled: true, // Gallery saves on by default, like the device tool
            viz_style: VizStyle::default(),
        }
    }
}

impl Config {
    /// Load the configuration, falling back to defaults
    ///
    /// A missing file is normal (first run); an unreadable or unparsable
    /// file logs a warning and yields defaults rather than failing startup.
    pub fn load() -> Config {
        let Some(path) = Self::config_path() else {
            return Config::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(config) => config,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Invalid config, using defaults");
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }

    /// Persist the configuration as JSON
    pub fn save(&self) -> AppResult<()> {
        let path = Self::config_path()
            .ok_or_else(|| AppError::Config("No config directory available".to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let text = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(&path, text)?;
        Ok(())
    }

    /// Resolved export directory for this configuration
    pub fn resolved_export_dir(&self) -> PathBuf {
        match &self.export_dir {
            Some(dir) => dir.clone(),
            None => crate::storage::snapshot_dir(&self.save_folder),
        }
    }

    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("depthcap").join("config.json"))
    }
}
