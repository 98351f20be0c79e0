use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use buddio_core::shared::constants::{
    APP_DIR_NAME, DEFAULT_DETECTION_CONFIDENCE, DEFAULT_MATCH_THRESHOLD,
};

const SETTINGS_FILE: &str = "settings.json";
const STORE_FILE: &str = "projects.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub match_threshold: f64,
    pub detection_confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            detection_confidence: DEFAULT_DETECTION_CONFIDENCE,
            store_path: None,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(SETTINGS_FILE))
    }

    /// Loads from the platform config dir; a missing or unreadable file
    /// means defaults.
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring malformed settings at {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> io::Result<PathBuf> {
        let path = Self::config_path().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "could not determine config directory")
        })?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// Configured store file, or `projects.json` under the platform data dir.
    pub fn resolved_store_path(&self) -> Option<PathBuf> {
        self.store_path
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR_NAME).join(STORE_FILE)))
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(-1.0..=1.0).contains(&self.match_threshold) {
            return Err(format!(
                "Match threshold must be between -1.0 and 1.0, got {}",
                self.match_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.detection_confidence) {
            return Err(format!(
                "Confidence must be between 0.0 and 1.0, got {}",
                self.detection_confidence
            ));
        }
        Ok(())
    }
}
