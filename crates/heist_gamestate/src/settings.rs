//! Persisted settings
//!
//! Only the master volume survives between runs.

use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_volume() -> f32 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Master volume in `[0, 1]`
    #[serde(default = "default_volume")]
    pub volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: default_volume(),
        }
    }
}

impl Settings {
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}

/// JSON file holding [`Settings`]
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read settings; a missing file yields defaults
    pub fn load(&self) -> Result<Settings, SettingsError> {
        if !self.path.exists() {
            log::debug!("No settings at {}, using defaults", self.path.display());
            return Ok(Settings::default());
        }
        let json = fs::read_to_string(&self.path)?;
        let mut settings: Settings = serde_json::from_str(&json)?;
        settings.set_volume(settings.volume);
        Ok(settings)
    }

    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json)?;
        log::info!("Settings saved: volume = {}", settings.volume);
        Ok(())
    }

    /// Write and return the defaults
    pub fn restore_defaults(&self) -> Result<Settings, SettingsError> {
        let settings = Settings::default();
        self.save(&settings)?;
        log::info!("Settings restored to defaults");
        Ok(settings)
    }
}
