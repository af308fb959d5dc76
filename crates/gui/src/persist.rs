use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Window and dialog state remembered between runs.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UserPreferences {
    pub window_width: f32,
    pub window_height: f32,
    pub ui_scale: f32,
    /// Directory last used by a save, load or export dialog.
    pub last_script_dir: Option<PathBuf>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            window_width: 800.0,
            window_height: 600.0,
            ui_scale: 1.0,
            last_script_dir: None,
        }
    }
}

impl UserPreferences {
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("com", "scriptwriter", "script_writer")
            .map(|dirs| dirs.config_dir().join("prefs.json"))
            .unwrap_or_else(|| PathBuf::from("prefs.json"))
    }

    pub fn load_from(path: &Path) -> std::io::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        let parsed = serde_json::from_str(&raw)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err.to_string()))?;
        Ok(parsed)
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
        fs::write(path, payload)
    }

    /// Records the live window size; degenerate sizes (minimized windows)
    /// are ignored.
    pub fn remember_window_size(&mut self, width: f32, height: f32) {
        if width >= 1.0 && height >= 1.0 && width.is_finite() && height.is_finite() {
            self.window_width = width;
            self.window_height = height;
        }
    }

    /// Remembers the directory containing `file`.
    pub fn remember_dir_of(&mut self, file: &Path) {
        if let Some(parent) = file.parent() {
            if !parent.as_os_str().is_empty() {
                self.last_script_dir = Some(parent.to_path_buf());
            }
        }
    }
}
