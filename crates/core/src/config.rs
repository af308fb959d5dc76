//! Project-level settings for portrait normalization and layout.
//!
//! Settings are read from an optional `script_writer.toml` next to the
//! working directory; every field falls back to the built-in default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ScriptError, ScriptResult};

/// Default file name looked up by [`ProjectConfig::load_or_default`].
pub const CONFIG_FILE_NAME: &str = "script_writer.toml";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ProjectConfig {
    /// Directory holding one portrait per registered character.
    pub project_dir: PathBuf,
    /// Edge length of the stored square portrait.
    pub thumbnail_size: u32,
    /// Edge length of the crop window, in preview pixels.
    pub crop_window: u32,
    /// The source image is fitted inside a square of this size for cropping.
    pub preview_max: u32,
    pub jpeg_quality: u8,
    /// Edge length of the portrait shown next to each dialogue row.
    pub row_preview_size: u32,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("script_project"),
            thumbnail_size: 100,
            crop_window: 100,
            preview_max: 500,
            jpeg_quality: 85,
            row_preview_size: 50,
        }
    }
}

impl ProjectConfig {
    pub fn load(path: &Path) -> ScriptResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| ScriptError::file(path, err))?;
        let config: ProjectConfig = toml::from_str(&raw).map_err(|err| ScriptError::Parse {
            message: err.message().to_string(),
            span: err
                .span()
                .map(|range| (range.start, range.end - range.start).into())
                .unwrap_or_else(|| (0, 0).into()),
            src: raw,
        })?;
        Ok(config.normalized())
    }

    /// Loads `path` when it exists, otherwise returns defaults.
    pub fn load_or_default(path: &Path) -> ScriptResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> ScriptResult<()> {
        let content = toml::to_string_pretty(self).map_err(|err| {
            ScriptError::file(
                path,
                std::io::Error::new(std::io::ErrorKind::InvalidData, err),
            )
        })?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|err| ScriptError::file(parent, err))?;
            }
        }
        std::fs::write(path, content).map_err(|err| ScriptError::file(path, err))
    }

    /// Clamps values that would make cropping degenerate.
    fn normalized(mut self) -> Self {
        self.thumbnail_size = self.thumbnail_size.max(1);
        self.preview_max = self.preview_max.max(1);
        self.crop_window = self.crop_window.clamp(1, self.preview_max);
        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
        self.row_preview_size = self.row_preview_size.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = ProjectConfig::load_or_default(&dir.path().join(CONFIG_FILE_NAME))
            .expect("defaults");
        assert_eq!(config, ProjectConfig::default());
        assert_eq!(config.project_dir, PathBuf::from("script_project"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "thumbnail_size = 64\njpeg_quality = 200\n").expect("write");

        let config = ProjectConfig::load(&path).expect("load");
        assert_eq!(config.thumbnail_size, 64);
        assert_eq!(config.jpeg_quality, 100);
        assert_eq!(config.crop_window, 100);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let config = ProjectConfig {
            project_dir: PathBuf::from("portraits"),
            thumbnail_size: 128,
            ..ProjectConfig::default()
        };
        config.save(&path).expect("save");
        assert_eq!(ProjectConfig::load(&path).expect("load"), config);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "thumbnail_size = \"big\"").expect("write");
        let err = ProjectConfig::load(&path).expect_err("must fail");
        assert!(matches!(err, ScriptError::Parse { .. }));
    }
}
