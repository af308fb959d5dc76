//! Character registry: name → normalized portrait on disk.

use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageError};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::character::{image_name_of, is_valid_name, Character, CharacterName};
use crate::config::ProjectConfig;
use crate::crop::CropFrame;
use crate::error::{ScriptError, ScriptResult};

/// Extensions accepted as registration sources.
pub const SOURCE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "gif", "webp"];
/// Extension of every stored portrait.
pub const PORTRAIT_EXTENSION: &str = "jpg";

/// Portrait normalization parameters taken from [`ProjectConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortraitSpec {
    pub thumbnail_size: u32,
    pub crop_window: u32,
    pub preview_max: u32,
    pub jpeg_quality: u8,
}

impl Default for PortraitSpec {
    fn default() -> Self {
        Self::from(&ProjectConfig::default())
    }
}

impl From<&ProjectConfig> for PortraitSpec {
    fn from(config: &ProjectConfig) -> Self {
        Self {
            thumbnail_size: config.thumbnail_size,
            crop_window: config.crop_window,
            preview_max: config.preview_max,
            jpeg_quality: config.jpeg_quality,
        }
    }
}

/// A validated registration waiting for the user to position the crop window.
#[derive(Debug)]
pub struct PendingRegistration {
    name: CharacterName,
    source_path: PathBuf,
    image: DynamicImage,
    pub frame: CropFrame,
}

impl PendingRegistration {
    pub fn name(&self) -> &CharacterName {
        &self.name
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}

#[derive(Clone, Debug)]
pub struct CharacterRegistry {
    project_dir: PathBuf,
    spec: PortraitSpec,
    characters: Vec<Character>,
}

impl CharacterRegistry {
    pub fn new(project_dir: impl Into<PathBuf>, spec: PortraitSpec) -> Self {
        Self {
            project_dir: project_dir.into(),
            spec,
            characters: Vec::new(),
        }
    }

    pub fn from_config(config: &ProjectConfig) -> Self {
        Self::new(config.project_dir.clone(), PortraitSpec::from(config))
    }

    /// Rebuilds the registry from portraits already present in the project
    /// directory. Only `.jpg` files of the configured thumbnail size count.
    /// A missing directory yields an empty registry.
    pub fn discover(project_dir: impl Into<PathBuf>, spec: PortraitSpec) -> ScriptResult<Self> {
        let mut registry = Self::new(project_dir, spec);
        if !registry.project_dir.is_dir() {
            return Ok(registry);
        }
        let walker = WalkDir::new(&registry.project_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();
        for entry in walker {
            let entry = entry.map_err(|err| {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| registry.project_dir.clone());
                ScriptError::file(path, err.into())
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || !has_extension(path, &[PORTRAIT_EXTENSION]) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if !is_valid_name(stem) {
                debug!("skipping portrait with invalid name: {}", path.display());
                continue;
            }
            let size = registry.spec.thumbnail_size;
            match image::image_dimensions(path) {
                Ok(dims) if dims == (size, size) => {}
                Ok((width, height)) => {
                    debug!(
                        "skipping {}: {width}x{height} is not a {size}x{size} portrait",
                        path.display()
                    );
                    continue;
                }
                Err(err) => {
                    debug!("skipping unreadable portrait {}: {err}", path.display());
                    continue;
                }
            }
            let name = CharacterName::parse(stem)?;
            if registry.lookup(name.as_str()).is_some() {
                warn!("duplicate portrait for '{name}', keeping the first one");
                continue;
            }
            registry.characters.push(Character {
                name,
                portrait_path: path.to_path_buf(),
            });
        }
        registry.characters.sort_by(|a, b| a.name.cmp(&b.name));
        info!(
            "discovered {} character(s) in {}",
            registry.characters.len(),
            registry.project_dir.display()
        );
        Ok(registry)
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn spec(&self) -> PortraitSpec {
        self.spec
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Characters in registration order.
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.characters.iter().map(|character| character.name.as_str())
    }

    pub fn first(&self) -> Option<&Character> {
        self.characters.first()
    }

    pub fn lookup(&self, name: &str) -> Option<&Character> {
        self.characters
            .iter()
            .find(|character| character.name.as_str() == name)
    }

    pub fn image_name(&self, name: &str) -> Option<String> {
        self.lookup(name).map(Character::image_name)
    }

    /// Validates the name and decodes the source image.
    ///
    /// The name is checked before the image so a bad name is reported even
    /// when no image was dropped yet.
    pub fn begin(
        &self,
        image_source: Option<&Path>,
        name: &str,
    ) -> ScriptResult<PendingRegistration> {
        let name = CharacterName::parse(name)?;
        let source_path = image_source.ok_or(ScriptError::MissingImage)?;
        if !has_extension(source_path, &SOURCE_EXTENSIONS) {
            return Err(ScriptError::UnsupportedImage(
                source_path.display().to_string(),
            ));
        }
        let image = image::open(source_path).map_err(|err| match err {
            ImageError::IoError(io) => ScriptError::file(source_path, io),
            other => ScriptError::ImageDecode {
                path: source_path.to_path_buf(),
                message: other.to_string(),
            },
        })?;
        let frame = CropFrame::new(
            [image.width(), image.height()],
            self.spec.preview_max,
            self.spec.crop_window,
        );
        debug!(
            "registration for '{name}' opened on {}x{} image",
            image.width(),
            image.height()
        );
        Ok(PendingRegistration {
            name,
            source_path: source_path.to_path_buf(),
            image,
            frame,
        })
    }

    /// Crops, resizes and stores the portrait, then records the mapping.
    ///
    /// The mapping is only touched once the file has been written.
    pub fn commit(&mut self, pending: PendingRegistration) -> ScriptResult<&Character> {
        let thumbnail = pending
            .frame
            .apply(&pending.image, self.spec.thumbnail_size)
            .to_rgb8();
        let portrait_path = self
            .project_dir
            .join(format!("{}.{PORTRAIT_EXTENSION}", pending.name));

        let mut encoded = Vec::new();
        JpegEncoder::new_with_quality(&mut encoded, self.spec.jpeg_quality)
            .encode_image(&thumbnail)
            .map_err(|err| ScriptError::ImageEncode {
                path: portrait_path.clone(),
                message: err.to_string(),
            })?;
        std::fs::create_dir_all(&self.project_dir)
            .map_err(|err| ScriptError::file(&self.project_dir, err))?;
        std::fs::write(&portrait_path, &encoded)
            .map_err(|err| ScriptError::file(&portrait_path, err))?;

        info!(
            "registered '{}' -> {}",
            pending.name,
            portrait_path.display()
        );
        let character = Character {
            name: pending.name,
            portrait_path,
        };
        let index = match self
            .characters
            .iter()
            .position(|existing| existing.name == character.name)
        {
            Some(index) => {
                self.characters[index] = character;
                index
            }
            None => {
                self.characters.push(character);
                self.characters.len() - 1
            }
        };
        Ok(&self.characters[index])
    }

    /// One-shot registration with the crop window placed at `origin`.
    pub fn register(
        &mut self,
        image_source: Option<&Path>,
        name: &str,
        origin: [f32; 2],
    ) -> ScriptResult<&Character> {
        let mut pending = self.begin(image_source, name)?;
        pending.frame.move_to(origin[0], origin[1]);
        self.commit(pending)
    }

    /// Resolves the on-disk path of a portrait referenced by file name.
    pub fn portrait_for_image(&self, image_name: &str) -> Option<PathBuf> {
        if image_name.is_empty() || image_name_of(Path::new(image_name)) != image_name {
            return None;
        }
        let path = self.project_dir.join(image_name);
        path.is_file().then_some(path)
    }
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .is_some_and(|ext| allowed.contains(&ext.as_str()))
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
