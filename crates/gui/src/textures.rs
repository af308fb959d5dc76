use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use eframe::egui;
use image::DynamicImage;
use tracing::warn;

/// Largest edge uploaded for a preview texture.
const MAX_PREVIEW_EDGE: u32 = 256;

/// Portrait and drop-preview textures keyed by file path.
///
/// Paths that failed to load are remembered so a broken file is reported
/// once instead of every frame.
#[derive(Default)]
pub struct PortraitTextures {
    cache: HashMap<PathBuf, egui::TextureHandle>,
    failed: HashSet<PathBuf>,
}

impl PortraitTextures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, ctx: &egui::Context, path: &Path) -> Option<egui::TextureHandle> {
        if let Some(texture) = self.cache.get(path) {
            return Some(texture.clone());
        }
        if self.failed.contains(path) {
            return None;
        }
        match image::open(path) {
            Ok(image) => {
                let texture = upload(ctx, &path.display().to_string(), &image);
                self.cache.insert(path.to_path_buf(), texture.clone());
                Some(texture)
            }
            Err(err) => {
                warn!("could not load preview {}: {err}", path.display());
                self.failed.insert(path.to_path_buf());
                None
            }
        }
    }

    /// Drops a cached texture, e.g. after a portrait file was rewritten.
    pub fn invalidate(&mut self, path: &Path) {
        self.cache.remove(path);
        self.failed.remove(path);
    }
}

/// Uploads `image`, shrunk so its longest edge is at most [`MAX_PREVIEW_EDGE`].
pub fn upload(ctx: &egui::Context, name: &str, image: &DynamicImage) -> egui::TextureHandle {
    let scaled = if image.width().max(image.height()) > MAX_PREVIEW_EDGE {
        image.thumbnail(MAX_PREVIEW_EDGE, MAX_PREVIEW_EDGE)
    } else {
        image.clone()
    };
    upload_exact(ctx, name, &scaled)
}

/// Uploads `image` at its own resolution.
pub fn upload_exact(ctx: &egui::Context, name: &str, image: &DynamicImage) -> egui::TextureHandle {
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    ctx.load_texture(
        name,
        egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()),
        egui::TextureOptions::LINEAR,
    )
}
