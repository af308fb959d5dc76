//! Fixed-size crop window over a scaled preview of a source image.
//!
//! The user positions the window in preview coordinates; [`CropFrame::source_rect`]
//! maps it back onto source pixels using the source-to-preview ratio.

use image::imageops::FilterType;
use image::DynamicImage;

/// Axis-aligned rectangle in source image pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CropFrame {
    source_size: [u32; 2],
    shown_size: [u32; 2],
    window: u32,
    origin: [f32; 2],
}

impl CropFrame {
    /// Fits `source_size` inside a `preview_max` square (aspect preserved) and
    /// places a `window`-sized selection at the top-left corner.
    pub fn new(source_size: [u32; 2], preview_max: u32, window: u32) -> Self {
        let shown_size = fit_within(source_size, preview_max.max(1));
        Self {
            source_size,
            shown_size,
            window: window.max(1),
            origin: [0.0, 0.0],
        }
    }

    pub fn source_size(&self) -> [u32; 2] {
        self.source_size
    }

    /// Size of the preview the window is positioned over.
    pub fn shown_size(&self) -> [u32; 2] {
        self.shown_size
    }

    pub fn window(&self) -> u32 {
        self.window
    }

    pub fn origin(&self) -> [f32; 2] {
        self.origin
    }

    /// Moves the window's top-left corner, keeping it inside the preview.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.origin = [
            clamp_axis(x, self.shown_size[0], self.window),
            clamp_axis(y, self.shown_size[1], self.window),
        ];
    }

    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.move_to(self.origin[0] + dx, self.origin[1] + dy);
    }

    /// Ratio of source pixels per preview pixel.
    pub fn scale(&self) -> f32 {
        let sx = self.source_size[0] as f32 / self.shown_size[0].max(1) as f32;
        let sy = self.source_size[1] as f32 / self.shown_size[1].max(1) as f32;
        sx.min(sy)
    }

    /// Maps the window onto source pixels, clipped to the source bounds.
    pub fn source_rect(&self) -> CropRect {
        let scale = self.scale();
        let window = self.window as f32;
        let [src_w, src_h] = self.source_size;
        let x0 = ((self.origin[0] * scale) as u32).min(src_w.saturating_sub(1));
        let y0 = ((self.origin[1] * scale) as u32).min(src_h.saturating_sub(1));
        let x1 = (((self.origin[0] + window) * scale) as u32).min(src_w);
        let y1 = (((self.origin[1] + window) * scale) as u32).min(src_h);
        CropRect {
            x: x0,
            y: y0,
            width: x1.saturating_sub(x0).max(1),
            height: y1.saturating_sub(y0).max(1),
        }
    }

    /// Crops `image` to the selection and resizes it to a `thumbnail` square.
    pub fn apply(&self, image: &DynamicImage, thumbnail: u32) -> DynamicImage {
        let rect = self.source_rect();
        image
            .crop_imm(rect.x, rect.y, rect.width, rect.height)
            .resize_exact(thumbnail, thumbnail, FilterType::Lanczos3)
    }
}

fn fit_within(size: [u32; 2], bound: u32) -> [u32; 2] {
    let [width, height] = [size[0].max(1), size[1].max(1)];
    let factor = (bound as f32 / width as f32).min(bound as f32 / height as f32);
    [
        ((width as f32 * factor).round() as u32).max(1),
        ((height as f32 * factor).round() as u32).max(1),
    ]
}

fn clamp_axis(value: f32, shown: u32, window: u32) -> f32 {
    let max = shown.saturating_sub(window) as f32;
    if value.is_finite() {
        value.clamp(0.0, max)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};

    #[test]
    fn wide_image_fits_preview_width() {
        let frame = CropFrame::new([1000, 500], 500, 100);
        assert_eq!(frame.shown_size(), [500, 250]);
        assert!((frame.scale() - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn small_image_is_scaled_up_to_the_preview() {
        let frame = CropFrame::new([50, 100], 500, 100);
        assert_eq!(frame.shown_size(), [250, 500]);
        let rect = frame.source_rect();
        assert_eq!(rect, CropRect { x: 0, y: 0, width: 20, height: 20 });
    }

    #[test]
    fn window_maps_back_by_ratio() {
        let mut frame = CropFrame::new([2000, 2000], 500, 100);
        frame.move_to(100.0, 50.0);
        assert_eq!(
            frame.source_rect(),
            CropRect {
                x: 400,
                y: 200,
                width: 400,
                height: 400
            }
        );
    }

    #[test]
    fn window_is_clamped_inside_the_preview() {
        let mut frame = CropFrame::new([1000, 500], 500, 100);
        frame.move_to(900.0, -20.0);
        assert_eq!(frame.origin(), [400.0, 0.0]);
        frame.move_by(0.0, 1000.0);
        assert_eq!(frame.origin(), [400.0, 150.0]);
        let rect = frame.source_rect();
        assert!(rect.x + rect.width <= 1000);
        assert!(rect.y + rect.height <= 500);
    }

    #[test]
    fn apply_produces_square_thumbnail_from_selected_region() {
        let mut source = RgbaImage::from_pixel(400, 400, Rgba([0, 0, 255, 255]));
        for x in 200..400 {
            for y in 200..400 {
                source.put_pixel(x, y, Rgba([255, 0, 0, 255]));
            }
        }
        let image = DynamicImage::ImageRgba8(source);
        let mut frame = CropFrame::new([400, 400], 400, 100);
        frame.move_to(250.0, 250.0);

        let thumb = frame.apply(&image, 64);
        assert_eq!(thumb.dimensions(), (64, 64));
        let Rgba([red, _, blue, _]) = thumb.get_pixel(32, 32);
        assert!(red > 250 && blue < 5, "expected the red quadrant");
    }
}
