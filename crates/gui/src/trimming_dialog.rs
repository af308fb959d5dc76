use eframe::egui;
use image::imageops::FilterType;
use script_writer_core::PendingRegistration;

use crate::textures::upload_exact;

/// Outcome of one frame of the trimming dialog.
pub enum TrimmingOutcome {
    Open,
    Confirmed,
    Cancelled,
}

/// Shows the source image with a fixed-size, draggable crop window.
pub struct TrimmingDialog {
    pub pending: PendingRegistration,
    preview: Option<egui::TextureHandle>,
}

impl TrimmingDialog {
    pub fn new(pending: PendingRegistration) -> Self {
        Self {
            pending,
            preview: None,
        }
    }

    pub fn show(&mut self, ctx: &egui::Context) -> TrimmingOutcome {
        let [shown_w, shown_h] = self.pending.frame.shown_size();
        if self.preview.is_none() {
            let scaled = self
                .pending
                .image()
                .resize_exact(shown_w, shown_h, FilterType::Triangle);
            self.preview = Some(upload_exact(ctx, "trimming_preview", &scaled));
        }

        let mut outcome = TrimmingOutcome::Open;
        let mut open = true;
        egui::Window::new(format!("Crop portrait: {}", self.pending.name()))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Drag the red frame over the face, then confirm.");
                let size = egui::vec2(shown_w as f32, shown_h as f32);
                let (response, painter) = ui.allocate_painter(size, egui::Sense::drag());
                if response.dragged() {
                    let delta = response.drag_delta();
                    self.pending.frame.move_by(delta.x, delta.y);
                }

                let canvas = response.rect;
                if let Some(texture) = &self.preview {
                    painter.image(
                        texture.id(),
                        canvas,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }
                let [x, y] = self.pending.frame.origin();
                let window = self.pending.frame.window() as f32;
                let selection = egui::Rect::from_min_size(
                    canvas.min + egui::vec2(x, y),
                    egui::vec2(window, window),
                );
                painter.rect_stroke(selection, 0.0, egui::Stroke::new(2.0, egui::Color32::RED));

                ui.horizontal(|ui| {
                    if ui.button("Confirm crop").clicked() {
                        outcome = TrimmingOutcome::Confirmed;
                    }
                    if ui.button("Cancel").clicked() {
                        outcome = TrimmingOutcome::Cancelled;
                    }
                });
            });
        if !open {
            outcome = TrimmingOutcome::Cancelled;
        }
        outcome
    }
}
