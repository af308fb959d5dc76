use std::path::PathBuf;

use eframe::egui;
use rfd::FileDialog;
use script_writer_core::SOURCE_EXTENSIONS;

use crate::textures::PortraitTextures;

/// Inputs of the registration view.
#[derive(Default)]
pub struct RegistrationForm {
    pub image_path: Option<PathBuf>,
    pub name: String,
}

impl RegistrationForm {
    pub fn clear(&mut self) {
        self.image_path = None;
        self.name.clear();
    }
}

pub enum RegistrationAction {
    Submit,
    BackToScript,
}

pub struct RegistrationPanel<'a> {
    form: &'a mut RegistrationForm,
    textures: &'a mut PortraitTextures,
    can_go_back: bool,
}

impl<'a> RegistrationPanel<'a> {
    pub fn new(
        form: &'a mut RegistrationForm,
        textures: &'a mut PortraitTextures,
        can_go_back: bool,
    ) -> Self {
        Self {
            form,
            textures,
            can_go_back,
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) -> Option<RegistrationAction> {
        self.accept_dropped_files(ui.ctx());

        let mut action = None;
        ui.vertical_centered(|ui| {
            ui.heading("Register character");
            ui.add_space(8.0);
            self.drop_zone(ui);
            ui.add_space(8.0);

            if ui.button("Browse for image...").clicked() {
                if let Some(path) = FileDialog::new()
                    .add_filter("Images", &SOURCE_EXTENSIONS)
                    .pick_file()
                {
                    self.form.image_path = Some(path);
                }
            }
            ui.add_space(8.0);
            ui.add(
                egui::TextEdit::singleline(&mut self.form.name)
                    .hint_text("Character name (letters, digits, _)")
                    .desired_width(240.0),
            );
            ui.add_space(8.0);
            if ui.button("Register").clicked() {
                action = Some(RegistrationAction::Submit);
            }
            if self.can_go_back && ui.button("Back to script").clicked() {
                action = Some(RegistrationAction::BackToScript);
            }
        });
        action
    }

    fn accept_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .find_map(|file| file.path.clone())
        });
        if let Some(path) = dropped {
            self.form.image_path = Some(path);
        }
    }

    fn drop_zone(&mut self, ui: &mut egui::Ui) {
        let hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
        let stroke_color = if hovering {
            egui::Color32::LIGHT_BLUE
        } else {
            egui::Color32::GRAY
        };
        egui::Frame::none()
            .stroke(egui::Stroke::new(2.0, stroke_color))
            .inner_margin(egui::Margin::same(20.0))
            .show(ui, |ui| {
                ui.set_min_size(egui::vec2(240.0, 120.0));
                match self.form.image_path.clone() {
                    Some(path) => {
                        if let Some(texture) = self.textures.get(ui.ctx(), &path) {
                            ui.add(egui::Image::new((texture.id(), egui::vec2(100.0, 100.0))));
                        }
                        ui.label(
                            path.file_name()
                                .map(|name| name.to_string_lossy().into_owned())
                                .unwrap_or_default(),
                        );
                    }
                    None => {
                        ui.label("Drop an image here");
                    }
                }
            });
    }
}
