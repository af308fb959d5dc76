use eframe::egui;
use script_writer_core::{RowId, ScriptSession};

use crate::textures::PortraitTextures;

/// Edits requested by the script view, applied after rendering.
#[derive(Debug, PartialEq, Eq)]
pub enum ScriptAction {
    AddEntry,
    ChangeCharacter { row: RowId, name: String },
}

pub struct ScriptPanel<'a> {
    session: &'a mut ScriptSession,
    textures: &'a mut PortraitTextures,
    preview_size: f32,
}

impl<'a> ScriptPanel<'a> {
    pub fn new(
        session: &'a mut ScriptSession,
        textures: &'a mut PortraitTextures,
        preview_size: f32,
    ) -> Self {
        Self {
            session,
            textures,
            preview_size,
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) -> Vec<ScriptAction> {
        let mut actions = Vec::new();
        let names: Vec<String> = self.session.registry().names().map(String::from).collect();
        let rows: Vec<(RowId, String, String)> = self
            .session
            .editor()
            .rows()
            .iter()
            .map(|row| (row.id(), row.character_name.clone(), row.image_name.clone()))
            .collect();

        let add_button_height = ui.spacing().interact_size.y + 8.0;
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .max_height((ui.available_height() - add_button_height).max(0.0))
            .show(ui, |ui| {
                if rows.is_empty() {
                    ui.label("No dialogue yet. Add a line to start.");
                }
                for (row, character_name, image_name) in rows {
                    ui.horizontal(|ui| {
                        let mut selected = character_name.clone();
                        egui::ComboBox::from_id_source(("character", row.raw()))
                            .selected_text(selected.clone())
                            .width(120.0)
                            .show_ui(ui, |ui| {
                                for name in &names {
                                    ui.selectable_value(&mut selected, name.clone(), name.as_str());
                                }
                            });
                        actions.extend(change_request(row, &character_name, &selected));

                        let portrait = self.portrait(ui, &character_name, &image_name);
                        let popup_id = ui.make_persistent_id(("portrait_picker", row.raw()));
                        if portrait.clicked() {
                            ui.memory_mut(|mem| mem.toggle_popup(popup_id));
                        }
                        egui::popup_below_widget(ui, popup_id, &portrait, |ui| {
                            ui.set_min_width(120.0);
                            for name in &names {
                                let current = *name == character_name;
                                if ui.selectable_label(current, name.as_str()).clicked() {
                                    actions.extend(change_request(row, &character_name, name));
                                    ui.memory_mut(|mem| mem.close_popup());
                                }
                            }
                        });

                        if let Ok(text) = self.session.text_mut(row) {
                            ui.add(
                                egui::TextEdit::multiline(text)
                                    .desired_rows(2)
                                    .desired_width(f32::INFINITY),
                            );
                        }
                    });
                    ui.separator();
                }
            });

        if ui.button("+ Add line").clicked() {
            actions.push(ScriptAction::AddEntry);
        }
        actions
    }

    /// Draws the row's portrait; clicking it opens the character picker.
    fn portrait(
        &mut self,
        ui: &mut egui::Ui,
        character_name: &str,
        image_name: &str,
    ) -> egui::Response {
        let size = egui::vec2(self.preview_size, self.preview_size);
        let registry = self.session.registry();
        let path = registry
            .portrait_for_image(image_name)
            .or_else(|| registry.lookup(character_name).map(|c| c.portrait_path.clone()));
        let texture = path.and_then(|path| self.textures.get(ui.ctx(), &path));
        egui::Frame::none()
            .stroke(egui::Stroke::new(1.0, egui::Color32::GRAY))
            .show(ui, |ui| match texture {
                Some(texture) => {
                    ui.add(egui::Image::new((texture.id(), size)));
                }
                None => {
                    ui.allocate_space(size);
                }
            })
            .response
            .interact(egui::Sense::click())
            .on_hover_cursor(egui::CursorIcon::PointingHand)
            .on_hover_text(image_name)
    }
}

/// A character change for `row`, unless `chosen` is already its character.
fn change_request(row: RowId, current: &str, chosen: &str) -> Option<ScriptAction> {
    (chosen != current).then(|| ScriptAction::ChangeCharacter {
        row,
        name: chosen.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use script_writer_core::{CharacterRegistry, PortraitSpec, ScriptEditor};

    fn first_row() -> RowId {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("face.png");
        image::RgbImage::new(120, 120).save(&source).expect("source");
        let mut registry =
            CharacterRegistry::new(dir.path().join("script_project"), PortraitSpec::default());
        registry
            .register(Some(&source), "Alice", [0.0, 0.0])
            .expect("register");
        let mut editor = ScriptEditor::new();
        editor.add_entry(&registry).expect("row")
    }

    #[test]
    fn picking_another_character_requests_a_change() {
        let row = first_row();
        assert_eq!(
            change_request(row, "Alice", "Bob"),
            Some(ScriptAction::ChangeCharacter {
                row,
                name: "Bob".to_string()
            })
        );
    }

    #[test]
    fn picking_the_current_character_is_a_no_op() {
        assert_eq!(change_request(first_row(), "Alice", "Alice"), None);
    }
}
