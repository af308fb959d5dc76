use eframe::egui;
use script_writer_core::ExportFormat;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Save,
    Load,
    Export(ExportFormat),
    RegisterCharacter,
}

pub fn render_menu_bar(ui: &mut egui::Ui) -> Option<MenuAction> {
    let mut action = None;
    egui::menu::bar(ui, |ui| {
        ui.menu_button("File", |ui| {
            let items = [
                ("Save", MenuAction::Save),
                ("Load", MenuAction::Load),
                ("Export CSV", MenuAction::Export(ExportFormat::Csv)),
                ("Export JSON", MenuAction::Export(ExportFormat::Json)),
                ("Register Character", MenuAction::RegisterCharacter),
            ];
            for (label, item) in items {
                if ui.button(label).clicked() {
                    action = Some(item);
                    ui.close_menu();
                }
            }
        });
    });
    action
}
