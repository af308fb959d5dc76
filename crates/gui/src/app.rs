use std::path::PathBuf;

use eframe::egui;
use rfd::FileDialog;
use script_writer_core::{EditorPhase, ExportFormat, ProjectConfig, ScriptError, ScriptSession};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::menu_bar::{render_menu_bar, MenuAction};
use crate::persist::UserPreferences;
use crate::registration_panel::{RegistrationAction, RegistrationForm, RegistrationPanel};
use crate::script_panel::{ScriptAction, ScriptPanel};
use crate::textures::PortraitTextures;
use crate::trimming_dialog::{TrimmingDialog, TrimmingOutcome};

#[derive(Debug, Error)]
pub enum GuiError {
    #[error("script error: {0}")]
    Script(#[from] ScriptError),
    #[error("gui error: {0}")]
    Gui(#[from] eframe::Error),
}

pub fn run_app(config: ProjectConfig) -> Result<(), GuiError> {
    let session = ScriptSession::open(&config)?;
    let prefs_path = UserPreferences::default_path();
    let prefs = UserPreferences::load_from(&prefs_path).unwrap_or_else(|err| {
        warn!("ignoring unreadable preferences {}: {err}", prefs_path.display());
        UserPreferences::default()
    });
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([prefs.window_width.max(320.0), prefs.window_height.max(240.0)])
            .with_title("Script Writer")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Script Writer",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_pixels_per_point(prefs.ui_scale.max(0.5));
            Box::new(ScriptWriterApp::new(session, config, prefs, prefs_path))
        }),
    )?;
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum View {
    Registration,
    Editing,
}

/// Modal warning shown after a failed user action.
struct Warning {
    title: String,
    message: String,
}

impl From<&ScriptError> for Warning {
    fn from(err: &ScriptError) -> Self {
        Self {
            title: err.category().label().to_string(),
            message: err.to_string(),
        }
    }
}

pub struct ScriptWriterApp {
    session: ScriptSession,
    config: ProjectConfig,
    prefs: UserPreferences,
    prefs_path: PathBuf,
    view: View,
    form: RegistrationForm,
    trimming: Option<TrimmingDialog>,
    textures: PortraitTextures,
    warning: Option<Warning>,
}

impl ScriptWriterApp {
    fn new(
        session: ScriptSession,
        config: ProjectConfig,
        prefs: UserPreferences,
        prefs_path: PathBuf,
    ) -> Self {
        let view = match session.phase() {
            EditorPhase::Editing => View::Editing,
            EditorPhase::Uninitialized | EditorPhase::Registering => View::Registration,
        };
        Self {
            session,
            config,
            prefs,
            prefs_path,
            view,
            form: RegistrationForm::default(),
            trimming: None,
            textures: PortraitTextures::new(),
            warning: None,
        }
    }

    fn report(&mut self, err: ScriptError) {
        error!("{err}");
        self.warning = Some(Warning::from(&err));
    }

    fn file_dialog(&self, title: &str, format: ExportFormat) -> FileDialog {
        let mut dialog = FileDialog::new()
            .set_title(title)
            .add_filter(format!("{} Files", format.label()), &[format.extension()]);
        if let Some(dir) = &self.prefs.last_script_dir {
            dialog = dialog.set_directory(dir);
        }
        dialog
    }

    fn handle_menu(&mut self, action: MenuAction) {
        match action {
            MenuAction::Save => {
                let Some(path) = self.file_dialog("Save script", ExportFormat::Json).save_file()
                else {
                    return;
                };
                match self.session.save(&path) {
                    Ok(entries) => {
                        info!("saved {} lines", entries.len());
                        self.remember(&path);
                    }
                    Err(err) => self.report(err),
                }
            }
            MenuAction::Load => {
                let Some(path) = self.file_dialog("Load script", ExportFormat::Json).pick_file()
                else {
                    return;
                };
                match self.session.load(&path) {
                    Ok(_) => {
                        self.remember(&path);
                        self.view = View::Editing;
                        let missing = self.session.unresolved_characters();
                        if !missing.is_empty() {
                            self.warning = Some(Warning {
                                title: "Unregistered characters".to_string(),
                                message: format!(
                                    "Register these characters to change their lines: {}",
                                    missing.join(", ")
                                ),
                            });
                        }
                    }
                    Err(err) => self.report(err),
                }
            }
            MenuAction::Export(format) => {
                let title = format!("Export {}", format.label());
                let Some(path) = self.file_dialog(&title, format).save_file() else {
                    return;
                };
                match self.session.export(&path, format) {
                    Ok(_) => self.remember(&path),
                    Err(err) => self.report(err),
                }
            }
            MenuAction::RegisterCharacter => self.view = View::Registration,
        }
    }

    fn handle_registration(&mut self, action: RegistrationAction) {
        match action {
            RegistrationAction::Submit => {
                match self
                    .session
                    .begin_registration(self.form.image_path.as_deref(), &self.form.name)
                {
                    Ok(pending) => self.trimming = Some(TrimmingDialog::new(pending)),
                    Err(err) => self.report(err),
                }
            }
            RegistrationAction::BackToScript => self.view = View::Editing,
        }
    }

    fn handle_script(&mut self, action: ScriptAction) {
        let result = match action {
            ScriptAction::AddEntry => self.session.add_entry().map(|_| ()),
            ScriptAction::ChangeCharacter { row, name } => {
                self.session.change_character(row, &name)
            }
        };
        if let Err(err) = result {
            self.report(err);
        }
    }

    fn show_trimming(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.trimming.as_mut() else {
            return;
        };
        match dialog.show(ctx) {
            TrimmingOutcome::Open => {}
            TrimmingOutcome::Cancelled => self.trimming = None,
            TrimmingOutcome::Confirmed => {
                let Some(dialog) = self.trimming.take() else {
                    return;
                };
                let stored = self
                    .session
                    .confirm_registration(dialog.pending)
                    .map(|character| character.portrait_path.clone());
                match stored {
                    Ok(path) => {
                        self.textures.invalidate(&path);
                        self.form.clear();
                        self.view = View::Editing;
                    }
                    Err(err) => self.report(err),
                }
            }
        }
    }

    fn show_warning(&mut self, ctx: &egui::Context) {
        let Some(warning) = &self.warning else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new(warning.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(warning.message.as_str());
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.warning = None;
        }
    }

    fn remember(&mut self, path: &std::path::Path) {
        self.prefs.remember_dir_of(path);
        self.persist_preferences();
    }

    fn track_window_size(&mut self, ctx: &egui::Context) {
        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.prefs.remember_window_size(rect.width(), rect.height());
        }
    }

    fn persist_preferences(&self) {
        if let Err(err) = self.prefs.save_to(&self.prefs_path) {
            warn!("failed to save preferences: {err}");
        }
    }
}

impl eframe::App for ScriptWriterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let modal_open = self.warning.is_some() || self.trimming.is_some();

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.add_enabled_ui(!modal_open, |ui| {
                if let Some(action) = render_menu_bar(ui) {
                    self.handle_menu(action);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!modal_open, |ui| match self.view {
                View::Registration => {
                    let can_go_back = self.session.phase() == EditorPhase::Editing;
                    let action =
                        RegistrationPanel::new(&mut self.form, &mut self.textures, can_go_back)
                            .ui(ui);
                    if let Some(action) = action {
                        self.handle_registration(action);
                    }
                }
                View::Editing => {
                    let preview = self.config.row_preview_size as f32;
                    let actions =
                        ScriptPanel::new(&mut self.session, &mut self.textures, preview).ui(ui);
                    for action in actions {
                        self.handle_script(action);
                    }
                }
            });
        });

        self.show_trimming(ctx);
        self.show_warning(ctx);
        self.track_window_size(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.persist_preferences();
    }
}
