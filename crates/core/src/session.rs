//! Editing session: the registry, the dialogue rows and the file actions
//! that any front end drives.
//!
//! # Phases
//! `Uninitialized → Registering → Editing`. The session leaves
//! `Registering` once the first character is stored; save, load and export
//! keep it in `Editing`. Failed operations leave every field untouched.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::character::Character;
use crate::config::ProjectConfig;
use crate::document::{DialogueEntry, RowId, ScriptEditor};
use crate::error::ScriptResult;
use crate::registry::{CharacterRegistry, PendingRegistration, PortraitSpec};
use crate::script_io::{self, ExportFormat};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditorPhase {
    #[default]
    Uninitialized,
    /// No character registered yet; the editing view is unavailable.
    Registering,
    Editing,
}

#[derive(Debug)]
pub struct ScriptSession {
    phase: EditorPhase,
    registry: CharacterRegistry,
    editor: ScriptEditor,
    script_path: Option<PathBuf>,
}

impl Default for ScriptSession {
    fn default() -> Self {
        Self {
            phase: EditorPhase::Uninitialized,
            registry: CharacterRegistry::from_config(&ProjectConfig::default()),
            editor: ScriptEditor::new(),
            script_path: None,
        }
    }
}

impl ScriptSession {
    /// Opens a session over `config.project_dir`, picking up portraits that
    /// were registered in earlier runs.
    #[instrument(skip(config), fields(project_dir = %config.project_dir.display()))]
    pub fn open(config: &ProjectConfig) -> ScriptResult<Self> {
        let registry =
            CharacterRegistry::discover(config.project_dir.clone(), PortraitSpec::from(config))?;
        Ok(Self::with_registry(registry))
    }

    pub fn with_registry(registry: CharacterRegistry) -> Self {
        let phase = if registry.is_empty() {
            EditorPhase::Registering
        } else {
            EditorPhase::Editing
        };
        Self {
            phase,
            registry,
            editor: ScriptEditor::new(),
            script_path: None,
        }
    }

    pub fn phase(&self) -> EditorPhase {
        self.phase
    }

    pub fn registry(&self) -> &CharacterRegistry {
        &self.registry
    }

    pub fn editor(&self) -> &ScriptEditor {
        &self.editor
    }

    /// Last path the script was saved to or loaded from.
    pub fn script_path(&self) -> Option<&Path> {
        self.script_path.as_deref()
    }

    pub fn begin_registration(
        &self,
        image_source: Option<&Path>,
        name: &str,
    ) -> ScriptResult<PendingRegistration> {
        self.registry.begin(image_source, name)
    }

    #[instrument(skip(self, pending), fields(name = %pending.name()))]
    pub fn confirm_registration(
        &mut self,
        pending: PendingRegistration,
    ) -> ScriptResult<&Character> {
        let character = self.registry.commit(pending)?;
        self.phase = EditorPhase::Editing;
        Ok(character)
    }

    /// Registers with the crop window at `origin`, in one step.
    pub fn register(
        &mut self,
        image_source: Option<&Path>,
        name: &str,
        origin: [f32; 2],
    ) -> ScriptResult<&Character> {
        let mut pending = self.begin_registration(image_source, name)?;
        pending.frame.move_to(origin[0], origin[1]);
        self.confirm_registration(pending)
    }

    pub fn add_entry(&mut self) -> ScriptResult<RowId> {
        self.editor.add_entry(&self.registry)
    }

    pub fn change_character(&mut self, row: RowId, new_name: &str) -> ScriptResult<()> {
        self.editor.change_character(row, new_name, &self.registry)
    }

    pub fn set_text(&mut self, row: RowId, text: impl Into<String>) -> ScriptResult<()> {
        self.editor.set_text(row, text)
    }

    pub fn text_mut(&mut self, row: RowId) -> ScriptResult<&mut String> {
        self.editor.text_mut(row)
    }

    pub fn materialize(&self) -> Vec<DialogueEntry> {
        self.editor.materialize()
    }

    pub fn rehydrate(&mut self, entries: &[DialogueEntry]) {
        self.editor.rehydrate(entries);
        let missing = self.editor.unresolved_characters(&self.registry);
        if !missing.is_empty() {
            warn!("script references unregistered characters: {}", missing.join(", "));
        }
    }

    #[instrument(skip(self))]
    pub fn save(&mut self, path: &Path) -> ScriptResult<Vec<DialogueEntry>> {
        let entries = self.materialize();
        script_io::save_json(path, &entries)?;
        self.script_path = Some(path.to_path_buf());
        Ok(entries)
    }

    /// Replaces the rows with the script at `path`. The file is parsed in
    /// full before any row is touched.
    #[instrument(skip(self))]
    pub fn load(&mut self, path: &Path) -> ScriptResult<usize> {
        let entries = script_io::load_json(path)?;
        self.rehydrate(&entries);
        self.script_path = Some(path.to_path_buf());
        info!("editor now holds {} rows", self.editor.len());
        Ok(entries.len())
    }

    #[instrument(skip(self))]
    pub fn export(&self, path: &Path, format: ExportFormat) -> ScriptResult<Vec<DialogueEntry>> {
        let entries = self.materialize();
        script_io::export(path, &entries, format)?;
        Ok(entries)
    }

    /// Names referenced by rows that the registry cannot resolve.
    pub fn unresolved_characters(&self) -> Vec<String> {
        self.editor.unresolved_characters(&self.registry)
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
