//! Dialogue rows being edited and their projection into script entries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ScriptError, ScriptResult};
use crate::registry::CharacterRegistry;

/// One line of the saved script.
///
/// Field order and names match the on-disk JSON and CSV layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueEntry {
    pub image_name: String,
    pub character_name: String,
    pub line_number: u32,
    #[serde(rename = "dialogue")]
    pub dialogue_text: String,
}

/// Stable identity of an editor row, independent of its position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

impl RowId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// View-model for one editable dialogue row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogueRow {
    id: RowId,
    pub character_name: String,
    pub image_name: String,
    pub text: String,
}

impl DialogueRow {
    pub fn id(&self) -> RowId {
        self.id
    }
}

#[derive(Clone, Debug, Default)]
pub struct ScriptEditor {
    rows: Vec<DialogueRow>,
    next_id: u64,
}

impl ScriptEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[DialogueRow] {
        &self.rows
    }

    pub fn row(&self, id: RowId) -> Option<&DialogueRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row bound to the first registered character.
    pub fn add_entry(&mut self, registry: &CharacterRegistry) -> ScriptResult<RowId> {
        let character = registry.first().ok_or(ScriptError::EmptyRegistry)?;
        let row = DialogueRow {
            id: self.allocate_id(),
            character_name: character.name.to_string(),
            image_name: character.image_name(),
            text: String::new(),
        };
        let id = row.id;
        self.rows.push(row);
        Ok(id)
    }

    /// Rebinds a row to another registered character; the text is untouched.
    pub fn change_character(
        &mut self,
        id: RowId,
        new_name: &str,
        registry: &CharacterRegistry,
    ) -> ScriptResult<()> {
        let character = registry
            .lookup(new_name)
            .ok_or_else(|| ScriptError::UnknownCharacter(new_name.to_string()))?;
        let image_name = character.image_name();
        let row = self.row_mut(id)?;
        row.character_name = character.name.to_string();
        row.image_name = image_name;
        Ok(())
    }

    pub fn set_text(&mut self, id: RowId, text: impl Into<String>) -> ScriptResult<()> {
        self.row_mut(id)?.text = text.into();
        Ok(())
    }

    /// Mutable access to a row's text buffer, for widgets that edit in place.
    pub fn text_mut(&mut self, id: RowId) -> ScriptResult<&mut String> {
        Ok(&mut self.row_mut(id)?.text)
    }

    /// Projects the rows into script entries.
    ///
    /// Rows with empty text are skipped and the remaining rows are numbered
    /// densely from 1 in display order.
    pub fn materialize(&self) -> Vec<DialogueEntry> {
        self.rows
            .iter()
            .filter(|row| !row.text.is_empty())
            .zip(1u32..)
            .map(|(row, line_number)| DialogueEntry {
                image_name: row.image_name.clone(),
                character_name: row.character_name.clone(),
                line_number,
                dialogue_text: row.text.clone(),
            })
            .collect()
    }

    /// Replaces every row with one row per entry, in the given order.
    pub fn rehydrate(&mut self, entries: &[DialogueEntry]) {
        self.rows.clear();
        for entry in entries {
            let row = DialogueRow {
                id: self.allocate_id(),
                character_name: entry.character_name.clone(),
                image_name: entry.image_name.clone(),
                text: entry.dialogue_text.clone(),
            };
            self.rows.push(row);
        }
    }

    /// Character names referenced by rows but missing from `registry`,
    /// deduplicated in first-seen order.
    pub fn unresolved_characters(&self, registry: &CharacterRegistry) -> Vec<String> {
        let mut missing: Vec<String> = Vec::new();
        for row in &self.rows {
            if registry.lookup(&row.character_name).is_none()
                && !missing.contains(&row.character_name)
            {
                missing.push(row.character_name.clone());
            }
        }
        missing
    }

    fn row_mut(&mut self, id: RowId) -> ScriptResult<&mut DialogueRow> {
        self.rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(ScriptError::UnknownRow(id.raw()))
    }

    fn allocate_id(&mut self) -> RowId {
        let id = RowId(self.next_id);
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
#[path = "tests/document_tests.rs"]
mod tests;
