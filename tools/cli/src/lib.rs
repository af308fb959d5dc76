//! Headless commands over the script writer core, shared by the
//! `script-writer` binary and its tests.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use script_writer_core::{
    script_io, CharacterName, DialogueEntry, ExportFormat, ProjectConfig, ScriptEditor,
    ScriptSession,
};
use serde::Serialize;
use tracing::info;

/// What `validate` found in a script file.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ScriptSummary {
    pub entries: usize,
    pub characters: BTreeSet<String>,
    pub empty_lines: usize,
    pub dense: bool,
}

/// Registers `image` as `name` in the configured project directory and
/// returns the stored portrait path.
pub fn register_character(
    config: &ProjectConfig,
    image: &Path,
    name: &str,
    origin: [f32; 2],
) -> Result<PathBuf> {
    let mut session = ScriptSession::open(config)
        .with_context(|| format!("open project {}", config.project_dir.display()))?;
    let character = session
        .register(Some(image), name, origin)
        .with_context(|| format!("register {name} from {}", image.display()))?;
    info!(
        "registered {} -> {}",
        character.name,
        character.portrait_path.display()
    );
    Ok(character.portrait_path.clone())
}

pub fn validate_script(path: &Path) -> Result<ScriptSummary> {
    let entries = read_script(path)?;
    let mut characters = BTreeSet::new();
    for entry in &entries {
        let name = CharacterName::parse(&entry.character_name)
            .with_context(|| format!("line {}", entry.line_number))?;
        if entry.image_name.contains(['/', '\\']) {
            bail!(
                "line {}: image name {:?} must be a bare file name",
                entry.line_number,
                entry.image_name
            );
        }
        characters.insert(name.to_string());
    }
    let empty_lines = entries.iter().filter(|e| e.dialogue_text.is_empty()).count();
    let dense = entries
        .iter()
        .zip(1u32..)
        .all(|(entry, expected)| entry.line_number == expected);
    Ok(ScriptSummary {
        entries: entries.len(),
        characters,
        empty_lines,
        dense,
    })
}

/// Writes `script` to `output` in `format`, renumbered and without empty
/// lines. Returns the number of entries written.
pub fn export_script(script: &Path, format: ExportFormat, output: &Path) -> Result<usize> {
    let entries = normalize(&read_script(script)?);
    script_io::export(output, &entries, format)
        .with_context(|| format!("write {}", output.display()))?;
    Ok(entries.len())
}

pub fn renumber_script(script: &Path, output: &Path) -> Result<usize> {
    export_script(script, ExportFormat::Json, output)
}

fn read_script(path: &Path) -> Result<Vec<DialogueEntry>> {
    script_io::load_json(path).with_context(|| format!("read script {}", path.display()))
}

fn normalize(entries: &[DialogueEntry]) -> Vec<DialogueEntry> {
    let mut editor = ScriptEditor::new();
    editor.rehydrate(entries);
    editor.materialize()
}
