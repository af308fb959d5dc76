//! JSON script files and CSV/JSON exports.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::info;

use crate::document::DialogueEntry;
use crate::error::{ScriptError, ScriptResult};

pub const CSV_HEADER: [&str; 4] = ["image_name", "character_name", "line_number", "dialogue"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Csv => "CSV",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unknown export format '{other}' (expected json or csv)")),
        }
    }
}

/// Pretty-printed JSON array; non-ASCII text is written as-is.
pub fn to_json(entries: &[DialogueEntry]) -> ScriptResult<String> {
    serde_json::to_string_pretty(entries).map_err(|err| ScriptError::parse_message(err.to_string()))
}

pub fn from_json(input: &str) -> ScriptResult<Vec<DialogueEntry>> {
    let entries: Vec<DialogueEntry> =
        serde_json::from_str(input).map_err(|err| json_deserialize_error(input, &err))?;
    if let Some(bad) = entries.iter().position(|entry| entry.line_number == 0) {
        return Err(ScriptError::parse_message(format!(
            "entry {} has line_number 0; line numbers start at 1",
            bad + 1
        )));
    }
    Ok(entries)
}

pub fn to_csv(entries: &[DialogueEntry]) -> String {
    let mut output = CSV_HEADER.join(",");
    output.push('\n');
    for entry in entries {
        output.push_str(&format!(
            "{},{},{},{}\n",
            csv_escape(&entry.image_name),
            csv_escape(&entry.character_name),
            entry.line_number,
            csv_escape(&entry.dialogue_text),
        ));
    }
    output
}

pub fn save_json(path: &Path, entries: &[DialogueEntry]) -> ScriptResult<()> {
    let json = to_json(entries)?;
    write_file(path, &json)?;
    info!("saved {} entries to {}", entries.len(), path.display());
    Ok(())
}

/// Reads and fully validates a script file without touching any editor state.
pub fn load_json(path: &Path) -> ScriptResult<Vec<DialogueEntry>> {
    let raw = std::fs::read_to_string(path).map_err(|err| ScriptError::file(path, err))?;
    let entries = from_json(&raw)?;
    info!("loaded {} entries from {}", entries.len(), path.display());
    Ok(entries)
}

pub fn export(path: &Path, entries: &[DialogueEntry], format: ExportFormat) -> ScriptResult<()> {
    let payload = match format {
        ExportFormat::Json => to_json(entries)?,
        ExportFormat::Csv => to_csv(entries),
    };
    write_file(path, &payload)?;
    info!(
        "exported {} entries as {} to {}",
        entries.len(),
        format.label(),
        path.display()
    );
    Ok(())
}

/// Writes `contents` to `path`. The parent directory must already exist.
fn write_file(path: &Path, contents: &str) -> ScriptResult<()> {
    std::fs::write(path, contents).map_err(|err| ScriptError::file(path, err))
}

/// Quotes a field when it contains a separator, quote or line break.
fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cold]
#[inline(never)]
fn json_deserialize_error(input: &str, err: &serde_json::Error) -> ScriptError {
    let offset = json_error_offset(input, err);
    let (window, local_offset) = json_error_window(input, offset);
    let span_len = usize::from(local_offset < window.len());
    ScriptError::Parse {
        message: err.to_string(),
        src: window,
        span: (local_offset, span_len).into(),
    }
}

fn json_error_offset(input: &str, error: &serde_json::Error) -> usize {
    let (line, column) = (error.line(), error.column());
    if line == 0 || column == 0 {
        return 0;
    }
    let mut offset = 0usize;
    for (index, chunk) in input.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let byte_index = chunk
                .char_indices()
                .nth(column - 1)
                .map(|(idx, _)| idx)
                .unwrap_or(chunk.len().saturating_sub(1));
            return offset + byte_index;
        }
        offset += chunk.len();
    }
    input.len().saturating_sub(1)
}

fn json_error_window(input: &str, offset: usize) -> (String, usize) {
    const CONTEXT: usize = 120;
    let mut start = offset.saturating_sub(CONTEXT);
    let mut end = (offset + 1 + CONTEXT).min(input.len());
    while start > 0 && !input.is_char_boundary(start) {
        start -= 1;
    }
    while end < input.len() && !input.is_char_boundary(end) {
        end += 1;
    }
    (input[start..end].to_string(), offset.saturating_sub(start))
}

#[cfg(test)]
#[path = "tests/script_io_tests.rs"]
mod tests;
