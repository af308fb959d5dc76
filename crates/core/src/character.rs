use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ScriptError, ScriptResult};

/// A character name restricted to `[A-Za-z0-9_]+`.
///
/// The name doubles as the portrait file stem, so the restriction keeps it
/// safe to join onto the project directory.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CharacterName(String);

impl CharacterName {
    /// Validates `raw` after trimming surrounding whitespace.
    pub fn parse(raw: &str) -> ScriptResult<Self> {
        let trimmed = raw.trim();
        if is_valid_name(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ScriptError::InvalidName(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

impl fmt::Display for CharacterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CharacterName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CharacterName {
    type Error = ScriptError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CharacterName> for String {
    fn from(value: CharacterName) -> Self {
        value.0
    }
}

/// A registered character and the normalized portrait stored for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Character {
    pub name: CharacterName,
    pub portrait_path: PathBuf,
}

impl Character {
    /// File name of the portrait, as written into script entries.
    pub fn image_name(&self) -> String {
        image_name_of(&self.portrait_path)
    }
}

pub(crate) fn image_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
