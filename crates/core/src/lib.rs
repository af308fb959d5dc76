//! Data model and file formats for authoring visual-novel dialogue scripts.
//!
//! Characters are registered with a cropped, normalized portrait; dialogue
//! rows reference them by name and are saved as a flat JSON array or exported
//! as CSV. [`ScriptSession`] ties the pieces together for a front end.

mod character;
mod config;
mod crop;
mod document;
mod error;
mod registry;
pub mod script_io;
mod session;

pub use character::{is_valid_name, Character, CharacterName};
pub use config::{ProjectConfig, CONFIG_FILE_NAME};
pub use crop::{CropFrame, CropRect};
pub use document::{DialogueEntry, DialogueRow, RowId, ScriptEditor};
pub use error::{ErrorCategory, ScriptError, ScriptResult};
pub use registry::{
    CharacterRegistry, PendingRegistration, PortraitSpec, PORTRAIT_EXTENSION, SOURCE_EXTENSIONS,
};
pub use script_io::ExportFormat;
pub use session::{EditorPhase, ScriptSession};
