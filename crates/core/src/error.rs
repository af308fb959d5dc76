use std::path::PathBuf;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

pub type ScriptResult<T> = Result<T, ScriptError>;

/// Coarse classification used by front ends to pick a warning title.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Input,
    File,
    Parse,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Validation => "Invalid name",
            ErrorCategory::Input => "Missing input",
            ErrorCategory::File => "File error",
            ErrorCategory::Parse => "Malformed script",
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ScriptError {
    #[error("invalid character name '{0}': use only letters, digits and underscores")]
    #[diagnostic(code("script.invalid_name"))]
    InvalidName(String),
    #[error("no image selected for registration")]
    #[diagnostic(code("script.missing_image"))]
    MissingImage,
    #[error("unsupported image type: {0}")]
    #[diagnostic(code("script.unsupported_image"))]
    UnsupportedImage(String),
    #[error("could not decode image {}: {message}", path.display())]
    #[diagnostic(code("script.image_decode"))]
    ImageDecode { path: PathBuf, message: String },
    #[error("could not encode portrait {}: {message}", path.display())]
    #[diagnostic(code("script.image_encode"))]
    ImageEncode { path: PathBuf, message: String },
    #[error("register a character before adding dialogue")]
    #[diagnostic(code("script.empty_registry"))]
    EmptyRegistry,
    #[error("character '{0}' is not registered")]
    #[diagnostic(code("script.unknown_character"))]
    UnknownCharacter(String),
    #[error("dialogue row {0} does not exist")]
    #[diagnostic(code("script.unknown_row"))]
    UnknownRow(u64),
    #[error("{}: {source}", path.display())]
    #[diagnostic(code("script.file"))]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed script: {message}")]
    #[diagnostic(code("script.parse"))]
    Parse {
        message: String,
        #[source_code]
        src: String,
        #[label("here")]
        span: SourceSpan,
    },
}

impl ScriptError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScriptError::InvalidName(_) => ErrorCategory::Validation,
            ScriptError::MissingImage
            | ScriptError::UnsupportedImage(_)
            | ScriptError::ImageDecode { .. }
            | ScriptError::EmptyRegistry
            | ScriptError::UnknownCharacter(_)
            | ScriptError::UnknownRow(_) => ErrorCategory::Input,
            ScriptError::File { .. } | ScriptError::ImageEncode { .. } => ErrorCategory::File,
            ScriptError::Parse { .. } => ErrorCategory::Parse,
        }
    }

    pub(crate) fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScriptError::File {
            path: path.into(),
            source,
        }
    }

    /// Builds a parse error that carries only a message, for shape problems
    /// detected after JSON decoding succeeded.
    pub(crate) fn parse_message(message: impl Into<String>) -> Self {
        ScriptError::Parse {
            message: message.into(),
            src: String::new(),
            span: (0, 0).into(),
        }
    }
}
