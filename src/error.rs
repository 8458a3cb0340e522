use miette::Diagnostic;
use thiserror::Error;

/// Main error type for spritepak operations
#[derive(Error, Diagnostic, Debug)]
pub enum PakError {
    #[error("IO error: {0}")]
    #[diagnostic(code(spritepak::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(spritepak::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Unknown container version: {version}")]
    #[diagnostic(
        code(spritepak::unknown_version),
        help("No handler is registered for this version")
    )]
    UnknownVersion { version: String },

    #[error("Decode error: {message}")]
    #[diagnostic(code(spritepak::decode))]
    Decode {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Encode error: {message}")]
    #[diagnostic(code(spritepak::encode))]
    Encode {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(spritepak::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl PakError {
    /// Shorthand for a decode error without help text.
    pub fn decode(message: impl Into<String>) -> Self {
        PakError::Decode {
            message: message.into(),
            help: None,
        }
    }

    /// Shorthand for an encode error without help text.
    pub fn encode(message: impl Into<String>) -> Self {
        PakError::Encode {
            message: message.into(),
            help: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PakError>;
