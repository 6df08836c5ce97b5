//! Error types for frame parsing, tuning files, and the host loop.

use std::fmt;
use std::io;

/// A frame or configuration object that does not follow the host contract.
///
/// The host is the only producer of frames, so any of these means the two
/// sides disagree about the wire format. Callers treat it as fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// The line is not valid JSON, or a section has the wrong shape.
    Json(String),
    /// A required field or section is absent.
    MissingField(&'static str),
    /// A field is present but has the wrong type or an out-of-range value.
    InvalidField {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What was found instead.
        found: String,
    },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Json(msg) => write!(f, "malformed frame: {msg}"),
            FrameError::MissingField(field) => write!(f, "frame is missing `{field}`"),
            FrameError::InvalidField { field, found } => {
                write!(f, "frame field `{field}` is invalid: {found}")
            }
        }
    }
}

impl std::error::Error for FrameError {}

/// Error loading a tuning file.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io(io::Error),
    /// The file is not a valid tuning document.
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read tuning file: {e}"),
            ConfigError::Parse(e) => write!(f, "invalid tuning file: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// Error in the line-oriented host loop.
#[derive(Debug)]
pub enum ProtocolError {
    /// Reading from or writing to the host pipe failed.
    Io(io::Error),
    /// The host sent a frame that breaks the contract.
    Frame(FrameError),
    /// A turn frame arrived before the game configuration.
    NotConfigured,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Io(e) => write!(f, "host pipe error: {e}"),
            ProtocolError::Frame(e) => write!(f, "{e}"),
            ProtocolError::NotConfigured => {
                write!(f, "received a turn frame before the game configuration")
            }
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProtocolError::Io(e) => Some(e),
            ProtocolError::Frame(e) => Some(e),
            ProtocolError::NotConfigured => None,
        }
    }
}

impl From<io::Error> for ProtocolError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<FrameError> for ProtocolError {
    fn from(e: FrameError) -> Self {
        Self::Frame(e)
    }
}
