//! Error types for loading and emitting YAML documents.

use crate::SourceInfo;
use thiserror::Error;

/// Result type alias for yaml-tree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Message the event engine attaches to an alias whose anchor it never saw.
const UNKNOWN_ANCHOR_MESSAGE: &str = "found unknown anchor";

/// Errors that can occur while loading or emitting YAML.
///
/// Every error is terminal for the call that produced it: no partial
/// document is ever returned alongside one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Scalar or input bytes that are not valid UTF-8.
    #[error("Decode error: {message}")]
    DecodeError { message: String },

    /// YAML syntax error or an event sequence the builder cannot accept.
    #[error("Parse error: {message}{}", display_location(.location))]
    ParseError {
        message: String,
        location: Option<SourceInfo>,
    },

    /// An event kind the builder has no transition for.
    #[error("Unsupported event: {event}")]
    UnsupportedEvent { event: String },

    /// An alias refers to an anchor that is not visible at that point.
    #[error("Anchor not found: {anchor}{}", display_location(.location))]
    AnchorNotFound {
        anchor: String,
        location: Option<SourceInfo>,
    },

    /// The output sink failed while serializing.
    #[error("Emit error: {message}")]
    EmitError { message: String },

    /// The event engine could not be set up with the given input.
    #[error("Engine initialization error: {message}")]
    EngineInitError { message: String },
}

fn display_location(location: &Option<SourceInfo>) -> String {
    match location {
        Some(loc) => format!(" at {}", loc),
        None => String::new(),
    }
}

impl Error {
    /// Create a parse error with an optional location.
    pub fn parse(message: impl Into<String>, location: Option<SourceInfo>) -> Self {
        Error::ParseError {
            message: message.into(),
            location,
        }
    }

    /// Location of the failure, when the error kind carries one.
    pub fn location(&self) -> Option<&SourceInfo> {
        match self {
            Error::ParseError { location, .. } | Error::AnchorNotFound { location, .. } => {
                location.as_ref()
            }
            _ => None,
        }
    }

    /// Fill in the location of a builder error that does not have one yet.
    pub(crate) fn or_location(self, at: SourceInfo) -> Self {
        match self {
            Error::ParseError {
                message,
                location: None,
            } => Error::ParseError {
                message,
                location: Some(at),
            },
            Error::AnchorNotFound {
                anchor,
                location: None,
            } => Error::AnchorNotFound {
                anchor,
                location: Some(at),
            },
            other => other,
        }
    }

    /// Attach a filename to the location carried by this error.
    pub(crate) fn with_file(self, file: &str) -> Self {
        match self {
            Error::ParseError { message, location } => Error::ParseError {
                message,
                location: location.map(|loc| loc.with_file(file)),
            },
            Error::AnchorNotFound { anchor, location } => Error::AnchorNotFound {
                anchor,
                location: location.map(|loc| loc.with_file(file)),
            },
            other => other,
        }
    }
}

impl From<yaml_rust2::ScanError> for Error {
    fn from(err: yaml_rust2::ScanError) -> Self {
        let location = Some(SourceInfo::from_marker(err.marker()));
        // The engine resolves alias names itself and reports unknown ones as
        // scan errors, without the name.
        if err.info().contains(UNKNOWN_ANCHOR_MESSAGE) {
            return Error::AnchorNotFound {
                anchor: "<undeclared>".into(),
                location,
            };
        }
        Error::ParseError {
            message: err.info().to_string(),
            location,
        }
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::DecodeError {
            message: err.to_string(),
        }
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Error::EmitError {
            message: err.to_string(),
        }
    }
}
