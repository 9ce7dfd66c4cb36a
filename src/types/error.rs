//! Error types for loading and persisting beacons.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by the registry load operations.
///
/// `evaluate` has no error type; it always produces a decision.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The beacon file does not exist and creating a default was not
    /// requested.
    #[error("beacon file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The beacon file exists but could not be read.
    #[error("failed to read beacon file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The beacon file is structurally malformed.
    #[error("malformed beacon file {} at line {line}: {reason}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// The synthesized default could not be written back. The default
    /// is still in effect in memory.
    #[error("failed to write default beacon file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why a single `Beacon` record was rejected. Rejected records are
/// skipped; the rest of the file still loads.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// The value would not read back unchanged from the beacon file.
    #[error("field `{field}` cannot be written: {value:?}")]
    Unwritable { field: &'static str, value: String },
}

/// Structural error raised by the ConfigNode parser, before a file
/// path is attached.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("line {line}: {reason}")]
pub struct SyntaxError {
    pub line: usize,
    pub reason: String,
}

impl SyntaxError {
    /// Creates a syntax error at a 1-based line.
    pub fn at(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }

    /// Attaches the file path, turning this into a [`LoadError::Parse`].
    pub fn into_load_error(self, path: impl Into<PathBuf>) -> LoadError {
        LoadError::Parse {
            path: path.into(),
            line: self.line,
            reason: self.reason,
        }
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn test_syntax_error_keeps_line() {
        let err = SyntaxError::at(12, "unexpected `}`").into_load_error("Beacons.cfg");
        match err {
            LoadError::Parse { path, line, reason } => {
                assert_eq!(path, PathBuf::from("Beacons.cfg"));
                assert_eq!(line, 12);
                assert_eq!(reason, "unexpected `}`");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_messages() {
        let err = LoadError::NotFound(PathBuf::from("GameData/NIMBY/Beacons.cfg"));
        assert_eq!(
            err.to_string(),
            "beacon file not found: GameData/NIMBY/Beacons.cfg"
        );
        assert_eq!(
            RecordError::InvalidNumber {
                field: "lat",
                value: "north".to_string()
            }
            .to_string(),
            "field `lat` is not a number: \"north\""
        );
    }
}
