//! Error types for chorder

use std::fmt;

use thiserror::Error;

/// What kind of name failed to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Note,
    ChordQuality,
    Instrument,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Note => f.write_str("note"),
            Self::ChordQuality => f.write_str("chord quality"),
            Self::Instrument => f.write_str("instrument"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ChorderError {
    #[error("Unknown {kind}: {name:?}")]
    UnknownIdentifier { kind: IdentifierKind, name: String },
    #[error("Invalid duration: {0} seconds")]
    InvalidDuration(f64),
    #[error("Cannot render an empty chord")]
    EmptyChord,
    #[error("Fret assignment has {actual} strings, instrument has {expected}")]
    AssignmentLength { expected: usize, actual: usize },
    #[error("String {index} out of range (instrument has {count} strings)")]
    StringOutOfRange { index: usize, count: usize },
    #[error("Invalid instrument: {0}")]
    InvalidInstrument(String),
}

impl ChorderError {
    pub(crate) fn unknown(kind: IdentifierKind, name: &str) -> Self {
        Self::UnknownIdentifier {
            kind,
            name: name.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChorderError>;
