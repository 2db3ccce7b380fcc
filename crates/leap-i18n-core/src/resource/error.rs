//! Errors raised while reading translation resource files.

use std::fmt;

use thiserror::Error;

/// 1-based line and column inside a resource file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: u64,
    pub column: u64,
}

impl Position {
    pub fn new(line: u64, column: u64) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A resource file could not be turned into a catalog.
///
/// Loading never recovers partially: the first error aborts the whole file,
/// and the caller keeps whatever catalog it had before.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogParseError {
    /// The byte stream is not well-formed XML (unclosed or mismatched tag,
    /// truncated document, bad entity, invalid encoding).
    #[error("malformed XML at {position}: {message}")]
    Xml { position: Position, message: String },

    /// The document root is not the element this reader expects.
    #[error("unexpected root element <{found}> at {position}, expected <{expected}>")]
    UnexpectedRoot {
        expected: &'static str,
        found: String,
        position: Position,
    },

    /// A required child element is missing.
    #[error("<{parent}> at {position} has no <{element}> child")]
    MissingElement {
        parent: &'static str,
        element: &'static str,
        position: Position,
    },

    /// A required attribute is missing.
    #[error("<{element}> at {position} has no {attribute:?} attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
        position: Position,
    },

    /// An attribute has a value this reader does not understand.
    #[error("<{element}> at {position} has invalid {attribute:?} value {value:?}")]
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
        position: Position,
    },
}

impl CatalogParseError {
    /// Where in the file the error was detected.
    pub fn position(&self) -> Position {
        match self {
            Self::Xml { position, .. }
            | Self::UnexpectedRoot { position, .. }
            | Self::MissingElement { position, .. }
            | Self::MissingAttribute { position, .. }
            | Self::InvalidAttribute { position, .. } => *position,
        }
    }
}
