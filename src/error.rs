//! Error types for Peclet parameter handling.
//!
//! This module provides a unified error type [`ParamError`] that covers
//! all error conditions that can occur while declaring the parameter schema,
//! reading a parameter file, binding typed records, and writing the echo file.

use std::fmt;

use thiserror::Error;

/// Result type alias using [`ParamError`].
pub type Result<T> = std::result::Result<T, ParamError>;

/// Unified error type for all parameter operations.
#[derive(Error, Debug)]
pub enum ParamError {
    // ============ Programmer Errors ============
    /// The declaration routine itself is inconsistent (a default that fails
    /// its own pattern, a name collision, unbalanced subsections).
    #[error("Schema violation at '{path}': {message}")]
    SchemaViolation { path: String, message: String },

    /// Lookup of a section or parameter the schema never declared.
    #[error("Parameter '{key}' was never declared in section '{path}'")]
    Undeclared { path: String, key: String },

    // ============ Input Errors ============
    /// Input assigns a key that is not declared in the enclosing section
    #[error("Unknown parameter '{key}' in section '{path}' at line {line}")]
    UnknownParameter {
        path: String,
        key: String,
        line: usize,
    },

    /// Input opens a subsection that is not declared
    #[error("Unknown subsection '{name}' in section '{path}' at line {line}")]
    UnknownSection {
        path: String,
        name: String,
        line: usize,
    },

    /// Input value does not match the declared pattern
    #[error("Invalid value '{value}' for parameter '{key}' in section '{path}'{}: expected {pattern}", location(.line))]
    InvalidValue {
        path: String,
        key: String,
        value: String,
        pattern: String,
        line: Option<usize>,
    },

    /// Input text does not follow the block grammar
    #[error("Malformed input at line {line}: {message}")]
    MalformedInput { line: usize, message: String },

    /// Several independent input problems found in one pass
    #[error("{} problems in parameter input:{}", .0.len(), List(.0))]
    Multiple(Vec<ParamError>),

    // ============ I/O Errors ============
    /// Error reading a parameter file
    #[error("Failed to read parameter file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing the echo file
    #[error("Failed to write parameter file '{path}': {source}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ParamError {
    /// Create a schema violation
    pub fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaViolation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a malformed input error
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            line,
            message: message.into(),
        }
    }

    /// Create an undeclared lookup error
    pub fn undeclared(path: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Undeclared {
            path: path.into(),
            key: key.into(),
        }
    }

    /// Collapse a list of problems into a single error.
    ///
    /// Returns `None` for an empty list; a single problem is returned as itself.
    pub fn aggregate(mut errors: Vec<ParamError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Multiple(errors)),
        }
    }

    /// Iterate over the individual problems, flattening [`ParamError::Multiple`].
    pub fn problems(&self) -> Box<dyn Iterator<Item = &ParamError> + '_> {
        match self {
            Self::Multiple(errors) => Box::new(errors.iter().flat_map(|e| e.problems())),
            other => Box::new(std::iter::once(other)),
        }
    }
}

fn location(line: &Option<usize>) -> String {
    line.map(|line| format!(" at line {line}")).unwrap_or_default()
}

struct List<'a>(&'a [ParamError]);

impl fmt::Display for List<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in self.0 {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}
