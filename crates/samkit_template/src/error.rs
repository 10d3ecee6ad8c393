//! Error types for the template module.

use thiserror::Error;

use crate::location::{display_path, Location};

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that abort a normalization or mapping pass.
///
/// Directive shape problems are not listed here; they are collected as
/// [`ShapeViolation`](crate::validator::ShapeViolation)s so the caller can
/// decide whether they are fatal.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Failed to parse {format} document: {message}{}", at(location))]
    DocumentParse {
        format: String,
        message: String,
        location: Option<Location>,
    },

    #[error("Missing required field '{field}' at {}{}", display_path(path), at(location))]
    MissingRequiredField {
        field: String,
        path: String,
        location: Option<Location>,
    },

    #[error("Unrecognized directive tag '!{tag}' at {}{}", display_path(path), at(location))]
    UnrecognizedDirective {
        tag: String,
        path: String,
        location: Option<Location>,
    },

    #[error("Section '{section}' at {} must be {expected}, found {found}{}", display_path(path), at(location))]
    MalformedSection {
        section: String,
        path: String,
        expected: String,
        found: String,
        location: Option<Location>,
    },
}

impl TemplateError {
    /// Path of the offending node, when the error is tied to one.
    pub fn path(&self) -> Option<&str> {
        match self {
            TemplateError::MissingRequiredField { path, .. }
            | TemplateError::UnrecognizedDirective { path, .. }
            | TemplateError::MalformedSection { path, .. } => Some(path),
            TemplateError::DocumentParse { .. } => None,
        }
    }

    /// Source location of the offending node, if tracking was enabled.
    pub fn location(&self) -> Option<Location> {
        match self {
            TemplateError::DocumentParse { location, .. }
            | TemplateError::MissingRequiredField { location, .. }
            | TemplateError::UnrecognizedDirective { location, .. }
            | TemplateError::MalformedSection { location, .. } => *location,
        }
    }
}

fn at(location: &Option<Location>) -> String {
    match location {
        Some(loc) => format!(" ({})", loc),
        None => String::new(),
    }
}
