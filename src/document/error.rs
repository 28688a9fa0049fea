//! Error types for layout validation

use thiserror::Error;

use crate::error::SerializationError;

/// The layout text parsed but does not describe a valid layout
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Top-level value is not a mapping
    #[error("layout must be a mapping, found {found}")]
    NotAMapping { found: &'static str },

    /// No `items` key
    #[error("layout has no 'items' list")]
    MissingItems,

    /// `items` is present but holds no placements
    #[error("'items' must contain at least one entry")]
    EmptyItems,

    /// An entry of `items` is not a mapping
    #[error("item {index}: expected a mapping, found {found}")]
    ItemNotAMapping { index: usize, found: &'static str },

    /// A required item field is absent
    #[error("item {index}: missing field '{field}'")]
    MissingField { index: usize, field: &'static str },

    /// An item field is present but unusable
    #[error("item {index}: invalid '{field}': {reason}")]
    InvalidField {
        index: usize,
        field: &'static str,
        reason: String,
    },

    /// A top-level field is present but unusable
    #[error("invalid '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    /// Only one of the two canvas dimensions was given
    #[error("'canvas_width' and 'canvas_height' must be given together (only '{present}' found)")]
    PartialCanvas { present: &'static str },
}

impl ValidationError {
    /// Create an invalid item field error
    pub fn invalid_field(index: usize, field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            index,
            field,
            reason: reason.into(),
        }
    }

    /// Create an invalid top-level value error
    pub fn invalid_value(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }

    /// 1-based index of the offending item, when item-scoped
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::ItemNotAMapping { index, .. }
            | Self::MissingField { index, .. }
            | Self::InvalidField { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Name of the offending field, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { field, .. }
            | Self::InvalidField { field, .. }
            | Self::InvalidValue { field, .. } => Some(field),
            Self::MissingItems | Self::EmptyItems => Some("items"),
            Self::PartialCanvas { present } => Some(present),
            Self::NotAMapping { .. } | Self::ItemNotAMapping { .. } => None,
        }
    }
}

/// Any reason a layout text fails to become a [`Document`](super::Document)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl DocumentError {
    /// 1-based line number for syntax errors
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Serialization(e) => e.line(),
            Self::Validation(_) => None,
        }
    }

    /// Format the error for a terminal, with source context when available
    pub fn format(&self, source: &str, filename: &str) -> String {
        match self {
            Self::Serialization(e) => e.format(source, filename),
            Self::Validation(e) => format!("{}: {}", filename, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_display() {
        let err = ValidationError::MissingField {
            index: 2,
            field: "resolution",
        };
        insta::assert_snapshot!(err.to_string(), @"item 2: missing field 'resolution'");
    }

    #[test]
    fn test_invalid_field_display() {
        let err = ValidationError::invalid_field(1, "x", "expected an integer, found a list");
        insta::assert_snapshot!(err.to_string(), @"item 1: invalid 'x': expected an integer, found a list");
    }

    #[test]
    fn test_partial_canvas_display() {
        let err = ValidationError::PartialCanvas {
            present: "canvas_width",
        };
        assert!(err.to_string().contains("must be given together"));
        assert_eq!(err.field(), Some("canvas_width"));
    }

    #[test]
    fn test_index_accessor() {
        assert_eq!(ValidationError::invalid_field(3, "file", "empty").index(), Some(3));
        assert_eq!(ValidationError::MissingItems.index(), None);
    }

    #[test]
    fn test_validation_format_prefixes_filename() {
        let err = DocumentError::from(ValidationError::EmptyItems);
        assert_eq!(
            err.format("items: []", "layout.yml"),
            "layout.yml: 'items' must contain at least one entry"
        );
        assert_eq!(err.line(), None);
    }
}
