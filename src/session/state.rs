//! Validity of the editor's text buffer

use crate::document::DocumentError;

/// How the text buffer relates to the last applied document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BufferState {
    /// The buffer matches the applied document
    #[default]
    Clean,
    /// The buffer was edited and parses
    DirtyValid,
    /// The buffer was edited and does not parse; the error is kept for display
    DirtyInvalid(DocumentError),
}

impl BufferState {
    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Clean)
    }

    /// The stored parse error, if the buffer is invalid
    pub fn error(&self) -> Option<&DocumentError> {
        match self {
            Self::DirtyInvalid(e) => Some(e),
            _ => None,
        }
    }

    /// Short status text for an editor status bar
    pub fn status(&self) -> String {
        match self {
            Self::Clean => "up to date".to_string(),
            Self::DirtyValid => "valid, not applied".to_string(),
            Self::DirtyInvalid(e) => format!("invalid: {}", e),
        }
    }
}
