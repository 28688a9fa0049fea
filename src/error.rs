//! Errors raised while reading or writing layout text

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Character range in source text
pub type Span = std::ops::Range<usize>;

/// The layout text could not be (de)serialized as YAML.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SerializationError {
    #[error("invalid layout text at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        /// Byte offset of the error in the source text
        offset: usize,
        message: String,
    },

    #[error("invalid layout text: {message}")]
    Unlocated { message: String },

    #[error("cannot serialize layout: {message}")]
    Emit { message: String },
}

impl SerializationError {
    /// 1-based line number, when the deserializer reported one
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Syntax { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Error message without location information
    pub fn message(&self) -> &str {
        match self {
            Self::Syntax { message, .. }
            | Self::Unlocated { message }
            | Self::Emit { message } => message,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let Self::Syntax { offset, message, .. } = self else {
            return self.to_string();
        };
        let start = char_offset(source, *offset);
        let span: Span = start..start + 1;

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message("invalid layout text")
            .with_label(
                Label::new((filename, span))
                    .with_message(message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for SerializationError {
    fn from(err: serde_yaml::Error) -> Self {
        let text = err.to_string();
        match err.location() {
            Some(loc) => {
                // serde_yaml embeds locations in its message; keep them structured instead
                Self::Syntax {
                    line: loc.line(),
                    column: loc.column(),
                    offset: loc.index(),
                    message: strip_locations(&text),
                }
            }
            None => Self::Unlocated { message: text },
        }
    }
}

/// Remove every " at line N column M" from a serde_yaml message
fn strip_locations(text: &str) -> String {
    const MARKER: &str = " at line ";
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(MARKER) {
        let after = &rest[pos + MARKER.len()..];
        match location_len(after) {
            Some(len) => {
                out.push_str(&rest[..pos]);
                rest = &after[len..];
            }
            None => {
                out.push_str(&rest[..pos + MARKER.len()]);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Length of a leading "N column M"
fn location_len(text: &str) -> Option<usize> {
    let digits = |s: &str| s.len() - s.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    let line = digits(text);
    if line == 0 {
        return None;
    }
    let rest = text[line..].strip_prefix(" column ")?;
    let column = digits(rest);
    if column == 0 {
        return None;
    }
    Some(line + " column ".len() + column)
}

/// ariadne labels count characters, serde_yaml reports bytes
fn char_offset(source: &str, byte_offset: usize) -> usize {
    let mut end = byte_offset.min(source.len());
    while !source.is_char_boundary(end) {
        end -= 1;
    }
    source[..end].chars().count()
}
