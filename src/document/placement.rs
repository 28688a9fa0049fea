//! A single image placed on the canvas

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::layout::Rect;

/// Target size an image is scaled to, written `WxH`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// Reasons a `WxH` string is rejected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("expected WxH, found \"{0}\"")]
    Malformed(String),

    #[error("{axis} must be a positive integer, found \"{value}\"")]
    NotPositive { axis: &'static str, value: String },
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl FromStr for Resolution {
    type Err = ResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        let mut parts = lowered.split('x');
        let (Some(w), Some(h), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ResolutionError::Malformed(s.to_string()));
        };
        Ok(Self {
            width: positive_dimension("width", w)?,
            height: positive_dimension("height", h)?,
        })
    }
}

fn positive_dimension(axis: &'static str, raw: &str) -> Result<u32, ResolutionError> {
    let not_positive = || ResolutionError::NotPositive {
        axis,
        value: raw.trim().to_string(),
    };
    let value: i64 = raw.trim().parse().map_err(|_| not_positive())?;
    if value <= 0 {
        return Err(not_positive());
    }
    u32::try_from(value).map_err(|_| not_positive())
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Largest distance from the origin a placement may be positioned at.
///
/// Keeps every edge, span and shift computed from positions well inside `i64`.
pub const MAX_COORDINATE: i64 = 1 << 40;

/// One image instance in a layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Image path, opaque to the layout engine
    pub file: String,
    pub x: i64,
    pub y: i64,
    pub resolution: Resolution,
}

impl Placement {
    pub fn new(file: impl Into<String>, x: i64, y: i64, resolution: Resolution) -> Self {
        Self {
            file: file.into(),
            x,
            y,
            resolution,
        }
    }

    /// Scaled width
    pub fn w(&self) -> u32 {
        self.resolution.width
    }

    /// Scaled height
    pub fn h(&self) -> u32 {
        self.resolution.height
    }

    /// The area this placement covers on the canvas
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w(), self.h())
    }
}
