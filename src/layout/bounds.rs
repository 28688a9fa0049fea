//! Canvas extent and origin normalization

use thiserror::Error;

use crate::document::Placement;

use super::types::Size;

/// Canvas size implied by a set of placements.
///
/// Only the right and bottom edges are considered: the canvas is assumed to
/// start at the origin, so anything left of or above it is clipped when
/// rendered. A non-positive extent clamps to zero.
pub fn compute_bounds(placements: &[Placement]) -> Size {
    let right = placements.iter().map(|p| p.rect().right()).max().unwrap_or(0);
    let bottom = placements.iter().map(|p| p.rect().bottom()).max().unwrap_or(0);
    Size::new(clamp_extent(right), clamp_extent(bottom))
}

fn clamp_extent(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// Shift that moves the top-left-most placement corner to the origin, and the
/// tight canvas that results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalization {
    pub shift_x: i64,
    pub shift_y: i64,
    pub size: Size,
}

impl Normalization {
    /// True when applying this normalization would not move anything
    pub fn is_identity(&self) -> bool {
        self.shift_x == 0 && self.shift_y == 0
    }

    /// Move every placement by the computed shift
    pub fn apply(&self, placements: &mut [Placement]) {
        for p in placements {
            p.x += self.shift_x;
            p.y += self.shift_y;
        }
    }
}

/// The placements cover more than a canvas can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("layout spans {width}x{height} px, more than a canvas can hold")]
pub struct SpanError {
    pub width: i128,
    pub height: i128,
}

/// Compute the origin normalization for a set of placements.
///
/// Returns `Ok(None)` for an empty set, and an error when the tight canvas
/// would not fit a [`Size`].
pub fn normalize_origin(placements: &[Placement]) -> Result<Option<Normalization>, SpanError> {
    let (Some(min_x), Some(min_y), Some(max_right), Some(max_bottom)) = (
        placements.iter().map(|p| p.x).min(),
        placements.iter().map(|p| p.y).min(),
        placements.iter().map(|p| p.rect().right()).max(),
        placements.iter().map(|p| p.rect().bottom()).max(),
    ) else {
        return Ok(None);
    };

    let width = i128::from(max_right) - i128::from(min_x);
    let height = i128::from(max_bottom) - i128::from(min_y);
    let too_large = SpanError { width, height };
    let size = Size::new(
        u32::try_from(width).map_err(|_| too_large)?,
        u32::try_from(height).map_err(|_| too_large)?,
    );
    Ok(Some(Normalization {
        shift_x: min_x.checked_neg().ok_or(too_large)?,
        shift_y: min_y.checked_neg().ok_or(too_large)?,
        size,
    }))
}
