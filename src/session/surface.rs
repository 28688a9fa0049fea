//! The boundary to a GUI toolkit
//!
//! A toolkit implements [`Surface`] once. It draws what the session tells it
//! to draw and forwards drag gestures to
//! [`EditSession::drag`](super::EditSession::drag); every decision about
//! positions, snapping and validity stays in the session.

use std::collections::HashMap;

use image::{imageops, RgbaImage};
use tracing::warn;

use crate::document::Placement;
use crate::layout::{Rect, Size};
use crate::renderer::{fits_pixel_limit, ImageLoader, RenderConfig};

/// A draggable, paintable area that shows placements on a canvas
pub trait Surface {
    /// The canvas changed size; drop anything painted before
    fn set_canvas(&mut self, size: Size);

    /// Paint one placement. `preview` is `None` when the image could not be
    /// loaded and a placeholder should be drawn instead.
    fn paint(&mut self, index: usize, rect: Rect, file: &str, preview: Option<&RgbaImage>);
}

/// Scaled preview images keyed by file and target size.
///
/// Failed loads are cached as placeholders so a missing file is reported once.
pub struct PreviewCache<L> {
    loader: L,
    config: RenderConfig,
    entries: HashMap<(String, u32, u32), Option<RgbaImage>>,
}

impl<L: ImageLoader> PreviewCache<L> {
    pub fn new(loader: L, config: RenderConfig) -> Self {
        Self {
            loader,
            config,
            entries: HashMap::new(),
        }
    }

    /// The scaled preview for a placement, or `None` for a placeholder
    pub fn get(&mut self, placement: &Placement) -> Option<&RgbaImage> {
        let key = (placement.file.clone(), placement.w(), placement.h());
        let loader = &self.loader;
        let filter = self.config.filter.filter_type();
        self.entries
            .entry(key)
            .or_insert_with(|| {
                if !fits_pixel_limit(placement) {
                    warn!(
                        file = %placement.file,
                        resolution = %placement.resolution,
                        "preview too large, drawing placeholder"
                    );
                    return None;
                }
                load_scaled(loader, placement, filter)
            })
            .as_ref()
    }

    /// Forget everything, e.g. after files changed on disk
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn load_scaled<L: ImageLoader>(
    loader: &L,
    placement: &Placement,
    filter: imageops::FilterType,
) -> Option<RgbaImage> {
    match loader.load(&placement.file) {
        Ok(img) => Some(imageops::resize(
            &img.to_rgba8(),
            placement.w(),
            placement.h(),
            filter,
        )),
        Err(e) => {
            warn!("preview unavailable: {}", e);
            None
        }
    }
}
