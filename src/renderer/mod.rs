//! Raster renderer for composing layouts
//!
//! This module takes validated placements and produces an RGBA canvas,
//! encoded as PNG with the alpha channel intact.

pub mod config;
pub mod loader;
pub mod raster;

pub use config::{RenderConfig, ResampleFilter};
pub use loader::{FsLoader, ImageLoader, ResourceError};
pub use raster::{encode_png, fits_pixel_limit, render, write_png, RenderError, MAX_PIXELS};
