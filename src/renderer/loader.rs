//! Image sources for the compositor

use std::path::{Path, PathBuf};

use image::DynamicImage;
use thiserror::Error;
use tracing::debug;

/// A referenced image could not be opened or decoded
#[derive(Debug, Error)]
#[error("cannot load image '{file}': {source}")]
pub struct ResourceError {
    pub file: String,
    #[source]
    pub source: image::ImageError,
}

/// Something that turns a placement's `file` into pixels
pub trait ImageLoader {
    fn load(&self, file: &str) -> Result<DynamicImage, ResourceError>;
}

/// Loads images from the filesystem.
///
/// Relative paths resolve against `root` when one is set, and against the
/// process working directory otherwise.
#[derive(Debug, Clone, Default)]
pub struct FsLoader {
    root: Option<PathBuf>,
}

impl FsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    pub fn resolve(&self, file: &str) -> PathBuf {
        let path = Path::new(file);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ImageLoader for FsLoader {
    fn load(&self, file: &str) -> Result<DynamicImage, ResourceError> {
        let path = self.resolve(file);
        debug!(path = %path.display(), "opening image");
        image::open(&path).map_err(|source| ResourceError {
            file: file.to_string(),
            source,
        })
    }
}

impl<L: ImageLoader + ?Sized> ImageLoader for &L {
    fn load(&self, file: &str) -> Result<DynamicImage, ResourceError> {
        (**self).load(file)
    }
}
