//! Lyco - an image mosaic composer
//!
//! This library parses declarative YAML layouts, composites the referenced
//! images onto a transparent canvas, and provides the editing model an
//! interactive layout editor drives.
//!
//! # Example
//!
//! ```no_run
//! use lyco::{compose_to_file, ComposeConfig, FsLoader};
//!
//! let layout = r#"
//! output: wallpaper.png
//! items:
//!   - file: left.png
//!     x: 0
//!     y: 0
//!     resolution: 1920x1080
//!   - file: right.png
//!     x: 1920
//!     y: 0
//!     resolution: 2560X1440
//! "#;
//!
//! let report = compose_to_file(layout, &FsLoader::new(), None, &ComposeConfig::default()).unwrap();
//! assert_eq!(report.canvas.width, 4480);
//! ```

pub mod document;
pub mod error;
pub mod layout;
pub mod persist;
pub mod renderer;
pub mod session;
pub mod settings;

pub use document::{Document, DocumentError, Placement, Resolution, ValidationError};
pub use error::SerializationError;
pub use layout::{LayoutConfig, LintWarning, Size};
pub use renderer::{FsLoader, ImageLoader, RenderConfig, RenderError, ResourceError};
pub use session::{EditSession, SessionConfig, SessionError};
pub use settings::Settings;

use std::path::{Path, PathBuf};

use image::RgbaImage;
use thiserror::Error;
use tracing::info;

/// Errors that can occur during the compose pipeline
#[derive(Debug, Error)]
pub enum ComposeError {
    /// The layout text is malformed or invalid
    #[error("layout error: {0}")]
    Document(#[from] DocumentError),

    /// Rendering or writing the image failed
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

/// Configuration for the complete compose pipeline
#[derive(Debug, Clone, Default)]
pub struct ComposeConfig {
    /// Layout defaults
    pub layout: LayoutConfig,
    /// Raster output configuration
    pub render: RenderConfig,
    /// Lint mode: check for overlaps and clipping
    pub lint: bool,
}

impl ComposeConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    /// Set the raster configuration
    pub fn with_render(mut self, config: RenderConfig) -> Self {
        self.render = config;
        self
    }

    /// Enable or disable lint mode
    pub fn with_lint(mut self, lint: bool) -> Self {
        self.lint = lint;
        self
    }
}

/// Everything produced by one compose run
#[derive(Debug, Clone)]
pub struct Composition {
    pub document: Document,
    pub canvas: Size,
    pub image: RgbaImage,
    /// Lint warnings; empty unless lint mode is enabled
    pub warnings: Vec<LintWarning>,
}

/// Summary of a compose run that wrote a file
#[derive(Debug, Clone)]
pub struct ComposeReport {
    pub output: PathBuf,
    pub canvas: Size,
    pub warnings: Vec<LintWarning>,
}

/// Compose layout text into an image with default configuration
pub fn compose<L: ImageLoader>(source: &str, loader: &L) -> Result<RgbaImage, ComposeError> {
    compose_with_config(source, loader, &ComposeConfig::default()).map(|c| c.image)
}

/// Compose layout text into an image with custom configuration
pub fn compose_with_config<L: ImageLoader>(
    source: &str,
    loader: &L,
    config: &ComposeConfig,
) -> Result<Composition, ComposeError> {
    let document = Document::parse(source)?;
    let canvas = document.canvas_size();

    let warnings = if config.lint {
        layout::lint::check(&document)
    } else {
        vec![]
    };

    let image = renderer::render(canvas, &document.placements, loader, &config.render)?;
    Ok(Composition {
        document,
        canvas,
        image,
        warnings,
    })
}

/// Compose layout text and write the PNG.
///
/// The destination is `output` if given, else the layout's `output`, else
/// the configured default. Nothing is written unless every step succeeds.
pub fn compose_to_file<L: ImageLoader>(
    source: &str,
    loader: &L,
    output: Option<&Path>,
    config: &ComposeConfig,
) -> Result<ComposeReport, ComposeError> {
    let composition = compose_with_config(source, loader, config)?;
    let path = match output {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(composition.document.output_or(&config.layout.default_output)),
    };
    renderer::write_png(&path, &composition.image)?;
    info!(
        output = %path.display(),
        canvas = %composition.canvas,
        placements = composition.document.placements.len(),
        "composed"
    );
    Ok(ComposeReport {
        output: path,
        canvas: composition.canvas,
        warnings: composition.warnings,
    })
}
