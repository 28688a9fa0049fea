//! Configuration for layout geometry

/// Default destination when a layout does not name an output file
pub const DEFAULT_OUTPUT: &str = "wallpaper.png";

/// Default snap distance in pixels
pub const DEFAULT_SNAP_THRESHOLD: u32 = 10;

/// Configuration options for layout geometry and document defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Output path used when the layout omits `output`
    pub default_output: String,

    /// Maximum distance in pixels at which a dragged edge snaps to a neighbour
    pub snap_threshold: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_output: DEFAULT_OUTPUT.to_string(),
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback output path
    pub fn with_default_output(mut self, output: impl Into<String>) -> Self {
        self.default_output = output.into();
        self
    }

    /// Set the snap distance
    pub fn with_snap_threshold(mut self, threshold: u32) -> Self {
        self.snap_threshold = threshold;
        self
    }
}
