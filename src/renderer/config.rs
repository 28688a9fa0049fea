//! Configuration for raster compositing

use image::imageops::FilterType;
use serde::Deserialize;

/// Resampling filter used when scaling images to their placement size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl ResampleFilter {
    pub fn filter_type(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Configuration options for raster output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderConfig {
    /// Filter used to scale each image to its placement resolution
    pub filter: ResampleFilter,
}

impl RenderConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the resampling filter
    pub fn with_filter(mut self, filter: ResampleFilter) -> Self {
        self.filter = filter;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.filter, ResampleFilter::Lanczos3);
        assert_eq!(config.filter.filter_type(), FilterType::Lanczos3);
    }

    #[test]
    fn test_builder_pattern() {
        let config = RenderConfig::new().with_filter(ResampleFilter::CatmullRom);
        assert_eq!(config.filter.filter_type(), FilterType::CatmullRom);
    }
}
