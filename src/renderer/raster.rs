//! Raster compositing of placements onto a transparent canvas

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{imageops, ImageFormat, RgbaImage};
use thiserror::Error;
use tracing::{debug, info};

use crate::document::{Placement, Resolution};
use crate::layout::Size;
use crate::persist::write_atomically;

use super::loader::{ImageLoader, ResourceError};
use super::RenderConfig;

/// Largest image, in pixels, the compositor allocates (1 GiB of RGBA)
pub const MAX_PIXELS: u64 = 1 << 28;

/// Errors that can occur while producing the output image
#[derive(Debug, Error)]
pub enum RenderError {
    /// A referenced image is missing or undecodable
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// The canvas has no area to draw on
    #[error("canvas {0} has no area")]
    EmptyCanvas(Size),

    #[error("canvas {0} exceeds {max} pixels", max = MAX_PIXELS)]
    CanvasTooLarge(Size),

    #[error("image '{file}' scaled to {resolution} exceeds {max} pixels", max = MAX_PIXELS)]
    ImageTooLarge { file: String, resolution: Resolution },

    #[error("cannot encode PNG: {0}")]
    Encode(#[source] image::ImageError),

    #[error("cannot write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Composite `placements` in order onto a transparent canvas of `size`.
///
/// Each image is loaded, converted to RGBA, resampled to exactly its
/// placement resolution and alpha-blended at its position; later placements
/// draw over earlier ones and anything outside the canvas is clipped. The
/// first image that fails to load aborts the whole render.
pub fn render<L: ImageLoader>(
    size: Size,
    placements: &[Placement],
    loader: &L,
    config: &RenderConfig,
) -> Result<RgbaImage, RenderError> {
    if size.is_empty() {
        return Err(RenderError::EmptyCanvas(size));
    }
    if size.area() > MAX_PIXELS {
        return Err(RenderError::CanvasTooLarge(size));
    }
    if let Some(p) = placements.iter().find(|p| !fits_pixel_limit(p)) {
        return Err(RenderError::ImageTooLarge {
            file: p.file.clone(),
            resolution: p.resolution,
        });
    }

    let mut canvas = RgbaImage::new(size.width, size.height);
    for (i, placement) in placements.iter().enumerate() {
        let scaled = {
            let source = loader.load(&placement.file)?.to_rgba8();
            debug!(
                item = i + 1,
                file = %placement.file,
                from = ?source.dimensions(),
                to = %placement.resolution,
                "scaling image"
            );
            if source.dimensions() == (placement.w(), placement.h()) {
                source
            } else {
                imageops::resize(
                    &source,
                    placement.w(),
                    placement.h(),
                    config.filter.filter_type(),
                )
            }
        };
        imageops::overlay(&mut canvas, &scaled, placement.x, placement.y);
    }
    Ok(canvas)
}

/// True when a placement's scaled image can be allocated
pub fn fits_pixel_limit(placement: &Placement) -> bool {
    Size::new(placement.w(), placement.h()).area() <= MAX_PIXELS
}

/// Encode an image as PNG in memory
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(RenderError::Encode)?;
    Ok(bytes)
}

/// Encode and write a PNG; the file is replaced only once encoding succeeded
pub fn write_png(path: &Path, image: &RgbaImage) -> Result<(), RenderError> {
    let bytes = encode_png(image)?;
    write_atomically(path, &bytes).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "wrote image"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use image::{DynamicImage, Rgba};

    use super::*;
    use crate::document::Resolution;
    use crate::renderer::ResampleFilter;

    /// In-memory loader keyed by file name
    struct MapLoader(HashMap<String, RgbaImage>);

    impl ImageLoader for MapLoader {
        fn load(&self, file: &str) -> Result<DynamicImage, ResourceError> {
            self.0
                .get(file)
                .map(|img| DynamicImage::ImageRgba8(img.clone()))
                .ok_or_else(|| ResourceError {
                    file: file.to_string(),
                    source: image::ImageError::IoError(std::io::Error::from(
                        std::io::ErrorKind::NotFound,
                    )),
                })
        }
    }

    fn solid(w: u32, h: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(color))
    }

    fn loader() -> MapLoader {
        MapLoader(HashMap::from([
            ("red.png".to_string(), solid(32, 32, [255, 0, 0, 255])),
            ("green.png".to_string(), solid(64, 64, [0, 255, 0, 255])),
            ("half.png".to_string(), solid(4, 4, [0, 0, 255, 128])),
        ]))
    }

    #[test]
    fn test_two_opaque_placements() {
        let placements = [
            Placement::new("red.png", 0, 0, Resolution::new(32, 32)),
            Placement::new("green.png", 32, 0, Resolution::new(64, 64)),
        ];
        let img = render(Size::new(96, 64), &placements, &loader(), &RenderConfig::default())
            .unwrap();

        assert_eq!(img.dimensions(), (96, 64));
        assert_eq!(img.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(img.get_pixel(31, 31), &Rgba([255, 0, 0, 255]));
        assert_eq!(img.get_pixel(32, 0), &Rgba([0, 255, 0, 255]));
        assert_eq!(img.get_pixel(95, 63), &Rgba([0, 255, 0, 255]));
        // below the red square nothing was drawn
        assert_eq!(img.get_pixel(0, 32), &Rgba([0, 0, 0, 0]));
        assert_eq!(img.get_pixel(31, 63), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_scales_to_resolution() {
        let placements = [Placement::new("red.png", 0, 0, Resolution::new(8, 4))];
        let config = RenderConfig::new().with_filter(ResampleFilter::Nearest);
        let img = render(Size::new(10, 10), &placements, &loader(), &config).unwrap();
        assert_eq!(img.get_pixel(7, 3), &Rgba([255, 0, 0, 255]));
        assert_eq!(img.get_pixel(8, 3), &Rgba([0, 0, 0, 0]));
        assert_eq!(img.get_pixel(7, 4), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_later_placement_draws_on_top() {
        let placements = [
            Placement::new("red.png", 0, 0, Resolution::new(32, 32)),
            Placement::new("green.png", 16, 16, Resolution::new(64, 64)),
        ];
        let img = render(Size::new(80, 80), &placements, &loader(), &RenderConfig::default())
            .unwrap();
        assert_eq!(img.get_pixel(20, 20), &Rgba([0, 255, 0, 255]));
        assert_eq!(img.get_pixel(4, 4), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_translucent_keeps_alpha_on_empty_canvas() {
        let placements = [Placement::new("half.png", 0, 0, Resolution::new(4, 4))];
        let img = render(Size::new(4, 4), &placements, &loader(), &RenderConfig::default())
            .unwrap();
        let px = img.get_pixel(1, 1);
        assert!(px[2] >= 254, "blue was {}", px[2]);
        assert!(px[3] > 100 && px[3] < 160, "alpha was {}", px[3]);
    }

    #[test]
    fn test_negative_position_is_clipped() {
        let placements = [Placement::new("red.png", -16, -16, Resolution::new(32, 32))];
        let img = render(Size::new(32, 32), &placements, &loader(), &RenderConfig::default())
            .unwrap();
        assert_eq!(img.get_pixel(15, 15), &Rgba([255, 0, 0, 255]));
        assert_eq!(img.get_pixel(16, 16), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_missing_image_aborts() {
        let placements = [
            Placement::new("red.png", 0, 0, Resolution::new(32, 32)),
            Placement::new("missing.png", 0, 0, Resolution::new(32, 32)),
        ];
        let err = render(Size::new(32, 32), &placements, &loader(), &RenderConfig::default())
            .unwrap_err();
        assert!(matches!(err, RenderError::Resource(ref e) if e.file == "missing.png"));
    }

    #[test]
    fn test_empty_canvas_rejected() {
        let placements = [Placement::new("red.png", 0, 0, Resolution::new(32, 32))];
        let err = render(Size::new(0, 32), &placements, &loader(), &RenderConfig::default())
            .unwrap_err();
        assert!(matches!(err, RenderError::EmptyCanvas(_)));
    }

    #[test]
    fn test_oversized_canvas_rejected_before_allocating() {
        let placements = [Placement::new("red.png", 0, 0, Resolution::new(32, 32))];
        let err = render(
            Size::new(100_000, 100_000),
            &placements,
            &loader(),
            &RenderConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::CanvasTooLarge(_)));
    }

    #[test]
    fn test_oversized_placement_rejected_before_loading() {
        let placements = [
            Placement::new("missing.png", 0, 0, Resolution::new(32, 32)),
            Placement::new("red.png", 0, 0, Resolution::new(20_000, 20_000)),
        ];
        let err = render(Size::new(32, 32), &placements, &loader(), &RenderConfig::default())
            .unwrap_err();
        assert!(matches!(err, RenderError::ImageTooLarge { ref file, .. } if file == "red.png"));
    }

    #[test]
    fn test_png_keeps_alpha() {
        let img = solid(3, 2, [1, 2, 3, 4]);
        let bytes = encode_png(&img).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, img);
    }
}
