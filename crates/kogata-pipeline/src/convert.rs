//! The crop → resize → quality → encode conversion pipeline.
//!
//! One call converts one decoded source image according to a
//! [`ConvertConfig`]; the pipeline holds no state across calls, so a
//! conversion is a pure function of `(bytes, config)`. Pixel-level
//! decode/crop/resize/encode work is owned by the `image` crate; this
//! module only sequences it and validates the geometry.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageEncoder};

use crate::mapper::SourceRect;
use crate::types::{ConvertConfig, ConvertError, ConvertedImage, Dimensions, JpegQuality};

/// Run the full conversion pipeline.
///
/// # Pipeline steps
///
/// 1. Decode the source bytes (PNG, JPEG, BMP, WebP)
/// 2. Crop, only when the config carries a selection: the selection is
///    mapped from display to source space and must lie fully inside
///    the source bounds
/// 3. Resize to exactly `width`×`height`, only when both are non-zero
/// 4. Encode to JPEG at the configured quality, always
///
/// Skipped steps leave the image untouched; the output of step 4 is the
/// returned [`ConvertedImage`].
///
/// # Errors
///
/// Returns [`ConvertError::Decode`] when the bytes are not a supported
/// raster image, [`ConvertError::Geometry`] when the crop rectangle is
/// invalid (unmeasured display ratio, empty, or out of bounds), and
/// [`ConvertError::Encode`] when the JPEG encoder rejects the output.
pub fn convert(bytes: &[u8], config: &ConvertConfig) -> Result<ConvertedImage, ConvertError> {
    let mut image = image::load_from_memory(bytes)?;

    if let Some(selection) = &config.crop {
        let ratio = config.display_ratio.unwrap_or(0.0);
        let rect = SourceRect::from_selection(selection, ratio)?;
        rect.validate_within(Dimensions {
            width: image.width(),
            height: image.height(),
        })?;
        image = image.crop_imm(rect.x, rect.y, rect.width, rect.height);
    }

    if config.width > 0 && config.height > 0 {
        image = image.resize_exact(config.width, config.height, config.filter.to_image_filter());
    }

    encode_jpeg(&image, config.quality)
}

/// Read the pixel dimensions of an encoded image without a full decode.
///
/// # Errors
///
/// Returns [`ConvertError::Decode`] when the bytes are not a supported
/// raster image.
pub fn probe_dimensions(bytes: &[u8]) -> Result<Dimensions, ConvertError> {
    let reader = image::ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ConvertError::Decode(image::ImageError::IoError(e)))?;
    let (width, height) = reader.into_dimensions()?;
    Ok(Dimensions { width, height })
}

/// Encode as baseline JPEG at the given quality.
///
/// JPEG has no alpha channel, so the image is flattened to RGB first.
fn encode_jpeg(
    image: &DynamicImage,
    quality: JpegQuality,
) -> Result<ConvertedImage, ConvertError> {
    let rgb = image.to_rgb8();
    let dimensions = Dimensions {
        width: rgb.width(),
        height: rgb.height(),
    };

    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, quality.value());
    encoder
        .write_image(
            rgb.as_raw(),
            dimensions.width,
            dimensions.height,
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| ConvertError::Encode(e.to_string()))?;

    Ok(ConvertedImage { bytes, dimensions })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::selection::CropSelection;
    use crate::types::{Point, ResizeFilter};

    /// Encode a PNG with four solid quadrants (top-left dark, top-right
    /// light, bottom-left mid, bottom-right bright) so crop placement
    /// is observable through the lossy JPEG round trip.
    fn quadrant_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_fn(width, height, |x, y| {
            let v = match (x < width / 2, y < height / 2) {
                (true, true) => 16,
                (false, true) => 224,
                (true, false) => 96,
                (false, false) => 255,
            };
            image::Rgba([v, v, v, 255])
        });
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
        buf
    }

    fn crop_config(origin: Point, w: f64, h: f64, ratio: f64) -> ConvertConfig {
        ConvertConfig {
            crop: Some(CropSelection::new(origin, w, h)),
            display_ratio: Some(ratio),
            ..ConvertConfig::default()
        }
    }

    #[test]
    fn garbage_bytes_fail_with_decode() {
        let result = convert(&[0xFF, 0x00, 0x12], &ConvertConfig::default());
        assert!(matches!(result, Err(ConvertError::Decode(_))));
    }

    #[test]
    fn empty_bytes_fail_with_decode() {
        let result = convert(&[], &ConvertConfig::default());
        assert!(matches!(result, Err(ConvertError::Decode(_))));
    }

    #[test]
    fn default_config_reencodes_at_source_size() {
        let png = quadrant_png(64, 48);
        let converted = convert(&png, &ConvertConfig::default()).unwrap();
        assert_eq!(
            converted.dimensions,
            Dimensions {
                width: 64,
                height: 48,
            },
        );
        // The output is a decodable JPEG of the same size.
        let decoded = image::load_from_memory(&converted.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }

    #[test]
    fn resize_is_skipped_when_either_target_is_zero() {
        let png = quadrant_png(64, 48);
        for (width, height) in [(100, 0), (0, 100), (0, 0)] {
            let config = ConvertConfig {
                width,
                height,
                ..ConvertConfig::default()
            };
            let converted = convert(&png, &config).unwrap();
            assert_eq!(
                converted.dimensions,
                Dimensions {
                    width: 64,
                    height: 48,
                },
                "resize must be skipped for target {width}x{height}",
            );
        }
    }

    #[test]
    fn resize_hits_the_exact_target() {
        let png = quadrant_png(64, 48);
        let config = ConvertConfig {
            width: 30,
            height: 90,
            filter: ResizeFilter::Lanczos3,
            ..ConvertConfig::default()
        };
        let converted = convert(&png, &config).unwrap();
        assert_eq!(
            converted.dimensions,
            Dimensions {
                width: 30,
                height: 90,
            },
        );
    }

    #[test]
    fn crop_maps_display_pixels_to_source_pixels() {
        // 100x100 source shown at ratio 0.5: a 20x15 display selection
        // at (5, 10) is the 40x30 source rect at (10, 20).
        let png = quadrant_png(100, 100);
        let config = crop_config(Point::new(5.0, 10.0), 20.0, 15.0, 0.5);
        let converted = convert(&png, &config).unwrap();
        assert_eq!(
            converted.dimensions,
            Dimensions {
                width: 40,
                height: 30,
            },
        );
    }

    #[test]
    fn crop_keeps_the_selected_pixels() {
        // Crop entirely inside the bottom-right quadrant (value 255).
        let png = quadrant_png(100, 100);
        let config = crop_config(Point::new(30.0, 30.0), 15.0, 15.0, 0.5);
        let converted = convert(&png, &config).unwrap();

        let decoded = image::load_from_memory(&converted.bytes).unwrap().to_rgb8();
        let center = decoded.get_pixel(15, 15);
        assert!(
            center.0[0] > 230,
            "expected bright bottom-right pixels, got {center:?}",
        );
    }

    #[test]
    fn crop_runs_before_resize() {
        // Crop to a 40x30 source rect, then resize to a different
        // target: the output must match the requested target, not the
        // crop's native size.
        let png = quadrant_png(100, 100);
        let mut config = crop_config(Point::new(5.0, 10.0), 20.0, 15.0, 0.5);
        config.width = 80;
        config.height = 20;
        let converted = convert(&png, &config).unwrap();
        assert_eq!(
            converted.dimensions,
            Dimensions {
                width: 80,
                height: 20,
            },
        );
    }

    #[test]
    fn crop_past_the_source_bounds_fails_with_geometry() {
        let png = quadrant_png(100, 100);
        // Maps to 60x60 at (80, 80): extends past 100x100.
        let config = crop_config(Point::new(40.0, 40.0), 30.0, 30.0, 0.5);
        assert!(matches!(
            convert(&png, &config),
            Err(ConvertError::Geometry(_)),
        ));
    }

    #[test]
    fn crop_without_a_measured_ratio_fails_with_geometry() {
        let png = quadrant_png(100, 100);
        let mut config = crop_config(Point::new(10.0, 10.0), 20.0, 20.0, 0.5);
        config.display_ratio = None;
        assert!(matches!(
            convert(&png, &config),
            Err(ConvertError::Geometry(_)),
        ));
    }

    #[test]
    fn conversion_is_idempotent_per_input_pair() {
        let png = quadrant_png(64, 64);
        let config = ConvertConfig {
            width: 32,
            height: 32,
            quality: JpegQuality::Medium,
            ..ConvertConfig::default()
        };
        let first = convert(&png, &config).unwrap();
        let second = convert(&png, &config).unwrap();
        assert_eq!(first.bytes, second.bytes);
        assert_eq!(first.dimensions, second.dimensions);
    }

    #[test]
    fn every_quality_level_produces_a_decodable_jpeg() {
        let png = quadrant_png(64, 64);
        for quality in JpegQuality::ALL {
            let config = ConvertConfig {
                quality,
                ..ConvertConfig::default()
            };
            let converted = convert(&png, &config).unwrap();
            let decoded = image::load_from_memory(&converted.bytes).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (64, 64));
        }
    }

    #[test]
    fn lower_quality_does_not_grow_the_output() {
        let png = quadrant_png(128, 128);
        let low = convert(
            &png,
            &ConvertConfig {
                quality: JpegQuality::Low,
                ..ConvertConfig::default()
            },
        )
        .unwrap();
        let maximum = convert(
            &png,
            &ConvertConfig {
                quality: JpegQuality::Maximum,
                ..ConvertConfig::default()
            },
        )
        .unwrap();
        assert!(
            low.bytes.len() <= maximum.bytes.len(),
            "quality 50 output ({}) larger than quality 100 output ({})",
            low.bytes.len(),
            maximum.bytes.len(),
        );
    }

    #[test]
    fn probe_reads_dimensions_without_converting() {
        let png = quadrant_png(320, 200);
        let dimensions = probe_dimensions(&png).unwrap();
        assert_eq!(
            dimensions,
            Dimensions {
                width: 320,
                height: 200,
            },
        );
    }

    #[test]
    fn probe_rejects_garbage_bytes() {
        assert!(matches!(
            probe_dimensions(&[0x00, 0x01, 0x02]),
            Err(ConvertError::Decode(_)),
        ));
    }
}
