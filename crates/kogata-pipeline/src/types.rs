//! Shared types for the kogata conversion pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dimensions::calculate_thumbnail;
use crate::selection::CropSelection;

/// A 2D point in display (preview) pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from the left edge of the preview).
    pub x: f64,
    /// Vertical position (pixels from the top edge of the preview).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Image dimensions in pixels.
///
/// Both values are positive once an image is loaded; `0` only appears
/// as the "not yet known" sentinel inside [`EditorSettings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// JPEG encoder quality, restricted to the four user-facing levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JpegQuality {
    /// Quality 50: smallest output, the default.
    Low,
    /// Quality 85.
    Medium,
    /// Quality 92.
    High,
    /// Quality 100: largest output, minimal compression artifacts.
    Maximum,
}

impl Default for JpegQuality {
    fn default() -> Self {
        Self::Low
    }
}

impl JpegQuality {
    /// All levels in the order the quality selector lists them
    /// (highest first).
    pub const ALL: [Self; 4] = [Self::Maximum, Self::High, Self::Medium, Self::Low];

    /// The numeric quality passed to the JPEG encoder.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Low => 50,
            Self::Medium => 85,
            Self::High => 92,
            Self::Maximum => 100,
        }
    }

    /// Map a numeric quality back to its level.
    ///
    /// Returns `None` for values outside {50, 85, 92, 100}.
    #[must_use]
    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            50 => Some(Self::Low),
            85 => Some(Self::Medium),
            92 => Some(Self::High),
            100 => Some(Self::Maximum),
            _ => None,
        }
    }
}

impl fmt::Display for JpegQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Resampling filter used when resizing to the target dimensions.
///
/// Ordered from fastest/lowest-quality to slowest/highest-quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeFilter {
    /// Nearest-neighbor: fastest, blocky artifacts.
    Nearest,
    /// Bilinear interpolation: fast, decent quality.
    Triangle,
    /// Bicubic (Catmull-Rom): moderate speed, good quality.
    CatmullRom,
    /// Gaussian: moderate speed, smooth output.
    Gaussian,
    /// Lanczos with 3 lobes: slowest, sharpest/best for photos.
    Lanczos3,
}

impl Default for ResizeFilter {
    fn default() -> Self {
        Self::Triangle
    }
}

impl ResizeFilter {
    /// Convert to the `image` crate's `FilterType`.
    #[must_use]
    pub const fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            Self::Nearest => image::imageops::FilterType::Nearest,
            Self::Triangle => image::imageops::FilterType::Triangle,
            Self::CatmullRom => image::imageops::FilterType::CatmullRom,
            Self::Gaussian => image::imageops::FilterType::Gaussian,
            Self::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for ResizeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nearest => f.write_str("Nearest"),
            Self::Triangle => f.write_str("Triangle"),
            Self::CatmullRom => f.write_str("CatmullRom"),
            Self::Gaussian => f.write_str("Gaussian"),
            Self::Lanczos3 => f.write_str("Lanczos3"),
        }
    }
}

/// The user-facing target configuration edited in the settings panel.
///
/// A `width`/`height` of `0` means "unset / use source size".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorSettings {
    /// JPEG encoder quality level.
    pub quality: JpegQuality,
    /// Target width in source pixels, `0` when unset.
    pub width: u32,
    /// Target height in source pixels, `0` when unset.
    pub height: u32,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            quality: JpegQuality::Low,
            width: 0,
            height: 0,
        }
    }
}

/// The materialized instruction set for one conversion run.
///
/// Built by merging the current [`EditorSettings`] with the active crop
/// selection and measured display ratio; passed by value into
/// [`convert`](crate::convert::convert), which retains no state across
/// calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// JPEG encoder quality level.
    pub quality: JpegQuality,
    /// Target width in source pixels, `0` to keep the (cropped) size.
    pub width: u32,
    /// Target height in source pixels, `0` to keep the (cropped) size.
    pub height: u32,
    /// Normalized crop selection in display pixel space, if any.
    pub crop: Option<CropSelection>,
    /// Measured display ratio (displayed width / natural width).
    ///
    /// Required whenever `crop` is present; a selection cannot be
    /// mapped to source space before the preview has been measured.
    pub display_ratio: Option<f64>,
    /// Resampling filter for the resize step.
    pub filter: ResizeFilter,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            quality: JpegQuality::default(),
            width: 0,
            height: 0,
            crop: None,
            display_ratio: None,
            filter: ResizeFilter::default(),
        }
    }
}

impl ConvertConfig {
    /// Quick-mode config: cap the image to `max_size` on its longer
    /// side (two-step thumbnail policy) at the default quality.
    #[must_use]
    pub fn thumbnail(dimensions: Dimensions, max_size: u32) -> Self {
        let target = calculate_thumbnail(dimensions, max_size);
        Self {
            width: target.width,
            height: target.height,
            ..Self::default()
        }
    }
}

/// An encoded output image produced by one conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedImage {
    /// The encoded JPEG bytes.
    pub bytes: Vec<u8>,
    /// Pixel dimensions of the encoded image.
    pub dimensions: Dimensions,
}

impl ConvertedImage {
    /// MIME type of every pipeline output.
    pub const MIME_TYPE: &'static str = "image/jpeg";
}

/// Errors that can occur during a conversion attempt.
///
/// All variants are terminal for the attempt that raised them; nothing
/// is retried internally. Uses custom `Serialize`/`Deserialize` because
/// `image::ImageError` does not implement serde traits; the `Decode`
/// variant is serialized as its `Display` string.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The input bytes are not a supported raster image.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// Crop/resize parameters are out of bounds or non-positive.
    #[error("invalid geometry: {0}")]
    Geometry(String),

    /// A proportional resize was requested with neither width nor
    /// height determinable.
    #[error("resize requested with neither width nor height set")]
    UnsetDimension,

    /// The JPEG encoder rejected the output image.
    #[error("failed to encode JPEG: {0}")]
    Encode(String),
}

/// Serde-compatible proxy for `ConvertError`.
///
/// A deserialized `Decode` wraps the original message in an I/O error
/// (the typed `image::ImageError` cannot be reconstructed), but the
/// message is preserved.
#[derive(Serialize, Deserialize)]
enum ConvertErrorProxy {
    Decode(String),
    Geometry(String),
    UnsetDimension,
    Encode(String),
}

impl Serialize for ConvertError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let proxy = match self {
            Self::Decode(e) => ConvertErrorProxy::Decode(e.to_string()),
            Self::Geometry(s) => ConvertErrorProxy::Geometry(s.clone()),
            Self::UnsetDimension => ConvertErrorProxy::UnsetDimension,
            Self::Encode(s) => ConvertErrorProxy::Encode(s.clone()),
        };
        proxy.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ConvertError {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let proxy = ConvertErrorProxy::deserialize(deserializer)?;
        Ok(match proxy {
            ConvertErrorProxy::Decode(msg) => {
                Self::Decode(image::ImageError::IoError(std::io::Error::other(msg)))
            }
            ConvertErrorProxy::Geometry(s) => Self::Geometry(s),
            ConvertErrorProxy::UnsetDimension => Self::UnsetDimension,
            ConvertErrorProxy::Encode(s) => Self::Encode(s),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn quality_values_match_selector_options() {
        assert_eq!(JpegQuality::Low.value(), 50);
        assert_eq!(JpegQuality::Medium.value(), 85);
        assert_eq!(JpegQuality::High.value(), 92);
        assert_eq!(JpegQuality::Maximum.value(), 100);
    }

    #[test]
    fn quality_default_is_low() {
        assert_eq!(JpegQuality::default(), JpegQuality::Low);
    }

    #[test]
    fn quality_from_value_round_trips() {
        for q in JpegQuality::ALL {
            assert_eq!(JpegQuality::from_value(q.value()), Some(q));
        }
        assert_eq!(JpegQuality::from_value(75), None);
        assert_eq!(JpegQuality::from_value(0), None);
    }

    #[test]
    fn quality_displays_numeric_value() {
        assert_eq!(JpegQuality::High.to_string(), "92");
    }

    #[test]
    fn default_filter_is_triangle() {
        assert_eq!(ResizeFilter::default(), ResizeFilter::Triangle);
    }

    #[test]
    fn default_settings_use_sentinel_dimensions() {
        let settings = EditorSettings::default();
        assert_eq!(settings.quality, JpegQuality::Low);
        assert_eq!(settings.width, 0);
        assert_eq!(settings.height, 0);
    }

    #[test]
    fn thumbnail_config_caps_longer_side() {
        let config = ConvertConfig::thumbnail(
            Dimensions {
                width: 1000,
                height: 2000,
            },
            1024,
        );
        assert_eq!(config.height, 1024);
        assert_eq!(config.width, 512);
        assert_eq!(config.quality, JpegQuality::Low);
        assert!(config.crop.is_none());
    }

    #[test]
    fn thumbnail_config_leaves_small_images_alone() {
        let config = ConvertConfig::thumbnail(
            Dimensions {
                width: 640,
                height: 480,
            },
            1024,
        );
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 480);
    }

    #[test]
    fn convert_config_serde_round_trip() {
        let config = ConvertConfig {
            quality: JpegQuality::High,
            width: 800,
            height: 600,
            crop: None,
            display_ratio: Some(0.5),
            filter: ResizeFilter::Lanczos3,
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: ConvertConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn error_geometry_display() {
        let err = ConvertError::Geometry("crop exceeds source bounds".to_string());
        assert_eq!(err.to_string(), "invalid geometry: crop exceeds source bounds");
    }

    #[test]
    fn error_unset_dimension_display() {
        assert_eq!(
            ConvertError::UnsetDimension.to_string(),
            "resize requested with neither width nor height set",
        );
    }

    #[test]
    fn error_serde_preserves_decode_message() {
        let err = ConvertError::Decode(image::ImageError::IoError(std::io::Error::other(
            "truncated header",
        )));
        let json = serde_json::to_string(&err).unwrap();
        let deserialized: ConvertError = serde_json::from_str(&json).unwrap();
        match deserialized {
            ConvertError::Decode(inner) => {
                assert!(inner.to_string().contains("truncated header"));
            }
            other => panic!("expected Decode, got {other:?}"),
        }
    }
}
