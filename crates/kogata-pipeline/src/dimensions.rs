//! Ratio-preserving dimension arithmetic.
//!
//! Pure integer geometry shared by the settings panel (manual
//! width/height edits with "keep ratio" enabled) and the thumbnail
//! shortcut. The unset side of a proportional resize is always rounded
//! **up**, so enlarging never truncates to a smaller-than-intended box.

use crate::types::{ConvertError, Dimensions};

/// A proportional resize request carrying at most one anchored side.
///
/// Field order matters for resolution: `height` takes precedence when
/// both are set, matching the settings panel's check order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizeRequest {
    /// Requested width in pixels, if anchoring on width.
    pub width: Option<u32>,
    /// Requested height in pixels, if anchoring on height.
    pub height: Option<u32>,
}

impl ResizeRequest {
    /// Anchor on height.
    #[must_use]
    pub const fn height(height: u32) -> Self {
        Self {
            width: None,
            height: Some(height),
        }
    }

    /// Anchor on width.
    #[must_use]
    pub const fn width(width: u32) -> Self {
        Self {
            width: Some(width),
            height: None,
        }
    }
}

/// Scale `base` proportionally so the anchored side of `request`
/// matches exactly; the other side is the ceiling of the scaled value.
///
/// # Errors
///
/// Returns [`ConvertError::UnsetDimension`] when the request carries
/// neither width nor height.
pub fn resize_dimension(
    base: Dimensions,
    request: ResizeRequest,
) -> Result<Dimensions, ConvertError> {
    if let Some(height) = request.height {
        return Ok(anchor_height(base, height));
    }
    if let Some(width) = request.width {
        return Ok(anchor_width(base, width));
    }
    Err(ConvertError::UnsetDimension)
}

/// Cap `dimensions` to `max_size` on its longer side, preserving ratio.
///
/// The policy is deliberately sequential, not a single atomic
/// longer-side calculation: the height cap is applied first, and the
/// width check then runs against the *already-updated* pair. A square
/// image over the cap is therefore resized by height and its derived
/// width (now exactly `max_size`) is left alone. For extreme aspect
/// ratios the ceiling rounding of the first step can leave the width
/// one pixel over the cap, which the second step then corrects; both
/// steps must be reproduced as-is for borderline sizes.
#[must_use]
pub fn calculate_thumbnail(dimensions: Dimensions, max_size: u32) -> Dimensions {
    let mut dimensions = dimensions;

    if dimensions.height > max_size {
        dimensions = anchor_height(dimensions, max_size);
    }

    if dimensions.width > max_size {
        dimensions = anchor_width(dimensions, max_size);
    }

    dimensions
}

/// Set height exactly; width becomes `ceil(height / base.h * base.w)`.
fn anchor_height(base: Dimensions, height: u32) -> Dimensions {
    Dimensions {
        height,
        width: scale_ceil(height, base.height, base.width),
    }
}

/// Set width exactly; height becomes `ceil(width / base.w * base.h)`.
fn anchor_width(base: Dimensions, width: u32) -> Dimensions {
    Dimensions {
        width,
        height: scale_ceil(width, base.width, base.height),
    }
}

/// `ceil(requested / base_anchor * base_other)` in f64, clamped to the
/// u32 range. A zero `base_anchor` yields zero rather than dividing by
/// zero; callers only reach this once an image is loaded, so both base
/// sides are positive in practice.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale_ceil(requested: u32, base_anchor: u32, base_other: u32) -> u32 {
    if base_anchor == 0 {
        return 0;
    }
    let scaled = f64::from(requested) / f64::from(base_anchor) * f64::from(base_other);
    scaled.ceil().clamp(0.0, f64::from(u32::MAX)) as u32
}
