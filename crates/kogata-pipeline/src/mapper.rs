//! Display-space to source-space coordinate mapping.
//!
//! The preview image is rendered at a (usually smaller) display size;
//! the single scale factor relating the two spaces is the display
//! ratio, `displayed_width / natural_width`. Mapping inverts that
//! ratio and rounds each coordinate independently to nearest; a small
//! systematic bias either way is visually negligible, but the rounding
//! must be consistent for reproducibility.

use serde::{Deserialize, Serialize};

use crate::selection::CropSelection;
use crate::types::{ConvertError, Dimensions};

/// A crop rectangle in source (full-resolution) pixel coordinates.
///
/// Covers the half-open pixel range `[x, x + width) × [y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRect {
    /// Left edge in source pixels.
    pub x: u32,
    /// Top edge in source pixels.
    pub y: u32,
    /// Width in source pixels.
    pub width: u32,
    /// Height in source pixels.
    pub height: u32,
}

impl SourceRect {
    /// Map a normalized display-space selection into source pixels.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Geometry`] when `display_ratio` is not
    /// positive (the preview has not been measured yet; callers must
    /// gate on a measured ratio) or when the selection carries a
    /// negative coordinate.
    pub fn from_selection(
        selection: &CropSelection,
        display_ratio: f64,
    ) -> Result<Self, ConvertError> {
        if display_ratio <= 0.0 {
            return Err(ConvertError::Geometry(format!(
                "display ratio must be positive, got {display_ratio}"
            )));
        }

        let inverse = 1.0 / display_ratio;

        Ok(Self {
            x: scale_round(selection.origin.x, inverse)?,
            y: scale_round(selection.origin.y, inverse)?,
            width: scale_round(selection.width, inverse)?,
            height: scale_round(selection.height, inverse)?,
        })
    }

    /// Check the rectangle against the decoded source dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Geometry`] when the rectangle is empty
    /// on either axis or extends past the source bounds.
    pub fn validate_within(&self, source: Dimensions) -> Result<(), ConvertError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConvertError::Geometry(format!(
                "crop rectangle {}x{} is empty",
                self.width, self.height
            )));
        }

        let right = u64::from(self.x) + u64::from(self.width);
        let bottom = u64::from(self.y) + u64::from(self.height);
        if right > u64::from(source.width) || bottom > u64::from(source.height) {
            return Err(ConvertError::Geometry(format!(
                "crop rectangle {}x{}+{}+{} exceeds source bounds {}x{}",
                self.width, self.height, self.x, self.y, source.width, source.height
            )));
        }

        Ok(())
    }
}

/// Round one display coordinate to the nearest source pixel.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale_round(value: f64, inverse_ratio: f64) -> Result<u32, ConvertError> {
    let scaled = (value * inverse_ratio).round();
    if scaled < 0.0 || scaled > f64::from(u32::MAX) {
        return Err(ConvertError::Geometry(format!(
            "coordinate {value} maps outside the source pixel range"
        )));
    }
    Ok(scaled as u32)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Point;

    #[test]
    fn half_ratio_doubles_every_coordinate() {
        let selection = CropSelection::new(Point::new(10.0, 20.0), 30.0, 40.0);
        let rect = SourceRect::from_selection(&selection, 0.5).unwrap();
        assert_eq!(
            rect,
            SourceRect {
                x: 20,
                y: 40,
                width: 60,
                height: 80,
            },
        );
    }

    #[test]
    fn unity_ratio_is_identity_modulo_rounding() {
        let selection = CropSelection::new(Point::new(10.4, 20.6), 30.5, 40.49);
        let rect = SourceRect::from_selection(&selection, 1.0).unwrap();
        assert_eq!(rect.x, 10);
        assert_eq!(rect.y, 21);
        // .5 rounds away from zero.
        assert_eq!(rect.width, 31);
        assert_eq!(rect.height, 40);
    }

    #[test]
    fn each_coordinate_rounds_independently() {
        // ratio 1/3: every display pixel is three source pixels.
        let selection = CropSelection::new(Point::new(10.1, 10.2), 10.1, 10.2);
        let ratio = 1.0 / 3.0;
        let rect = SourceRect::from_selection(&selection, ratio).unwrap();
        assert_eq!(rect.x, 30);
        assert_eq!(rect.y, 31);
        assert_eq!(rect.width, 30);
        assert_eq!(rect.height, 31);
    }

    #[test]
    fn unmeasured_ratio_is_rejected() {
        let selection = CropSelection::new(Point::new(10.0, 10.0), 20.0, 20.0);
        assert!(matches!(
            SourceRect::from_selection(&selection, 0.0),
            Err(ConvertError::Geometry(_)),
        ));
        assert!(matches!(
            SourceRect::from_selection(&selection, -0.5),
            Err(ConvertError::Geometry(_)),
        ));
    }

    #[test]
    fn negative_coordinates_are_rejected() {
        let selection = CropSelection::new(Point::new(-3.0, 10.0), 20.0, 20.0);
        assert!(matches!(
            SourceRect::from_selection(&selection, 0.5),
            Err(ConvertError::Geometry(_)),
        ));
    }

    #[test]
    fn validate_accepts_a_rect_inside_the_source() {
        let rect = SourceRect {
            x: 10,
            y: 10,
            width: 80,
            height: 80,
        };
        let source = Dimensions {
            width: 100,
            height: 100,
        };
        assert!(rect.validate_within(source).is_ok());
    }

    #[test]
    fn validate_accepts_a_rect_touching_the_edges() {
        let rect = SourceRect {
            x: 0,
            y: 0,
            width: 100,
            height: 100,
        };
        let source = Dimensions {
            width: 100,
            height: 100,
        };
        assert!(rect.validate_within(source).is_ok());
    }

    #[test]
    fn validate_rejects_a_rect_past_the_bounds() {
        let rect = SourceRect {
            x: 50,
            y: 50,
            width: 60,
            height: 10,
        };
        let source = Dimensions {
            width: 100,
            height: 100,
        };
        assert!(matches!(
            rect.validate_within(source),
            Err(ConvertError::Geometry(_)),
        ));
    }

    #[test]
    fn validate_rejects_an_empty_rect() {
        let rect = SourceRect {
            x: 0,
            y: 0,
            width: 0,
            height: 10,
        };
        let source = Dimensions {
            width: 100,
            height: 100,
        };
        assert!(matches!(
            rect.validate_within(source),
            Err(ConvertError::Geometry(_)),
        ));
    }
}
