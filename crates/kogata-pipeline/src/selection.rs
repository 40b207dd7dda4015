//! Crop selections drawn over the scaled preview image.
//!
//! A selection lives in *display* pixel space (the rendered preview's
//! pixel grid). While the user is dragging, `width`/`height` carry the
//! drag direction as their sign; downstream consumers only ever see the
//! normalized form.

use serde::{Deserialize, Serialize};

use crate::types::Point;

/// Selections smaller than this on both axes (display pixels, after
/// normalization) are treated as accidental clicks, not crops.
pub const MIN_SELECTION_PX: f64 = 5.0;

/// A user-drawn crop rectangle in display pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropSelection {
    /// The drag anchor point.
    pub origin: Point,
    /// Horizontal extent; negative while dragging leftwards.
    pub width: f64,
    /// Vertical extent; negative while dragging upwards.
    pub height: f64,
}

impl CropSelection {
    /// Create a selection from a drag anchor and signed extents.
    #[must_use]
    pub const fn new(origin: Point, width: f64, height: f64) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Fold negative extents into the origin so both sides are
    /// non-negative, and discard selections too small to be
    /// intentional.
    ///
    /// Returns `None` when `max(|width|, |height|)` is below
    /// [`MIN_SELECTION_PX`], which is an empty click or a tiny
    /// accidental drag.
    #[must_use]
    pub fn normalized(&self) -> Option<Self> {
        let mut x = self.origin.x;
        let mut y = self.origin.y;
        let mut width = self.width;
        let mut height = self.height;

        if width < 0.0 {
            x += width;
            width = -width;
        }

        if height < 0.0 {
            y += height;
            height = -height;
        }

        if width < MIN_SELECTION_PX && height < MIN_SELECTION_PX {
            return None;
        }

        Some(Self {
            origin: Point::new(x, y),
            width,
            height,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalized_keeps_a_forward_drag() {
        let selection = CropSelection::new(Point::new(10.0, 20.0), 30.0, 40.0);
        let normalized = selection.normalized().unwrap();
        assert_eq!(normalized, selection);
    }

    #[test]
    fn normalized_folds_a_leftward_upward_drag() {
        // Drag from (50, 60) to (20, 25): width -30, height -35.
        let selection = CropSelection::new(Point::new(50.0, 60.0), -30.0, -35.0);
        let normalized = selection.normalized().unwrap();
        assert_eq!(
            normalized,
            CropSelection::new(Point::new(20.0, 25.0), 30.0, 35.0),
        );
    }

    #[test]
    fn normalized_folds_one_negative_axis() {
        let selection = CropSelection::new(Point::new(50.0, 60.0), -30.0, 35.0);
        let normalized = selection.normalized().unwrap();
        assert_eq!(
            normalized,
            CropSelection::new(Point::new(20.0, 60.0), 30.0, 35.0),
        );
    }

    #[test]
    fn normalized_discards_sub_threshold_selections() {
        let selection = CropSelection::new(Point::new(10.0, 10.0), 4.0, 4.0);
        assert!(selection.normalized().is_none());

        let selection = CropSelection::new(Point::new(10.0, 10.0), -4.9, 4.9);
        assert!(selection.normalized().is_none());
    }

    #[test]
    fn normalized_keeps_a_selection_at_the_threshold() {
        let selection = CropSelection::new(Point::new(0.0, 0.0), 5.0, 5.0);
        assert!(selection.normalized().is_some());
    }

    #[test]
    fn normalized_keeps_a_selection_long_on_one_axis_only() {
        // One axis over the threshold is enough; the zero-height crop
        // is rejected later by the geometry validation, not here.
        let selection = CropSelection::new(Point::new(0.0, 0.0), 40.0, 0.0);
        assert!(selection.normalized().is_some());
    }

    #[test]
    fn normalized_discards_a_bare_click() {
        let selection = CropSelection::new(Point::new(100.0, 100.0), 0.0, 0.0);
        assert!(selection.normalized().is_none());
    }
}
