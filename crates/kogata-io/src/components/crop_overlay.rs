//! Mouse-drag crop selection overlay.
//!
//! Sits on top of the preview image and tracks mousedown / mousemove /
//! mouseup into a display-space rectangle. The drag extents are signed
//! while the mouse is down (dragging up or left produces negative
//! width/height); only the raw rectangle is emitted on mouseup, and the
//! caller normalizes and applies the minimum-size rule.

use dioxus::prelude::*;
use kogata_pipeline::{CropSelection, Point};

/// Props for the [`CropOverlay`] component.
#[derive(Props, Clone, PartialEq)]
pub struct CropOverlayProps {
    /// The committed selection to render when no drag is in progress.
    selection: Option<CropSelection>,
    /// Fired with the raw (signed, unfiltered) rectangle on mouseup.
    on_select: EventHandler<CropSelection>,
}

/// Transparent drag surface that draws the selection rectangle.
#[component]
pub fn CropOverlay(props: CropOverlayProps) -> Element {
    // In-progress drag, if any.
    let mut drag = use_signal(|| Option::<CropSelection>::None);

    let on_mouse_down = move |evt: MouseEvent| {
        let at = evt.element_coordinates();
        drag.set(Some(CropSelection::new(Point::new(at.x, at.y), 0.0, 0.0)));
    };

    let on_mouse_move = move |evt: MouseEvent| {
        let Some(current) = drag() else {
            return;
        };
        let at = evt.element_coordinates();
        drag.set(Some(CropSelection::new(
            current.origin,
            at.x - current.origin.x,
            at.y - current.origin.y,
        )));
    };

    let on_select = props.on_select;
    let mut finish_drag = move || {
        if let Some(current) = drag() {
            drag.set(None);
            on_select.call(current);
        }
    };

    // Show the live drag while the mouse is down, the committed
    // selection otherwise.
    let visible = drag().or(props.selection);

    rsx! {
        div {
            class: "crop-overlay",
            onmousedown: on_mouse_down,
            onmousemove: on_mouse_move,
            onmouseup: move |_| finish_drag(),
            // Leaving the preview mid-drag commits what was selected
            // so far rather than leaving a stuck drag state.
            onmouseleave: move |_| finish_drag(),

            if let Some(rect) = visible {
                div {
                    class: "crop-rect",
                    style: "{rect_style(&rect)}",
                }
            }
        }
    }
}

/// Absolute-position style for a possibly signed selection rectangle.
fn rect_style(selection: &CropSelection) -> String {
    let left = selection.origin.x + selection.width.min(0.0);
    let top = selection.origin.y + selection.height.min(0.0);
    format!(
        "left: {left}px; top: {top}px; width: {}px; height: {}px;",
        selection.width.abs(),
        selection.height.abs(),
    )
}
