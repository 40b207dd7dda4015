//! Source image preview with display-ratio measurement.

use dioxus::prelude::*;
use kogata_pipeline::CropSelection;
use wasm_bindgen::JsCast;

use crate::components::CropOverlay;

/// DOM id of the preview `<img>`, used to read its rendered width.
const PREVIEW_IMG_ID: &str = "source-preview-image";

/// Props for the [`SourcePreview`] component.
#[derive(Props, Clone, PartialEq)]
pub struct SourcePreviewProps {
    /// Blob URL of the source image.
    src_url: String,
    /// The committed crop selection, rendered by the overlay.
    selection: Option<CropSelection>,
    /// Fired with `displayed_width / natural_width` once the image has
    /// loaded (and again after each reload).
    on_display_ratio: EventHandler<f64>,
    /// Fired with the raw drag rectangle on mouseup.
    on_select: EventHandler<CropSelection>,
}

/// The scaled-down source preview with the crop overlay on top.
///
/// Crop selections are made against the *rendered* pixel grid, so every
/// consumer of a selection needs the display ratio; it is measured from
/// the live DOM element when the image finishes loading.
#[component]
pub fn SourcePreview(props: SourcePreviewProps) -> Element {
    let on_display_ratio = props.on_display_ratio;
    let on_load = move |_| {
        if let Some(ratio) = measure_display_ratio() {
            on_display_ratio.call(ratio);
        }
    };

    rsx! {
        div { class: "source-preview",
            img {
                id: "{PREVIEW_IMG_ID}",
                src: "{props.src_url}",
                draggable: false,
                onload: on_load,
            }
            CropOverlay {
                selection: props.selection,
                on_select: props.on_select,
            }
        }
    }
}

/// Read `displayed_width / natural_width` from the live preview element.
///
/// Returns `None` when the element is missing or has no natural width
/// yet (decode not finished); callers simply keep the previous ratio.
fn measure_display_ratio() -> Option<f64> {
    let element = web_sys::window()?
        .document()?
        .get_element_by_id(PREVIEW_IMG_ID)?;
    let img = element.dyn_into::<web_sys::HtmlImageElement>().ok()?;

    let natural = img.natural_width();
    if natural == 0 {
        return None;
    }

    Some(f64::from(img.client_width()) / f64::from(natural))
}
