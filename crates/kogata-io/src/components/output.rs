//! Converted output panel with preview, size readout, and download.

use std::rc::Rc;

use dioxus::prelude::*;
use kogata_pipeline::ConvertedImage;

use crate::download;
use crate::format::format_bytes;

/// Props for the [`OutputPanel`] component.
#[derive(Props, Clone)]
pub struct OutputPanelProps {
    /// The latest committed conversion result. `None` hides the panel
    /// body. Wrapped in `Rc` to avoid cloning JPEG bytes per render.
    output: Option<Rc<ConvertedImage>>,
    /// Blob URL for the output bytes, owned by the page (which revokes
    /// the previous URL whenever a fresh result is committed).
    src_url: Option<String>,
    /// Base filename (without extension) for the download.
    filename: String,
    /// Whether a conversion is currently in flight.
    converting: bool,
}

impl PartialEq for OutputPanelProps {
    fn eq(&self, other: &Self) -> bool {
        let outputs_eq = match (&self.output, &other.output) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        outputs_eq
            && self.src_url == other.src_url
            && self.filename == other.filename
            && self.converting == other.converting
    }
}

/// Shows the converted JPEG, its dimensions and encoded size, and a
/// download button named after the source file.
#[component]
pub fn OutputPanel(props: OutputPanelProps) -> Element {
    let mut download_error = use_signal(|| Option::<String>::None);

    let download_click = {
        let output = props.output.clone();
        let filename = props.filename.clone();
        move |_| {
            if let Some(ref image) = output {
                let download_name = format!("{filename}.jpg");
                match download::trigger_download(
                    &image.bytes,
                    &download_name,
                    ConvertedImage::MIME_TYPE,
                ) {
                    Ok(()) => download_error.set(None),
                    Err(e) => download_error.set(Some(format!("Download failed: {e}"))),
                }
            }
        }
    };

    rsx! {
        div { class: "output-panel",
            h3 { "Result" }

            if props.converting {
                p { class: "output-status", "Converting..." }
            }

            if let Some(ref err) = download_error() {
                p { class: "output-error", "{err}" }
            }

            if let Some(ref image) = props.output {
                if let Some(ref url) = props.src_url {
                    img { class: "output-preview", src: "{url}" }
                }
                p { class: "output-meta",
                    "{image.dimensions.width} × {image.dimensions.height}, \
                     {format_bytes(image.bytes.len())}"
                }
                button {
                    class: "settings-button",
                    onclick: download_click,
                    "Download {props.filename}.jpg"
                }
            } else if !props.converting {
                p { class: "output-placeholder", "No result yet" }
            }
        }
    }
}
