//! Conversion settings panel.
//!
//! Quality selector, width/height inputs with an optional keep-ratio
//! link, and the thumbnail / reset shortcuts. Dimension edits are
//! debounced so a conversion is not scheduled on every keystroke;
//! quality changes and button clicks fire immediately.

use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use kogata_pipeline::{Dimensions, EditorSettings, JpegQuality};

use crate::format::format_bytes;

/// Longer-side cap applied by the thumbnail shortcut, in pixels.
pub const THUMBNAIL_MAX_SIZE: u32 = 1024;

/// Quiet period after the last keystroke before a dimension edit is
/// applied, in milliseconds.
const DEBOUNCE_MS: u32 = 300;

/// One settings mutation, emitted to the page's dispatch handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsEvent {
    /// The quality selector changed.
    Quality(JpegQuality),
    /// A (debounced) width edit settled.
    Width {
        /// The parsed pixel value.
        value: u32,
        /// Whether the height should follow proportionally.
        keep_ratio: bool,
    },
    /// A (debounced) height edit settled.
    Height {
        /// The parsed pixel value.
        value: u32,
        /// Whether the width should follow proportionally.
        keep_ratio: bool,
    },
    /// The thumbnail shortcut was clicked.
    Thumbnail(u32),
    /// The reset button was clicked.
    Reset,
}

/// Props for the [`SettingsPanel`] component.
#[derive(Props, Clone, PartialEq)]
pub struct SettingsPanelProps {
    /// Current settings (read-only; mutations flow through `on_change`).
    settings: EditorSettings,
    /// The displayed "original" dimensions, shown next to the inputs.
    metadata: Option<Dimensions>,
    /// Byte length of the loaded source file, if known.
    source_len: Option<usize>,
    /// Fired for every settled settings mutation.
    on_change: EventHandler<SettingsEvent>,
}

/// Renders the quality / dimensions / shortcuts panel.
#[component]
pub fn SettingsPanel(props: SettingsPanelProps) -> Element {
    let on_change = props.on_change;
    let keep_ratio = use_signal(|| true);

    // Edit epochs for debouncing: each keystroke bumps the epoch, and
    // only the task that still holds the latest epoch after the quiet
    // period fires the event.
    let width_epoch = use_signal(|| 0u64);
    let height_epoch = use_signal(|| 0u64);

    let on_quality = move |evt: FormEvent| {
        let Ok(value) = evt.value().parse::<u8>() else {
            return;
        };
        if let Some(quality) = JpegQuality::from_value(value) {
            on_change.call(SettingsEvent::Quality(quality));
        }
    };

    let on_width_input = debounced_edit(width_epoch, keep_ratio, move |value, keep_ratio| {
        on_change.call(SettingsEvent::Width { value, keep_ratio });
    });
    let on_height_input = debounced_edit(height_epoch, keep_ratio, move |value, keep_ratio| {
        on_change.call(SettingsEvent::Height { value, keep_ratio });
    });

    let thumbnail_active =
        props.settings.width.max(props.settings.height) == THUMBNAIL_MAX_SIZE;
    let thumbnail_class = if thumbnail_active {
        "settings-button active"
    } else {
        "settings-button"
    };

    rsx! {
        div { class: "settings-panel",
            div { class: "settings-row",
                label { r#for: "quality", "Quality" }
                select {
                    id: "quality",
                    value: "{props.settings.quality}",
                    onchange: on_quality,

                    for quality in JpegQuality::ALL {
                        option {
                            value: "{quality}",
                            selected: quality == props.settings.quality,
                            "{quality}"
                        }
                    }
                }
            }

            div { class: "settings-row",
                label { r#for: "target-width", "Width" }
                input {
                    id: "target-width",
                    r#type: "number",
                    min: "1",
                    value: "{props.settings.width}",
                    oninput: on_width_input,
                }
                label { r#for: "target-height", "Height" }
                input {
                    id: "target-height",
                    r#type: "number",
                    min: "1",
                    value: "{props.settings.height}",
                    oninput: on_height_input,
                }
            }

            div { class: "settings-row",
                input {
                    r#type: "checkbox",
                    id: "keep-ratio",
                    checked: keep_ratio(),
                    onchange: {
                        let mut keep_ratio = keep_ratio;
                        move |evt: FormEvent| keep_ratio.set(evt.checked())
                    },
                }
                label { r#for: "keep-ratio", "Keep aspect ratio" }
            }

            if let Some(original) = props.metadata {
                p { class: "settings-original",
                    if let Some(len) = props.source_len {
                        "Original: {original.width} × {original.height}, {format_bytes(len)}"
                    } else {
                        "Original: {original.width} × {original.height}"
                    }
                }
            }

            div { class: "settings-row",
                button {
                    class: "{thumbnail_class}",
                    onclick: move |_| {
                        on_change.call(SettingsEvent::Thumbnail(THUMBNAIL_MAX_SIZE));
                    },
                    "Thumbnail {THUMBNAIL_MAX_SIZE}"
                }
                button {
                    class: "settings-button",
                    onclick: move |_| on_change.call(SettingsEvent::Reset),
                    "Reset size"
                }
            }
        }
    }
}

/// Build a debounced `oninput` handler for one dimension field.
///
/// Unparseable input (an empty or partially typed field) is ignored;
/// the epoch check discards every pending task except the one for the
/// most recent keystroke.
fn debounced_edit(
    mut epoch: Signal<u64>,
    keep_ratio: Signal<bool>,
    apply: impl Fn(u32, bool) + Copy + 'static,
) -> impl FnMut(FormEvent) + 'static {
    move |evt: FormEvent| {
        let Ok(value) = evt.value().parse::<u32>() else {
            return;
        };
        epoch += 1;
        let my_epoch = *epoch.peek();
        let keep = *keep_ratio.peek();
        spawn(async move {
            TimeoutFuture::new(DEBOUNCE_MS).await;
            if *epoch.peek() == my_epoch {
                apply(value, keep);
            }
        });
    }
}
