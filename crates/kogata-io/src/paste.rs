//! Clipboard paste subscription for image data.
//!
//! Listens for `paste` events on the window and extracts the first
//! image file from the clipboard's data-transfer items. The
//! subscription is scoped: dropping a [`PasteSubscription`] removes the
//! listener again, so a page component can hold one for exactly as
//! long as it is mounted.
//!
//! Requires a browser environment (`wasm32-unknown-unknown` target).

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// Filename reported when the clipboard file carries no name.
const FALLBACK_NAME: &str = "pasted-image";

/// Errors that can occur when attaching the paste listener.
#[derive(Debug, thiserror::Error)]
pub enum PasteError {
    /// A browser API call returned an error or a required object was missing.
    #[error("paste API error: {0}")]
    JsError(String),
}

impl From<JsValue> for PasteError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// A live `paste` event listener; removed again on drop.
pub struct PasteSubscription {
    target: web_sys::EventTarget,
    closure: Closure<dyn FnMut(web_sys::ClipboardEvent)>,
}

impl PasteSubscription {
    /// Attach a window-level paste listener.
    ///
    /// When the clipboard contains an image file, the event's default
    /// handling is suppressed, the file is read asynchronously, and
    /// `on_paste` is called with `(bytes, filename)`. Non-image pastes
    /// are left to the browser.
    ///
    /// # Errors
    ///
    /// Returns [`PasteError::JsError`] if the browser window is
    /// unavailable or the listener cannot be registered.
    pub fn attach(on_paste: impl Fn(Vec<u8>, String) + 'static) -> Result<Self, PasteError> {
        let window =
            web_sys::window().ok_or_else(|| PasteError::JsError("no global window".into()))?;

        let on_paste = Rc::new(on_paste);
        let closure = Closure::<dyn FnMut(web_sys::ClipboardEvent)>::new(
            move |event: web_sys::ClipboardEvent| {
                if let Some(file) = first_image_file(&event) {
                    event.prevent_default();
                    read_file(file, Rc::clone(&on_paste));
                }
            },
        );

        window.add_event_listener_with_callback("paste", closure.as_ref().unchecked_ref())?;

        Ok(Self {
            target: window.into(),
            closure,
        })
    }
}

impl Drop for PasteSubscription {
    fn drop(&mut self) {
        // Best-effort: the window outlives us, but removal can still
        // fail during teardown.
        let _ = self
            .target
            .remove_event_listener_with_callback("paste", self.closure.as_ref().unchecked_ref());
    }
}

/// Find the first image file among the clipboard's transfer items.
fn first_image_file(event: &web_sys::ClipboardEvent) -> Option<web_sys::File> {
    let items = event.clipboard_data()?.items();
    for index in 0..items.length() {
        let Some(item) = items.get(index) else {
            continue;
        };
        if item.kind() != "file" || !item.type_().starts_with("image/") {
            continue;
        }
        if let Ok(Some(file)) = item.get_as_file() {
            return Some(file);
        }
    }
    None
}

/// Read a clipboard file asynchronously and forward it to the callback.
fn read_file(file: web_sys::File, on_paste: Rc<impl Fn(Vec<u8>, String) + 'static>) {
    let name = match file.name() {
        name if name.is_empty() => FALLBACK_NAME.to_string(),
        name => name,
    };

    wasm_bindgen_futures::spawn_local(async move {
        match JsFuture::from(file.array_buffer()).await {
            Ok(buffer) => {
                let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
                on_paste(bytes, name);
            }
            Err(e) => {
                web_sys::console::warn_1(&format!("failed to read pasted file: {e:?}").into());
            }
        }
    });
}
