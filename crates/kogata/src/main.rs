use std::fmt;
use std::rc::Rc;

use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use kogata_io::{
    FileUpload, OutputPanel, PasteSubscription, SettingsEvent, SettingsPanel, SourcePreview,
    THUMBNAIL_MAX_SIZE, blob, download, format::format_bytes,
};
use kogata_pipeline::{ConvertConfig, ConvertedImage, CropSelection, EditorState};

fn main() {
    dioxus::launch(app);
}

/// The two application pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    /// Full editor: crop, resize, quality, preview.
    Editor,
    /// One-shot mode: paste or drop an image, get a thumbnail download.
    Quick,
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Editor => f.write_str("Editor"),
            Self::Quick => f.write_str("Quick"),
        }
    }
}

/// Root application component: header, page navigation, active page.
fn app() -> Element {
    let mut page = use_signal(|| Page::Editor);

    rsx! {
        style { dangerous_inner_html: include_str!("style.css") }

        div { class: "app",
            header {
                h1 { "kogata" }
                p { "Paste, crop, and shrink images into compact JPEGs" }
                nav {
                    for candidate in [Page::Editor, Page::Quick] {
                        button {
                            class: if page() == candidate { "nav-button active" } else { "nav-button" },
                            onclick: move |_| page.set(candidate),
                            "{candidate}"
                        }
                    }
                }
            }

            match page() {
                Page::Editor => rsx! { EditorPage {} },
                Page::Quick => rsx! { QuickPage {} },
            }
        }
    }
}

/// Guess a MIME type from a filename extension, for the source preview
/// Blob. Pasted images without a name default to PNG, which is what
/// browsers put on the clipboard.
fn mime_for(name: &str) -> &'static str {
    match name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ext) if ext == "bmp" => "image/bmp",
        Some(ext) if ext == "webp" => "image/webp",
        _ => "image/png",
    }
}

/// Strip the extension for use as the download base name.
fn file_stem(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(base, _)| base)
}

/// The full editor page.
///
/// Owns the [`EditorState`] signal plus the Blob URLs for the source
/// and output previews. Every input mutation goes through one of the
/// event handlers below, which update the state machine and then call
/// `schedule_convert`, the single place a conversion is started.
#[component]
#[allow(clippy::too_many_lines)]
fn EditorPage() -> Element {
    let mut editor = use_signal(EditorState::new);
    let mut filename = use_signal(|| String::from("output"));
    let mut source_url = use_signal(|| Option::<String>::None);
    let mut output_url = use_signal(|| Option::<String>::None);
    let mut converting = use_signal(|| false);
    let mut load_error = use_signal(|| Option::<String>::None);

    // Snapshot the current inputs into a job and run it off the event
    // handler. The job carries the generation it was started with;
    // `commit` rejects it if a newer job has been scheduled since, so
    // overlapping conversions resolve to the newest inputs no matter
    // which one settles last.
    let schedule_convert = move || {
        let Some(job) = editor.write().begin_convert() else {
            return;
        };
        converting.set(true);

        spawn(async move {
            // Yield to the browser event loop so it can paint the
            // "Converting..." state before the synchronous pixel work
            // blocks the thread.
            TimeoutFuture::new(0).await;

            let result = kogata_pipeline::convert(&job.bytes, &job.config);

            // Stale: a newer job owns the converting flag and the URL.
            if !editor.write().commit(job.generation, result) {
                return;
            }

            if let Some(image) = editor.read().output() {
                if let Some(old) = output_url() {
                    blob::revoke_blob_url(&old);
                }
                match blob::bytes_to_blob_url(&image.bytes, ConvertedImage::MIME_TYPE) {
                    Ok(url) => output_url.set(Some(url)),
                    Err(e) => {
                        web_sys::console::warn_1(&format!("output preview failed: {e}").into());
                        output_url.set(None);
                    }
                }
            }

            converting.set(false);
        });
    };

    // Shared by the upload zone and the paste subscription. A Callback
    // rather than a plain closure: the paste listener fires from a raw
    // DOM event with no component scope on the stack, and
    // `Callback::call` re-enters the runtime it was created in, which
    // `spawn` inside `schedule_convert` requires.
    let load_image = use_callback(move |(bytes, name): (Vec<u8>, String)| {
        let mut schedule = schedule_convert;

        if let Err(e) = editor.write().load_source(bytes) {
            load_error.set(Some(format!("{e}")));
            return;
        }
        load_error.set(None);
        filename.set(file_stem(&name).to_owned());

        if let Some(old) = source_url() {
            blob::revoke_blob_url(&old);
        }
        match editor
            .read()
            .source_bytes()
            .map(|bytes| blob::bytes_to_blob_url(&bytes, mime_for(&name)))
        {
            Some(Ok(url)) => source_url.set(Some(url)),
            Some(Err(e)) => {
                load_error.set(Some(format!("Preview failed: {e}")));
                source_url.set(None);
            }
            None => source_url.set(None),
        }

        schedule();
    });

    // Window-level paste listener, scoped to this page: dropping the
    // subscription on unmount removes the DOM listener again.
    let _paste = use_hook(move || {
        Rc::new(
            PasteSubscription::attach(move |bytes, name| load_image.call((bytes, name)))
                .map_err(|e| web_sys::console::warn_1(&format!("paste unavailable: {e}").into()))
                .ok(),
        )
    });

    let on_upload = move |args: (Vec<u8>, String)| load_image.call(args);

    let on_settings = move |event: SettingsEvent| {
        let mut schedule = schedule_convert;
        {
            let mut state = editor.write();
            match event {
                SettingsEvent::Quality(quality) => state.set_quality(quality),
                SettingsEvent::Width { value, keep_ratio } => {
                    state.request_width(value, keep_ratio);
                }
                SettingsEvent::Height { value, keep_ratio } => {
                    state.request_height(value, keep_ratio);
                }
                SettingsEvent::Thumbnail(max_size) => state.apply_thumbnail(max_size),
                SettingsEvent::Reset => state.reset_dimensions(),
            }
        }
        schedule();
    };

    let on_select = move |raw: CropSelection| {
        let mut schedule = schedule_convert;
        editor.write().apply_selection(raw);
        schedule();
    };

    let on_display_ratio = move |ratio: f64| {
        let mut schedule = schedule_convert;
        editor.write().set_display_ratio(ratio);
        // The ratio only changes the conversion when a selection needs
        // remapping; a bare image reload keeps its scheduled result.
        if editor.read().selection().is_some() {
            schedule();
        }
    };

    let (settings, metadata, selection, source_len, output, convert_error) = {
        let state = editor.read();
        (
            state.settings(),
            state.metadata(),
            state.selection(),
            state.source_len(),
            state.output(),
            state.error().map(ToString::to_string),
        )
    };

    rsx! {
        div { class: "page",
            FileUpload { on_upload: on_upload }

            if let Some(ref err) = load_error() {
                p { class: "page-error", "{err}" }
            }

            if let Some(url) = source_url() {
                SourcePreview {
                    src_url: url,
                    selection: selection,
                    on_display_ratio: on_display_ratio,
                    on_select: on_select,
                }

                SettingsPanel {
                    settings: settings,
                    metadata: metadata,
                    source_len: source_len,
                    on_change: on_settings,
                }
            }

            if let Some(ref err) = convert_error {
                p { class: "page-error", "{err}" }
            }

            OutputPanel {
                output: output,
                src_url: output_url(),
                filename: filename(),
                converting: converting(),
            }
        }
    }
}

/// One-shot quick mode: any image dropped or pasted here is capped to
/// [`THUMBNAIL_MAX_SIZE`] at the default quality and downloaded
/// immediately, named after the input.
#[component]
fn QuickPage() -> Element {
    let mut results = use_signal(Vec::<String>::new);
    let mut error = use_signal(|| Option::<String>::None);

    // Callback for the same reason as the editor page: the paste
    // listener fires outside the runtime, and `spawn` below needs it.
    let process = use_callback(move |(bytes, name): (Vec<u8>, String)| {
        spawn(async move {
            TimeoutFuture::new(0).await;

            let converted = kogata_pipeline::probe_dimensions(&bytes).and_then(|dimensions| {
                let config = ConvertConfig::thumbnail(dimensions, THUMBNAIL_MAX_SIZE);
                kogata_pipeline::convert(&bytes, &config)
            });

            match converted {
                Ok(image) => {
                    let download_name = format!("{}.jpg", file_stem(&name));
                    match download::trigger_download(
                        &image.bytes,
                        &download_name,
                        ConvertedImage::MIME_TYPE,
                    ) {
                        Ok(()) => {
                            error.set(None);
                            results.write().push(format!(
                                "{download_name} ({} × {}, {})",
                                image.dimensions.width,
                                image.dimensions.height,
                                format_bytes(image.bytes.len()),
                            ));
                        }
                        Err(e) => error.set(Some(format!("Download failed: {e}"))),
                    }
                }
                Err(e) => error.set(Some(format!("{e}"))),
            }
        });
    });

    let _paste = use_hook(move || {
        Rc::new(
            PasteSubscription::attach(move |bytes, name| process.call((bytes, name)))
                .map_err(|e| web_sys::console::warn_1(&format!("paste unavailable: {e}").into()))
                .ok(),
        )
    });

    let on_upload = move |args: (Vec<u8>, String)| process.call(args);

    rsx! {
        div { class: "page",
            p { "Drop or paste an image to download a {THUMBNAIL_MAX_SIZE}px thumbnail." }

            FileUpload { on_upload: on_upload }

            if let Some(ref err) = error() {
                p { class: "page-error", "{err}" }
            }

            if !results().is_empty() {
                ul { class: "quick-results",
                    for line in results() {
                        li { "{line}" }
                    }
                }
            }
        }
    }
}
