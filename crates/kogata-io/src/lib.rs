//! kogata-io: Browser I/O and Dioxus component library.
//!
//! Handles file uploads, clipboard paste, Blob URL management, file
//! downloads, and provides the reusable UI components for the kogata
//! web application.

pub mod blob;
pub mod components;
pub mod download;
pub mod format;
pub mod paste;

pub use components::{
    FileUpload, OutputPanel, SettingsEvent, SettingsPanel, SourcePreview, THUMBNAIL_MAX_SIZE,
};
pub use paste::PasteSubscription;
