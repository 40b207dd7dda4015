//! Dioxus UI components for kogata.
//!
//! Provides the file upload zone, source preview with crop overlay,
//! conversion settings panel, and output panel.

mod crop_overlay;
mod output;
mod preview;
mod settings;
mod upload;

pub use crop_overlay::CropOverlay;
pub use output::OutputPanel;
pub use preview::SourcePreview;
pub use settings::{SettingsEvent, SettingsPanel, THUMBNAIL_MAX_SIZE};
pub use upload::FileUpload;
