//! kogata-pipeline: Pure image conversion pipeline (sans-IO).
//!
//! Converts raster images into downsized JPEGs through:
//! decode -> optional crop -> optional exact resize -> JPEG encode.
//! Alongside the pipeline it carries the editor's pure logic: the
//! ratio-preserving dimension arithmetic, the display-to-source crop
//! mapping, and the [`EditorState`] controller that derives settings
//! from user input and serializes overlapping conversions.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and returns structured data. All browser/filesystem
//! interaction lives in `kogata-io`.

pub mod convert;
pub mod dimensions;
pub mod editor;
pub mod mapper;
pub mod selection;
pub mod types;

pub use convert::{convert, probe_dimensions};
pub use dimensions::{calculate_thumbnail, resize_dimension, ResizeRequest};
pub use editor::{ConvertJob, EditorState};
pub use mapper::SourceRect;
pub use selection::{CropSelection, MIN_SELECTION_PX};
pub use types::{
    ConvertConfig, ConvertError, ConvertedImage, Dimensions, EditorSettings, JpegQuality, Point,
    ResizeFilter,
};
