//! The derived-settings controller.
//!
//! [`EditorState`] owns the current source / settings / selection /
//! display-ratio / output state as an explicit state machine. Input
//! mutations go through the setter operations;
//! [`EditorState::begin_convert`] is the single recompute entry point,
//! and [`EditorState::commit`] applies results under a last-writer-wins
//! rule: every job carries the generation it was started with, and a
//! result whose generation is no longer current is discarded rather
//! than overwriting fresher state.
//!
//! Two derivations are maintained:
//! - metadata: the displayed "original" width/height, which is the
//!   source's native size, overridden by the mapped size of an active
//!   crop selection until the selection is cleared;
//! - output: the encoded image produced by the most recent committed
//!   conversion.

use std::rc::Rc;

use crate::dimensions::{calculate_thumbnail, resize_dimension, ResizeRequest};
use crate::mapper::SourceRect;
use crate::selection::CropSelection;
use crate::types::{
    ConvertConfig, ConvertError, ConvertedImage, Dimensions, EditorSettings, JpegQuality,
};

/// One scheduled conversion: the inputs snapshotted at trigger time.
///
/// The bytes are shared, not copied; a job does not pin a stale copy
/// of the source, and the conversion itself is a pure function of
/// `(bytes, config)`.
#[derive(Debug, Clone)]
pub struct ConvertJob {
    /// Generation this job was started with; passed back to
    /// [`EditorState::commit`].
    pub generation: u64,
    /// The source image bytes.
    pub bytes: Rc<[u8]>,
    /// The merged instruction set for this run.
    pub config: ConvertConfig,
}

/// A loaded source image: bytes plus probed native dimensions.
#[derive(Debug, Clone)]
struct SourceImage {
    bytes: Rc<[u8]>,
    dimensions: Dimensions,
}

/// State machine over the editor's observed inputs and derived outputs.
#[derive(Debug, Default)]
pub struct EditorState {
    source: Option<SourceImage>,
    /// Displayed "original" dimensions: native size, or the mapped
    /// source-space size of the active selection.
    metadata: Option<Dimensions>,
    settings: EditorSettings,
    /// The active, already-normalized crop selection.
    selection: Option<CropSelection>,
    /// Preview scale factor; `0.0` until the preview has loaded.
    display_ratio: f64,
    /// Monotonically increasing recompute counter.
    generation: u64,
    output: Option<Rc<ConvertedImage>>,
    error: Option<ConvertError>,
}

impl EditorState {
    /// Create an empty editor with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a new source image, probing its dimensions.
    ///
    /// Clears any crop selection and the measured display ratio (the
    /// new preview must be re-measured), derives settings and metadata
    /// from the native size, and drops the previous output. The
    /// quality level survives the swap.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Decode`] when the bytes are not a
    /// supported raster image; the previous state is left untouched.
    pub fn load_source(&mut self, bytes: Vec<u8>) -> Result<Dimensions, ConvertError> {
        let dimensions = crate::convert::probe_dimensions(&bytes)?;

        self.source = Some(SourceImage {
            bytes: Rc::from(bytes),
            dimensions,
        });
        self.selection = None;
        self.display_ratio = 0.0;
        self.metadata = Some(dimensions);
        self.settings.width = dimensions.width;
        self.settings.height = dimensions.height;
        self.output = None;
        self.error = None;

        Ok(dimensions)
    }

    /// Record the measured preview scale factor.
    ///
    /// If a selection is already active, its derived size is
    /// recomputed now that the mapping is possible.
    pub fn set_display_ratio(&mut self, ratio: f64) {
        self.display_ratio = ratio;
        self.derive_from_selection();
    }

    /// Apply a raw (possibly inverted, possibly tiny) drag selection.
    ///
    /// Sub-threshold selections clear the crop instead, reverting the
    /// metadata derivation to the native size.
    pub fn apply_selection(&mut self, raw: CropSelection) {
        match raw.normalized() {
            Some(normalized) => {
                self.selection = Some(normalized);
                self.derive_from_selection();
            }
            None => self.clear_selection(),
        }
    }

    /// Drop the crop selection and revert to natural-size derivation.
    pub fn clear_selection(&mut self) {
        self.selection = None;
        if let Some(source) = &self.source {
            self.metadata = Some(source.dimensions);
            self.settings.width = source.dimensions.width;
            self.settings.height = source.dimensions.height;
        }
    }

    /// Set the JPEG quality level.
    pub const fn set_quality(&mut self, quality: JpegQuality) {
        self.settings.quality = quality;
    }

    /// Apply a manual width edit.
    ///
    /// With `keep_ratio`, the height follows proportionally (ceiling
    /// rounding) from the current settings; otherwise only the width
    /// changes. A zero value is ignored, matching the settings panel's
    /// treatment of cleared/unparseable input.
    pub fn request_width(&mut self, width: u32, keep_ratio: bool) {
        if width == 0 {
            return;
        }
        if keep_ratio {
            if let Ok(next) = resize_dimension(self.dimensions(), ResizeRequest::width(width)) {
                self.settings.width = next.width;
                self.settings.height = next.height;
            }
        } else {
            self.settings.width = width;
        }
    }

    /// Apply a manual height edit; see [`request_width`](Self::request_width).
    pub fn request_height(&mut self, height: u32, keep_ratio: bool) {
        if height == 0 {
            return;
        }
        if keep_ratio {
            if let Ok(next) = resize_dimension(self.dimensions(), ResizeRequest::height(height)) {
                self.settings.width = next.width;
                self.settings.height = next.height;
            }
        } else {
            self.settings.height = height;
        }
    }

    /// Set the target to the two-step thumbnail of the current
    /// metadata dimensions.
    pub fn apply_thumbnail(&mut self, max_size: u32) {
        if let Some(metadata) = self.metadata {
            let target = calculate_thumbnail(metadata, max_size);
            self.settings.width = target.width;
            self.settings.height = target.height;
        }
    }

    /// Reset the target to the current metadata dimensions.
    pub const fn reset_dimensions(&mut self) {
        if let Some(metadata) = self.metadata {
            self.settings.width = metadata.width;
            self.settings.height = metadata.height;
        }
    }

    /// Whether the current target matches the thumbnail shortcut.
    #[must_use]
    pub fn thumbnail_active(&self, max_size: u32) -> bool {
        self.settings.width.max(self.settings.height) == max_size
    }

    /// The single recompute entry point.
    ///
    /// Bumps the generation (marking any in-flight job stale) and
    /// snapshots the current inputs into a [`ConvertJob`]. The crop and
    /// display ratio are included only when a selection is active *and*
    /// the ratio has been measured; an unmeasured preview must not
    /// reach the coordinate mapper.
    ///
    /// Returns `None` when no source image is loaded.
    pub fn begin_convert(&mut self) -> Option<ConvertJob> {
        let bytes = Rc::clone(&self.source.as_ref()?.bytes);

        self.generation += 1;

        let crop_active = self.selection.is_some() && self.display_ratio > 0.0;
        let config = ConvertConfig {
            quality: self.settings.quality,
            width: self.settings.width,
            height: self.settings.height,
            crop: if crop_active { self.selection } else { None },
            display_ratio: crop_active.then_some(self.display_ratio),
            ..ConvertConfig::default()
        };

        Some(ConvertJob {
            generation: self.generation,
            bytes,
            config,
        })
    }

    /// Commit a settled conversion under last-writer-wins.
    ///
    /// Returns `false` (and changes nothing) when `generation` is no
    /// longer current: a newer job has been started since this one.
    /// An `Ok` result fully replaces the output; an `Err` records the
    /// failure and leaves the previous output visible. A partial
    /// update never occurs.
    pub fn commit(
        &mut self,
        generation: u64,
        result: Result<ConvertedImage, ConvertError>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }

        match result {
            Ok(image) => {
                self.output = Some(Rc::new(image));
                self.error = None;
            }
            Err(e) => {
                self.error = Some(e);
            }
        }

        true
    }

    /// Whether a source image is loaded.
    #[must_use]
    pub const fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Byte length of the loaded source, for the file-size display.
    #[must_use]
    pub fn source_len(&self) -> Option<usize> {
        self.source.as_ref().map(|s| s.bytes.len())
    }

    /// The loaded source bytes.
    #[must_use]
    pub fn source_bytes(&self) -> Option<Rc<[u8]>> {
        self.source.as_ref().map(|s| Rc::clone(&s.bytes))
    }

    /// Displayed "original" dimensions (native or crop-derived).
    #[must_use]
    pub const fn metadata(&self) -> Option<Dimensions> {
        self.metadata
    }

    /// The current editor settings.
    #[must_use]
    pub const fn settings(&self) -> EditorSettings {
        self.settings
    }

    /// The active normalized selection, if any.
    #[must_use]
    pub const fn selection(&self) -> Option<CropSelection> {
        self.selection
    }

    /// The measured display ratio (`0.0` when unmeasured).
    #[must_use]
    pub const fn display_ratio(&self) -> f64 {
        self.display_ratio
    }

    /// The most recent committed output, if any.
    #[must_use]
    pub fn output(&self) -> Option<Rc<ConvertedImage>> {
        self.output.clone()
    }

    /// The most recent committed failure, if the newest run failed.
    #[must_use]
    pub const fn error(&self) -> Option<&ConvertError> {
        self.error.as_ref()
    }

    /// Derive settings and metadata from the active selection.
    ///
    /// Runs only once both a selection and a measured ratio exist; the
    /// mapped source-space size overrides the natural-size derivation.
    fn derive_from_selection(&mut self) {
        let Some(selection) = &self.selection else {
            return;
        };
        if self.display_ratio <= 0.0 {
            return;
        }

        if let Ok(rect) = SourceRect::from_selection(selection, self.display_ratio) {
            self.settings.width = rect.width;
            self.settings.height = rect.height;
            self.metadata = Some(Dimensions {
                width: rect.width,
                height: rect.height,
            });
        }
    }

    /// Current settings dimensions as a pair, for ratio arithmetic.
    const fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.settings.width,
            height: self.settings.height,
        }
    }
}
