//! Human-readable byte-size formatting for the output panel.

/// Format a byte count as `B`, `KB`, or `MB` (base 1024).
///
/// Sizes below a kilobyte are shown exactly; larger sizes get one
/// decimal place, which is plenty for a "roughly how big is this JPEG"
/// display.
#[must_use]
pub fn format_bytes(len: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    #[allow(clippy::cast_precision_loss)]
    let len_f = len as f64;

    if len_f >= MB {
        format!("{:.1} MB", len_f / MB)
    } else if len_f >= KB {
        format!("{:.1} KB", len_f / KB)
    } else {
        format!("{len} B")
    }
}
