//! Saving intermediate pixmaps as PNGs for debugging.
//!
//! When the `SUBPICTURE_OCR_DEBUG_DIR` environment variable names a
//! directory, the `debug_pixmap!` and `trace_pixmap!` macros save snapshots
//! of intermediate segmentation state there, gated on the corresponding log
//! level.  Failures to save are logged and otherwise ignored; debugging
//! aids must never break recognition.

use std::env;
use std::path::PathBuf;

use crate::pixmap::{Pixel, Pixmap};

/// The directory that receives debug PNGs, if one is configured.
fn debug_dir() -> Option<PathBuf> {
    env::var_os("SUBPICTURE_OCR_DEBUG_DIR").map(PathBuf::from)
}

/// Save `pixmap` under `name` in the debug directory.
pub(crate) fn dump_pixmap<P: Pixel>(pixmap: &Pixmap<P>, name: &str) {
    let dir = match debug_dir() {
        Some(dir) => dir,
        None => return,
    };
    let path = dir.join(name);
    if let Err(err) = pixmap.to_rgba_image().save(&path) {
        warn!("could not save debug image {}: {}", path.display(), err);
    }
}

/// Save a pixmap snapshot when `debug`-level logging is enabled.
macro_rules! debug_pixmap {
    ($pixmap:expr, $($fmt:tt)+) => {
        if log_enabled!(::log::Level::Debug) {
            $crate::debug::dump_pixmap($pixmap, &format!($($fmt)+));
        }
    };
}

/// Save a pixmap snapshot when `trace`-level logging is enabled.
macro_rules! trace_pixmap {
    ($pixmap:expr, $($fmt:tt)+) => {
        if log_enabled!(::log::Level::Trace) {
            $crate::debug::dump_pixmap($pixmap, &format!($($fmt)+));
        }
    };
}
