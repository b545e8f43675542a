//! This crate extracts timed text lines from a stream of decoded bitmap
//! subtitles (DVD-style subpictures).  Each decoded image is segmented into
//! connected ink regions ("pieces"), the regions are clustered into text
//! lines and ordered for reading, and each region (or merged run of
//! adjacent regions) is resolved to text.  Resolution is automatic when the
//! region's exact shape has been seen before (a persistent dictionary of
//! confirmed glyph shapes), and falls back to a human-in-the-loop
//! confirmation step otherwise.
//!
//! ## Example code
//!
//! ```
//! use subpicture_ocr::{GlyphDict, Session, Step, StyledText, SubPicture,
//!                      SubtitleBuffer};
//!
//! // Decoded subpictures normally come from a VobSub/PGS decoder.
//! let subs: Vec<SubPicture> = vec![];
//! let mut session = Session::new(subs.into_iter(),
//!                                GlyphDict::new(),
//!                                SubtitleBuffer::new());
//! loop {
//!     match session.advance() {
//!         Step::Working => continue,
//!         Step::NeedInput => {
//!             // Render `session.pending()` to the operator, then confirm
//!             // whatever they typed.
//!             session.resolve(StyledText::plain("?")).unwrap();
//!         }
//!         Step::Finished => break,
//!     }
//! }
//! let (dict, subtitles) = session.into_parts();
//! // Persist `dict` with `GlyphDict::save` and hand the recognized
//! // `subtitles` to your subtitle document.
//! # let _ = (dict, subtitles);
//! ```
//!
//! ## Scope
//!
//! The decoder itself is out of scope: anything that can produce
//! [`SubPicture`] records (a grayscale pixel buffer plus 90 kHz show/hide
//! timestamps) can drive a [`Session`].  Likewise the crate does not try to
//! be an OCR engine: there is no font model and no classifier.  It relies
//! entirely on exact shape matches against an operator-curated dictionary,
//! which in practice converges after a few dozen manual confirmations
//! because DVD subtitles reuse one bitmap font throughout a title.
//!
//! ## Debugging
//!
//! Set `SUBPICTURE_OCR_DEBUG_DIR` to a directory and enable `debug`-level
//! logging to get PNG snapshots of the segmentation stages.

#![warn(missing_docs)]

extern crate cast;
extern crate common_failures;
#[cfg(test)]
extern crate env_logger;
#[macro_use]
extern crate failure;
extern crate image;
#[macro_use]
extern crate log;
extern crate palette;
#[cfg(test)]
#[macro_use]
extern crate quickcheck;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;

#[macro_use]
mod debug;
mod dict;
mod document;
mod engine;
mod errors;
mod frame;
mod geom;
mod line;
mod piece;
mod pixmap;
mod segment;
#[cfg(test)]
mod test_util;

pub use common_failures::{Error, Result};

pub use crate::dict::GlyphDict;
pub use crate::document::{format_srt_time, RichText, SubtitleBuffer, SubtitleLine, SubtitleSink};
pub use crate::engine::{EngineState, PendingRun, Session, Step};
pub use crate::errors::OcrError;
pub use crate::frame::{Frame, SubPicture};
pub use crate::geom::{Point, Rect};
pub use crate::line::Line;
pub use crate::piece::{Fingerprint, Piece, Style, StyledText};
