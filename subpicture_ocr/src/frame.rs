//! Decoded subtitle bitmaps and their segmented pieces.

use image::GrayImage;

use crate::line::Line;
use crate::piece::Piece;
use crate::segment::{self, GapStats};
use crate::Result;

/// Presentation timestamps tick at 90 kHz; dividing by this yields
/// milliseconds.
const PTS_PER_MS: u64 = 90;

/// One decoded subpicture, as handed over by the decoder.
///
/// The decoder itself is not our concern: anything that can produce a
/// grayscale pixel buffer with show/hide timestamps can feed a recognition
/// session.
#[derive(Clone, Debug)]
pub struct SubPicture {
    /// Row-major 8-bit grayscale samples, `width * height` bytes.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// 90 kHz presentation timestamp at which the subtitle appears.
    pub start_pts: u64,
    /// 90 kHz presentation timestamp at which the subtitle disappears.
    pub end_pts: u64,
    /// Timestamp of the source packet, as recorded by the demuxer's index.
    /// Only used to cross-check `start_pts`; the bitmap's own timestamp is
    /// authoritative.
    pub packet_pts: u64,
}

/// One subtitle bitmap occurrence: its timing, its source pixels (kept for
/// host-side display), and its segmented pieces in reading order.
///
/// A frame is immutable after segmentation, except that recognition stamps
/// the pieces' `symbol_count` and text as the walk progresses.
pub struct Frame {
    index: usize,
    show_ms: u64,
    hide_ms: u64,
    data: Vec<u8>,
    width: usize,
    height: usize,
    pieces: Vec<Piece>,
    lines: Vec<Line>,
}

impl Frame {
    /// Segment a decoded subpicture into a frame.  Returns `Ok(None)` when
    /// nothing in the bitmap rises above the ink threshold; such images
    /// produce no subtitle line at all.
    pub(crate) fn segment(
        index: usize,
        sub: SubPicture,
        stats: &mut GapStats,
    ) -> Result<Option<Frame>> {
        let mut bitmap = segment::binarize(&sub.data, sub.width, sub.height)?;
        trace_pixmap!(&bitmap, "sub_{:04}_binarized.png", index);
        let segmentation = segment::segment(&mut bitmap, stats);
        debug_pixmap!(&bitmap, "sub_{:04}_segmented.png", index);
        if segmentation.pieces.is_empty() {
            return Ok(None);
        }
        trace!(
            "subtitle {}: {} pieces on {} lines",
            index,
            segmentation.pieces.len(),
            segmentation.lines.len()
        );
        Ok(Some(Frame {
            index,
            show_ms: sub.start_pts / PTS_PER_MS,
            hide_ms: sub.end_pts / PTS_PER_MS,
            data: sub.data,
            width: sub.width,
            height: sub.height,
            pieces: segmentation.pieces,
            lines: segmentation.lines,
        }))
    }

    /// The position of this frame in the stream of frames that produced
    /// pieces, counting from zero.
    pub fn index(&self) -> usize {
        self.index
    }

    /// When the subtitle appears, in milliseconds.
    pub fn show_ms(&self) -> u64 {
        self.show_ms
    }

    /// When the subtitle disappears, in milliseconds.
    pub fn hide_ms(&self) -> u64 {
        self.hide_ms
    }

    /// Width of the source bitmap in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the source bitmap in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The segmented pieces, in reading order.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub(crate) fn pieces_mut(&mut self) -> &mut [Piece] {
        &mut self.pieces
    }

    /// The text-line bands of this frame; pieces refer to entries of this
    /// table by index.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// The source bitmap as a grayscale image, for host-side display.
    pub fn to_image(&self) -> GrayImage {
        let width = cast::u32(self.width).expect("cast failed unexpectedly");
        let height = cast::u32(self.height).expect("cast failed unexpectedly");
        GrayImage::from_raw(width, height, self.data.clone())
            .expect("buffer size was validated during segmentation")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_util::subpicture;

    #[test]
    fn timestamps_convert_to_milliseconds() {
        let mut stats = GapStats::default();
        let sub = subpicture(&["##", "##"], 90_000, 180_000);
        let frame = Frame::segment(0, sub, &mut stats).unwrap().unwrap();
        assert_eq!(frame.show_ms(), 1000);
        assert_eq!(frame.hide_ms(), 2000);
    }

    #[test]
    fn inkless_bitmap_produces_no_frame() {
        let mut stats = GapStats::default();
        let sub = subpicture(&["    ", "    "], 0, 90);
        assert!(Frame::segment(0, sub, &mut stats).unwrap().is_none());
    }

    #[test]
    fn truncated_buffer_is_an_error() {
        let mut stats = GapStats::default();
        let mut sub = subpicture(&["##", "##"], 0, 90);
        sub.data.pop();
        assert!(Frame::segment(0, sub, &mut stats).is_err());
    }

    #[test]
    fn to_image_round_trips_the_source_buffer() {
        let mut stats = GapStats::default();
        let sub = subpicture(&["# ", " #"], 0, 90);
        let data = sub.data.clone();
        let frame = Frame::segment(0, sub, &mut stats).unwrap().unwrap();
        let img = frame.to_image();
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.into_raw(), data);
    }
}
