//! Segmentation of subtitle bitmaps into ordered glyph pieces.

use image::Rgba;
use palette::{FromColor, Hsv, Srgb};

use crate::errors::OcrError;
use crate::geom::Point;
use crate::line::Line;
use crate::piece::Piece;
use crate::pixmap::{Pixel, Pixmap};
use crate::Result;

/// A grayscale sample with luminance above this value is ink, everything
/// else is background.
const INK_THRESHOLD: u8 = 127;

/// A virtual `Pixel` type which is used to help us extract contiguous
/// pieces from an image.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SegmentInfo {
    /// This pixel is background.
    Background,
    /// This pixel is ink, but it has not yet been assigned to a piece.
    Unassigned,
    /// This pixel belongs to the piece with the specified ID.
    Id(u16),
}

impl Default for SegmentInfo {
    fn default() -> SegmentInfo {
        SegmentInfo::Background
    }
}

impl Pixel for SegmentInfo {
    fn to_rgba(self) -> Rgba<u8> {
        // Try to pick nice, reasonably distinct colors for the `id`
        // values.  Based on
        // http://martin.ankerl.com/2009/12/09/how-to-create-random-colors-programmatically/
        match self {
            SegmentInfo::Background => Rgba([0, 0, 0, 0]),
            SegmentInfo::Unassigned => Rgba([0, 0, 0, 0xff]),
            SegmentInfo::Id(id) => {
                const GOLDEN_RATIO: f32 = 0.618033988749895;
                let hue = ((0.94 + GOLDEN_RATIO * f32::from(id)) % 1.0) * 360.0;
                let rgb = Srgb::from_color(Hsv::new(hue, 0.5, 0.95)).into_format::<u8>();
                Rgba([rgb.red, rgb.green, rgb.blue, 0xff])
            }
        }
    }
}

/// Build the segmentation scan buffer from a row-major 8-bit grayscale
/// buffer.  The background color is sampled from pixel (0, 0); a sample
/// counts as ink when its luminance exceeds the threshold and it differs
/// from the background sample, which keeps bright anti-alias halos on a
/// bright background out of the glyph shapes.
pub(crate) fn binarize(data: &[u8], width: usize, height: usize) -> Result<Pixmap<SegmentInfo>> {
    let expected = width * height;
    if data.len() != expected {
        return Err(OcrError::PixelBufferSizeMismatch {
            width,
            height,
            expected,
            actual: data.len(),
        }
        .into());
    }
    let mut bitmap = Pixmap::blank(width, height);
    if expected == 0 {
        return Ok(bitmap);
    }
    let background = data[0];
    for y in 0..height {
        for x in 0..width {
            let sample = data[y * width + x];
            if sample > INK_THRESHOLD && sample != background {
                *bitmap.get_mut(x, y) = SegmentInfo::Unassigned;
            }
        }
    }
    Ok(bitmap)
}

/// The result of segmenting one bitmap: the pieces in reading order, and
/// the text-line bands they attach to (pieces store indices into `lines`).
pub(crate) struct Segmentation {
    pub pieces: Vec<Piece>,
    pub lines: Vec<Line>,
}

/// Running inter-glyph statistic: half the average piece width, used as the
/// threshold above which a horizontal gap between two runs is a space.
/// Accumulated across every frame of a session so early frames with few
/// glyphs don't skew it.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct GapStats {
    width_sum: usize,
    piece_count: usize,
}

impl GapStats {
    /// Fold one piece's width into the statistic.
    fn record(&mut self, piece_width: usize) {
        self.width_sum += piece_width;
        self.piece_count += 1;
    }

    /// The current space-detection threshold, in pixels.
    pub fn space_threshold(&self) -> usize {
        if self.piece_count == 0 {
            0
        } else {
            self.width_sum / (2 * self.piece_count)
        }
    }
}

/// Extract every 4-connected ink region from `bitmap`, cluster the regions
/// into text-line bands, and return them in reading order: top line first,
/// and left-to-right within lines that share rows.  Returns no pieces when
/// the bitmap has no ink.
///
/// The scan claims each pixel for exactly one piece by relabeling it in
/// `bitmap`, so the buffer doubles as a colored piece map for debugging
/// afterwards.
pub(crate) fn segment(bitmap: &mut Pixmap<SegmentInfo>, stats: &mut GapStats) -> Segmentation {
    // Discover pieces in row-major scan order.
    let mut discovered: Vec<Piece> = vec![];
    for y in 0..bitmap.height() {
        for x in 0..bitmap.width() {
            if bitmap.get(x, y) == SegmentInfo::Unassigned {
                // 'as' is safe here: the id is only a debug color index.
                let id = (discovered.len() % usize::from(u16::MAX)) as u16;
                let piece = flood_fill(bitmap, Point::new(x, y), id);
                stats.record(piece.rect().width());
                discovered.push(piece);
            }
        }
    }

    // Attach each piece to the first band (in creation order) that overlaps
    // its vertical extent, extending the band, or open a new band.  This is
    // a single greedy pass: a piece discovered before its base glyph (a
    // diacritic, say) can open a band of its own that the base never joins.
    let mut lines: Vec<Line> = vec![];
    for piece in &mut discovered {
        match lines.iter().position(|line| line.overlaps(piece.rect())) {
            Some(index) => {
                lines[index].extend(piece.rect());
                piece.set_line(index);
            }
            None => {
                lines.push(Line::new(piece.rect()));
                piece.set_line(lines.len() - 1);
            }
        }
    }

    // Reading order.  The relation is intentionally partial: pieces on
    // bands that don't share rows compare only by band top, so we place
    // each piece by stable insertion instead of trusting a total-order
    // sort.
    let mut pieces: Vec<Piece> = Vec::with_capacity(discovered.len());
    for piece in discovered {
        let position = pieces
            .iter()
            .position(|other| comes_before(&piece, other, &lines))
            .unwrap_or(pieces.len());
        pieces.insert(position, piece);
    }

    Segmentation { pieces, lines }
}

/// Reading order between two pieces: left-to-right when their bands share
/// rows, top band first otherwise.
fn comes_before(a: &Piece, b: &Piece, lines: &[Line]) -> bool {
    let (la, lb) = (lines[a.line()], lines[b.line()]);
    if la.intersects(&lb) {
        a.rect().left() < b.rect().left()
    } else {
        la.top() < lb.top()
    }
}

/// Claim every ink pixel 4-connected to `seed` for a new piece, relabeling
/// each claimed pixel in `bitmap`.  Iterative with an explicit stack: large
/// ink regions would overflow the call stack otherwise.
fn flood_fill(bitmap: &mut Pixmap<SegmentInfo>, seed: Point, id: u16) -> Piece {
    /// Claim one neighbor if it is unassigned ink.
    fn visit(
        bitmap: &mut Pixmap<SegmentInfo>,
        piece: &mut Piece,
        stack: &mut Vec<Point>,
        id: u16,
        x: usize,
        y: usize,
    ) {
        if bitmap.get(x, y) == SegmentInfo::Unassigned {
            *bitmap.get_mut(x, y) = SegmentInfo::Id(id);
            let neighbor = Point::new(x, y);
            piece.push(neighbor);
            stack.push(neighbor);
        }
    }

    let mut piece = Piece::new(seed);
    *bitmap.get_mut(seed.x, seed.y) = SegmentInfo::Id(id);
    let mut stack = vec![seed];
    while let Some(p) = stack.pop() {
        if p.x > 0 {
            visit(bitmap, &mut piece, &mut stack, id, p.x - 1, p.y);
        }
        if p.x + 1 < bitmap.width() {
            visit(bitmap, &mut piece, &mut stack, id, p.x + 1, p.y);
        }
        if p.y > 0 {
            visit(bitmap, &mut piece, &mut stack, id, p.x, p.y - 1);
        }
        if p.y + 1 < bitmap.height() {
            visit(bitmap, &mut piece, &mut stack, id, p.x, p.y + 1);
        }
    }
    piece
}
