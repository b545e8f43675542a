//! Connected glyph regions and their dictionary identity.

use crate::geom::{Point, Rect};

/// Style flags carried by a piece of recognized text.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Style {
    /// Render bold.
    pub bold: bool,
    /// Render italic.
    pub italic: bool,
    /// Render underlined.
    pub underline: bool,
}

/// A piece of recognized text together with its display style.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct StyledText {
    /// The text itself.
    pub text: String,
    /// How to render it.
    pub style: Style,
}

impl StyledText {
    /// Text with style flags attached.
    pub fn new<S: Into<String>>(text: S, style: Style) -> StyledText {
        StyledText {
            text: text.into(),
            style,
        }
    }

    /// Plain, unstyled text.
    pub fn plain<S: Into<String>>(text: S) -> StyledText {
        StyledText::new(text, Style::default())
    }
}

/// One 4-connected ink region of a segmented subtitle bitmap, or several
/// adjacent regions merged into one logical symbol.
///
/// `symbol_count` encodes merging as a run-length over the frame's ordered
/// piece sequence: a piece with `symbol_count >= 1` heads a run of that many
/// pieces, and the following `symbol_count - 1` pieces (stamped with 0) are
/// absorbed into it.  Freshly segmented pieces start as standalone heads.
#[derive(Clone, Debug)]
pub struct Piece {
    rect: Rect,
    pixels: Vec<Point>,
    symbol_count: usize,
    line: usize,
    text: Option<StyledText>,
}

impl Piece {
    /// Start a new piece from its first discovered pixel.
    pub(crate) fn new(p: Point) -> Piece {
        Piece {
            rect: Rect::pixel(p),
            pixels: vec![p],
            symbol_count: 1,
            line: 0,
            text: None,
        }
    }

    /// Record another pixel as belonging to this piece.
    pub(crate) fn push(&mut self, p: Point) {
        self.rect = self.rect.union(&Rect::pixel(p));
        self.pixels.push(p);
    }

    /// Merge another piece into this one: the bounding boxes are united and
    /// the pixel sets appended.
    pub(crate) fn merge(&mut self, other: &Piece) {
        self.rect = self.rect.union(other.rect());
        self.pixels.extend_from_slice(other.pixels());
    }

    /// The bounding box of the piece.
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    /// The absolute pixel positions belonging to the piece, in discovery
    /// order.
    pub fn pixels(&self) -> &[Point] {
        &self.pixels
    }

    /// How many pieces of the frame's ordered sequence this piece stands
    /// for.  Zero means the piece has been absorbed into a predecessor.
    pub fn symbol_count(&self) -> usize {
        self.symbol_count
    }

    pub(crate) fn set_symbol_count(&mut self, symbol_count: usize) {
        self.symbol_count = symbol_count;
    }

    /// The index of the text line this piece belongs to, in the owning
    /// frame's line table.
    pub fn line(&self) -> usize {
        self.line
    }

    pub(crate) fn set_line(&mut self, line: usize) {
        self.line = line;
    }

    /// The text this piece has been resolved to, if any.
    pub fn text(&self) -> Option<&StyledText> {
        self.text.as_ref()
    }

    pub(crate) fn set_text(&mut self, text: StyledText) {
        self.text = Some(text);
    }

    /// The normalized dictionary key for this piece.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::new(&self.rect, &self.pixels, self.symbol_count)
    }
}

/// The normalized dictionary key for a run of consecutive pieces treated as
/// one logical symbol.
pub(crate) fn run_fingerprint(pieces: &[Piece]) -> Fingerprint {
    debug_assert!(!pieces.is_empty());
    let mut merged = pieces[0].clone();
    for piece in &pieces[1..] {
        merged.merge(piece);
    }
    merged.set_symbol_count(pieces.len());
    merged.fingerprint()
}

/// The exact-shape identity of a (possibly merged) piece: its dimensions,
/// how many pieces were merged into it, and its pixel set normalized so the
/// region's top-left corner is at (0, 0) and the pixels are in row-major
/// order.  Two pieces compare equal exactly when they have identical shape,
/// independent of where on screen they appeared; perceptual similarity
/// plays no part.
///
/// The derived `Hash` makes this usable as an average-O(1) map key; the
/// derived `Eq` re-checks the full pixel set after any hash match.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Fingerprint {
    width: usize,
    height: usize,
    symbol_count: usize,
    pixels: Vec<Point>,
}

impl Fingerprint {
    /// Normalize an absolute pixel set into a fingerprint.
    pub(crate) fn new(rect: &Rect, pixels: &[Point], symbol_count: usize) -> Fingerprint {
        let mut normalized: Vec<Point> = pixels
            .iter()
            .map(|p| Point::new(p.x - rect.left(), p.y - rect.top()))
            .collect();
        normalized.sort();
        Fingerprint {
            width: rect.width(),
            height: rect.height(),
            symbol_count,
            pixels: normalized,
        }
    }

    /// Rebuild a fingerprint from its stored fields (a dictionary snapshot
    /// row).  The pixel set is re-sorted so that snapshots produced by other
    /// tools still compare correctly.
    pub(crate) fn from_parts(
        width: usize,
        height: usize,
        symbol_count: usize,
        mut pixels: Vec<Point>,
    ) -> Fingerprint {
        pixels.sort();
        Fingerprint {
            width,
            height,
            symbol_count,
            pixels,
        }
    }

    /// Width of the normalized region.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the normalized region.
    pub fn height(&self) -> usize {
        self.height
    }

    /// How many pieces were merged into the region.
    pub fn symbol_count(&self) -> usize {
        self.symbol_count
    }

    /// The normalized pixel set, in row-major order.
    pub fn pixels(&self) -> &[Point] {
        &self.pixels
    }
}
