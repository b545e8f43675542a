//! Geometry-related types.

use std::cmp::{max, min};
use std::ops::Range;

/// A single pixel position.  Ordering is row-major (top to bottom, then left
/// to right), which is the canonical order for normalized pixel sets.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Point {
    /// Vertical coordinate, growing downwards.
    pub y: usize,
    /// Horizontal coordinate, growing rightwards.
    pub x: usize,
}

impl Point {
    /// Create a point from `x` and `y` coordinates.
    pub fn new(x: usize, y: usize) -> Point {
        Point { x, y }
    }
}

/// A rectangle with `left` and `top` edges inclusive, `right` and `bottom`
/// edges exclusive.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rect {
    left: usize,
    top: usize,
    width: usize,
    height: usize,
}

impl Rect {
    /// Create a rectangle by specifying the left, top, width and height
    /// values.  Panics if the rectangle's right or bottom coordinates are
    /// out-of-bounds.
    pub fn ltwh(l: usize, t: usize, w: usize, h: usize) -> Rect {
        l.checked_add(w).expect("rectangle right is larger than usize");
        t.checked_add(h).expect("rectangle bottom is larger than usize");
        Rect {
            left: l,
            top: t,
            width: w,
            height: h,
        }
    }

    /// Create a rectangle from left and top (inclusive) and right and
    /// bottom (exclusive) coordinates.  Panics if the rectangle has
    /// negative height or width.
    pub fn ltrb(l: usize, t: usize, r: usize, b: usize) -> Rect {
        Rect {
            left: l,
            top: t,
            width: r.checked_sub(l).expect("rectangle has negative width"),
            height: b.checked_sub(t).expect("rectangle has negative height"),
        }
    }

    /// The rectangle covering exactly one pixel.
    pub fn pixel(p: Point) -> Rect {
        Rect::ltwh(p.x, p.y, 1, 1)
    }

    /// The left-most edge of the rectangle (inclusive).
    pub fn left(&self) -> usize {
        self.left
    }

    /// The top-most edge of the rectangle (inclusive).
    pub fn top(&self) -> usize {
        self.top
    }

    /// The right-most edge of the rectangle (exclusive).
    pub fn right(&self) -> usize {
        self.left + self.width
    }

    /// The bottom-most edge of the rectangle (exclusive).
    pub fn bottom(&self) -> usize {
        self.top + self.height
    }

    /// The width of the rectangle.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The height of the rectangle.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Does this rectangle have area zero?
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Is the specified point in this rectangle?
    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.left <= x && x < self.right() && self.top <= y && y < self.bottom()
    }

    /// Return a rectangle including all the area included by this rectangle
    /// and another.  If either rectangle has zero area, it will be excluded.
    pub fn union(&self, other: &Rect) -> Rect {
        if other.is_empty() {
            self.to_owned()
        } else if self.is_empty() {
            other.to_owned()
        } else {
            Rect::ltrb(
                min(self.left, other.left),
                min(self.top, other.top),
                max(self.right(), other.right()),
                max(self.bottom(), other.bottom()),
            )
        }
    }

    /// Get a range from `left..right`.
    pub fn horizontal_range(&self) -> Range<usize> {
        self.left..self.right()
    }

    /// Get a range from `top..bottom`.
    pub fn vertical_range(&self) -> Range<usize> {
        self.top..self.bottom()
    }
}

/// Additional methods for the standard `Range` type.
pub trait RangeExt<Idx> {
    /// Returns a range containing all values that appear in _both_ ranges,
    /// or an empty range if there is no overlap.
    fn intersection(&self, other: &Range<Idx>) -> Range<Idx>;
}

impl RangeExt<usize> for Range<usize> {
    fn intersection(&self, other: &Range<usize>) -> Range<usize> {
        if self.is_empty() {
            self.to_owned()
        } else if other.is_empty() {
            other.to_owned()
        } else {
            let start = max(self.start, other.start);
            let mut end = min(self.end, other.end);
            if end < start {
                end = start
            }
            start..end
        }
    }
}

#[test]
fn range_intersection() {
    assert_eq!((0..1).intersection(&(0..1)), 0..1);
    assert_eq!((0..2).intersection(&(0..1)), 0..1);
    assert_eq!((0..1).intersection(&(0..2)), 0..1);
    assert!((0..1).intersection(&(1..2)).is_empty());
    assert_eq!((0..2).intersection(&(1..2)), 1..2);
    assert_eq!((1..2).intersection(&(0..2)), 1..2);
    assert_eq!((0..1).intersection(&(10..10)), 10..10);
    assert_eq!((0..0).intersection(&(10..11)), 0..0);
}

#[test]
fn point_order_is_row_major() {
    let mut points = vec![Point::new(1, 1), Point::new(0, 2), Point::new(2, 0)];
    points.sort();
    assert_eq!(
        points,
        vec![Point::new(2, 0), Point::new(1, 1), Point::new(0, 2)]
    );
}

#[cfg(test)]
mod test {
    use quickcheck::{Arbitrary, Gen, TestResult};

    use super::*;

    impl Arbitrary for Rect {
        fn arbitrary(g: &mut Gen) -> Self {
            let s = g.size().max(1);
            Rect {
                left: usize::arbitrary(g) % s,
                top: usize::arbitrary(g) % s,
                width: usize::arbitrary(g) % s,
                height: usize::arbitrary(g) % s,
            }
        }

        fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
            let tuple = (self.left, self.top, self.width, self.height);
            Box::new(tuple.shrink().map(|(l, t, w, h)| Rect::ltwh(l, t, w, h)))
        }
    }

    quickcheck! {
        fn rect_width_and_height_are_valid(r: Rect) -> bool {
            r.width() == r.right() - r.left() &&
                r.height() == r.bottom() - r.top()
        }

        fn rect_union_includes_all_points(r1: Rect, r2: Rect) -> bool {
            let u = r1.union(&r2);
            ((r1.is_empty() ||
              u.contains(r1.left, r1.top) &&
              u.contains(r1.right()-1, r1.bottom()-1)) &&
             (r2.is_empty() ||
              u.contains(r2.left, r2.top) &&
              u.contains(r2.right()-1, r2.bottom()-1)))
        }

        fn rect_union_with_zero_size_is_identity(r1: Rect, r2: Rect)
                                                 -> TestResult {
            if r2.is_empty() {
                TestResult::from_bool(r1.union(&r2) == r1)
            } else if r1.is_empty() {
                TestResult::from_bool(r1.union(&r2) == r2)
            } else {
                TestResult::discard()
            }
        }

        fn range_intersection_points_in_both_ranges(r1: Range<usize>,
                                                    r2: Range<usize>)
                                                    -> bool {
            r1.intersection(&r2)
                .all(|i| {
                    r1.start <= i && i < r1.end && r2.start <= i && i < r2.end
                })
        }

        fn range_intersection_does_not_grow(r1: Range<usize>,
                                            r2: Range<usize>)
                                            -> bool {
            let result = r1.intersection(&r2);
            result.len() <= r1.len() && result.len() <= r2.len()
        }
    }
}
