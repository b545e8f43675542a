//! Custom pixmaps which can hold kinds of data that the `image` library
//! doesn't support, such as the per-pixel segmentation state.

use image::{Rgba, RgbaImage};

/// A fully generic image type, which can hold non-graphical data.
pub(crate) struct Pixmap<P: Pixel> {
    data: Vec<P>,
    width: usize,
    height: usize,
}

impl<P: Pixel> Pixmap<P> {
    /// Create a new `Pixmap` filled with `P::default()`.
    pub fn blank(width: usize, height: usize) -> Pixmap<P> {
        Pixmap {
            data: vec![P::default(); width * height],
            width,
            height,
        }
    }

    /// If `x` and `y` do not fit within the pixmap, panic.
    fn bounds_check(&self, x: usize, y: usize) {
        if x >= self.width {
            panic!("out of bounds x: {} width: {}", x, self.width);
        }
        if y >= self.height {
            panic!("out of bounds y: {} height: {}", y, self.height);
        }
    }

    /// The width of the `Pixmap`.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The height of the `Pixmap`.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the pixel at `x` and `y`, or panic if out of bounds.
    pub fn get(&self, x: usize, y: usize) -> P {
        self.bounds_check(x, y);
        self.data[y * self.width + x]
    }

    /// Get a mutable reference to the pixel at `x` and `y`, or panic if out
    /// of bounds.
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut P {
        self.bounds_check(x, y);
        &mut self.data[y * self.width + x]
    }

    /// Render the pixmap as an ordinary RGBA image, for visualizing pixel
    /// types that aren't colors.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let width = cast::u32(self.width).expect("cast failed unexpectedly");
        let height = cast::u32(self.height).expect("cast failed unexpectedly");
        RgbaImage::from_fn(width, height, |x, y| {
            self.get(cast::usize(x), cast::usize(y)).to_rgba()
        })
    }
}

/// A type which can be used as a pixel in a `Pixmap`.
pub(crate) trait Pixel: Clone + Copy + std::fmt::Debug + Default + 'static {
    /// Return an RGBA color for this pixel.  Used for visualizing images
    /// with pixel types that aren't ordinary colors.
    fn to_rgba(self) -> Rgba<u8>;
}

impl Pixel for bool {
    fn to_rgba(self) -> Rgba<u8> {
        match self {
            false => Rgba([0, 0, 0, 0]),
            true => Rgba([0, 0, 0, 0xff]),
        }
    }
}
