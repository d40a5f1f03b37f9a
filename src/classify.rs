//! Per-pixel colour classification.
//!
//! The drawing convention is fixed: axes are black, the curve is pure red
//! and tick marks with their labels are pure blue (pure green is accepted
//! as well). Everything else is background. Classification looks at one
//! pixel at a time, never at its neighbourhood.

use image::{GrayImage, Luma, Rgb, RgbImage};
use rayon::prelude::*;

/// What a single pixel depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelClass {
    Background,
    AxisLine,
    Curve,
    TickMarker,
}

/// Classify one RGB pixel against the reference colours.
pub fn classify_pixel(pixel: Rgb<u8>, tolerance: u8) -> PixelClass {
    let [r, g, b] = pixel.0;
    let low = |c: u8| c <= tolerance;
    let high = |c: u8| c >= 255 - tolerance;

    if low(r) && low(g) && low(b) {
        PixelClass::AxisLine
    } else if high(r) && low(g) && low(b) {
        PixelClass::Curve
    } else if low(r) && ((low(g) && high(b)) || (high(g) && low(b))) {
        PixelClass::TickMarker
    } else {
        PixelClass::Background
    }
}

/// A classified image: one `PixelClass` per pixel, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMap {
    width: u32,
    height: u32,
    classes: Vec<PixelClass>,
}

impl ClassMap {
    /// Classify every pixel of `img`. Rows are processed in parallel.
    pub fn from_image(img: &RgbImage, tolerance: u8) -> Self {
        let (width, height) = img.dimensions();
        let classes: Vec<PixelClass> = (0..height)
            .into_par_iter()
            .flat_map_iter(|y| (0..width).map(move |x| classify_pixel(*img.get_pixel(x, y), tolerance)))
            .collect();

        Self {
            width,
            height,
            classes,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Class at (x, y). Panics when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> PixelClass {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.classes[(y * self.width + x) as usize]
    }

    /// Binary mask of one class: 255 where the pixel has `class`, 0 elsewhere.
    pub fn mask(&self, class: PixelClass) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            if self.get(x, y) == class {
                Luma([255])
            } else {
                Luma([0])
            }
        })
    }

    /// Number of pixels of `class` in row `y`.
    pub fn row_count(&self, y: u32, class: PixelClass) -> u32 {
        let start = (y * self.width) as usize;
        self.classes[start..start + self.width as usize]
            .iter()
            .filter(|&&c| c == class)
            .count() as u32
    }

    /// Number of pixels of `class` in column `x`.
    pub fn column_count(&self, x: u32, class: PixelClass) -> u32 {
        (0..self.height).filter(|&y| self.get(x, y) == class).count() as u32
    }
}
