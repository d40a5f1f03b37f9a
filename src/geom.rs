//! Shared geometry utilities.

use image::{GrayImage, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};

/// Inclusive pixel bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl PixelRect {
    /// A 1×1 box around one pixel.
    pub fn point(x: u32, y: u32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// Grow the box to include pixel (x, y).
    pub fn include(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &PixelRect) -> PixelRect {
        PixelRect {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Euclidean gap between two boxes; 0 when they touch or overlap.
    pub fn gap(&self, other: &PixelRect) -> f64 {
        let dx = axis_gap(self.min_x, self.max_x, other.min_x, other.max_x);
        let dy = axis_gap(self.min_y, self.max_y, other.min_y, other.max_y);
        ((dx * dx + dy * dy) as f64).sqrt()
    }
}

fn axis_gap(a_min: u32, a_max: u32, b_min: u32, b_max: u32) -> u64 {
    if b_min > a_max {
        (b_min - a_max) as u64
    } else if a_min > b_max {
        (a_min - b_max) as u64
    } else {
        0
    }
}

/// One 8-connected set of foreground pixels.
#[derive(Debug, Clone)]
pub struct Blob {
    pub bounds: PixelRect,
    /// Pixel coordinates in raster order.
    pub pixels: Vec<(u32, u32)>,
}

/// Split a binary mask (non-zero = foreground) into 8-connected blobs.
///
/// Blobs come out in raster order of their first pixel.
pub fn blobs(mask: &GrayImage) -> Vec<Blob> {
    let labels = connected_components(mask, Connectivity::Eight, Luma([0u8]));
    let mut out: Vec<Blob> = Vec::new();
    // component label -> index into `out`
    let mut slot: Vec<Option<usize>> = Vec::new();

    for (x, y, px) in labels.enumerate_pixels() {
        let id = px.0[0] as usize;
        if id == 0 {
            continue;
        }
        if slot.len() <= id {
            slot.resize(id + 1, None);
        }
        match slot[id] {
            Some(i) => {
                out[i].bounds.include(x, y);
                out[i].pixels.push((x, y));
            }
            None => {
                slot[id] = Some(out.len());
                out.push(Blob {
                    bounds: PixelRect::point(x, y),
                    pixels: vec![(x, y)],
                });
            }
        }
    }
    out
}
