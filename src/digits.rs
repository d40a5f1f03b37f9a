//! Tick label reading by template matching.
//!
//! A label is split into 8-connected glyphs, read left to right. Each glyph
//! is sampled onto a 5×7 grid and compared cell by cell with a built-in
//! digit font that has been normalised the same way. Only the digits 0-9
//! are recognised, so labels are natural numbers.

use std::sync::OnceLock;

use image::{GrayImage, Luma};

use crate::geom::{blobs, Blob, PixelRect};

/// Template grid width in cells.
const CELLS_X: usize = 5;
/// Template grid height in cells.
const CELLS_Y: usize = 7;

/// 5×7 digit font, `#` = ink.
pub(crate) const FONT: [[&str; CELLS_Y]; 10] = [
    [".###.", "#...#", "#..##", "#.#.#", "##..#", "#...#", ".###."],
    ["..#..", ".##..", "..#..", "..#..", "..#..", "..#..", ".###."],
    [".###.", "#...#", "....#", "...#.", "..#..", ".#...", "#####"],
    ["#####", "...#.", "..#..", "...#.", "....#", "#...#", ".###."],
    ["...#.", "..##.", ".#.#.", "#..#.", "#####", "...#.", "...#."],
    ["#####", "#....", "####.", "....#", "....#", "#...#", ".###."],
    ["..##.", ".#...", "#....", "####.", "#...#", "#...#", ".###."],
    ["#####", "....#", "...#.", "..#..", ".#...", ".#...", ".#..."],
    [".###.", "#...#", "#...#", ".###.", "#...#", "#...#", ".###."],
    [".###.", "#...#", "#...#", ".####", "....#", "...#.", ".##.."],
];

type Cells = [bool; CELLS_X * CELLS_Y];

/// Pixels of one tick label: bounding box plus a mask of that box.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelCluster {
    pub bounds: PixelRect,
    /// `bounds.width() × bounds.height()` mask, non-zero = label pixel.
    pub mask: GrayImage,
}

impl LabelCluster {
    /// Build a cluster from absolute pixel coordinates.
    pub fn from_pixels(pixels: &[(u32, u32)]) -> Option<Self> {
        let (&(x0, y0), rest) = pixels.split_first()?;
        let mut bounds = PixelRect::point(x0, y0);
        for &(x, y) in rest {
            bounds.include(x, y);
        }
        let mut mask = GrayImage::new(bounds.width(), bounds.height());
        for &(x, y) in pixels {
            mask.put_pixel(x - bounds.min_x, y - bounds.min_y, Luma([255]));
        }
        Some(Self { bounds, mask })
    }
}

/// Why a label could not be read.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelError {
    Empty,
    /// A glyph much smaller than the digits around it (sign, decimal point).
    NotADigit { glyph: usize },
    /// No template matched well enough, or two matched equally well.
    NoMatch { glyph: usize, best_score: f64 },
    Overflow,
}

impl std::fmt::Display for LabelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "label has no pixels"),
            Self::NotADigit { glyph } => {
                write!(f, "glyph {glyph} is too small to be a digit (sign or decimal point?)")
            }
            Self::NoMatch { glyph, best_score } => {
                write!(f, "glyph {glyph} matches no digit (best score {best_score:.2})")
            }
            Self::Overflow => write!(f, "value does not fit in 64 bits"),
        }
    }
}

/// Decode the natural number written in `label`.
pub fn read_label(label: &LabelCluster, min_score: f64) -> Result<u64, LabelError> {
    let mut glyphs = blobs(&label.mask);
    glyphs.sort_by_key(|g| (g.bounds.min_x, g.bounds.min_y));
    if glyphs.is_empty() {
        return Err(LabelError::Empty);
    }

    let tallest = glyphs.iter().map(|g| g.bounds.height()).max().unwrap_or(0);
    let mut value: u64 = 0;
    for (i, glyph) in glyphs.iter().enumerate() {
        if glyph.bounds.height() * 2 < tallest {
            return Err(LabelError::NotADigit { glyph: i });
        }
        let digit = match_digit(&glyph_cells(glyph), min_score)
            .map_err(|best_score| LabelError::NoMatch { glyph: i, best_score })?;
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(digit as u64))
            .ok_or(LabelError::Overflow)?;
    }
    Ok(value)
}

/// Sample a glyph onto the template grid (cell centres, nearest pixel).
fn glyph_cells(glyph: &Blob) -> Cells {
    let w = glyph.bounds.width() as usize;
    let h = glyph.bounds.height() as usize;
    let mut ink = vec![false; w * h];
    for &(x, y) in &glyph.pixels {
        let lx = (x - glyph.bounds.min_x) as usize;
        let ly = (y - glyph.bounds.min_y) as usize;
        ink[ly * w + lx] = true;
    }
    sample_cells(&ink, w, h)
}

/// Nearest-neighbour sample of a `w × h` ink grid onto the template grid.
fn sample_cells(ink: &[bool], w: usize, h: usize) -> Cells {
    let mut cells = [false; CELLS_X * CELLS_Y];
    for cy in 0..CELLS_Y {
        // floor((c + 0.5) * len / cells) in integer arithmetic
        let sy = ((2 * cy + 1) * h) / (2 * CELLS_Y);
        for cx in 0..CELLS_X {
            let sx = ((2 * cx + 1) * w) / (2 * CELLS_X);
            cells[cy * CELLS_X + cx] = ink[sy * w + sx];
        }
    }
    cells
}

/// Font digits cropped to their own ink and normalised like a glyph.
fn templates() -> &'static [Cells; 10] {
    static TEMPLATES: OnceLock<[Cells; 10]> = OnceLock::new();
    TEMPLATES.get_or_init(|| {
        let mut out = [[false; CELLS_X * CELLS_Y]; 10];
        for (digit, rows) in FONT.iter().enumerate() {
            let ink: Vec<(usize, usize)> = rows
                .iter()
                .enumerate()
                .flat_map(|(y, row)| {
                    row.bytes()
                        .enumerate()
                        .filter(|&(_, b)| b == b'#')
                        .map(move |(x, _)| (x, y))
                })
                .collect();
            let min_x = ink.iter().map(|p| p.0).min().unwrap_or(0);
            let max_x = ink.iter().map(|p| p.0).max().unwrap_or(0);
            let min_y = ink.iter().map(|p| p.1).min().unwrap_or(0);
            let max_y = ink.iter().map(|p| p.1).max().unwrap_or(0);
            let w = max_x - min_x + 1;
            let h = max_y - min_y + 1;
            let mut grid = vec![false; w * h];
            for &(x, y) in &ink {
                grid[(y - min_y) * w + (x - min_x)] = true;
            }
            out[digit] = sample_cells(&grid, w, h);
        }
        out
    })
}

/// Best-matching digit, or the best score when nothing is convincing.
fn match_digit(cells: &Cells, min_score: f64) -> Result<u8, f64> {
    let total = cells.len() as f64;
    let mut scores: Vec<(u8, f64)> = templates()
        .iter()
        .enumerate()
        .map(|(digit, template)| {
            let same = template.iter().zip(cells).filter(|(a, b)| a == b).count();
            (digit as u8, same as f64 / total)
        })
        .collect();
    scores.sort_by(|a, b| b.1.total_cmp(&a.1));

    let (digit, best) = scores[0];
    let runner_up = scores[1].1;
    if best >= min_score && best > runner_up {
        Ok(digit)
    } else {
        Err(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{draw_number, white, BLUE};
    use image::Rgb;

    /// Render `value` with the font and wrap the blue pixels as a label.
    fn label_for(value: u64, scale: u32) -> LabelCluster {
        let mut img = white(80, 40);
        draw_number(&mut img, 2, 2, value, scale, BLUE);
        label_from_image(&img)
    }

    fn label_from_image(img: &image::RgbImage) -> LabelCluster {
        let pixels: Vec<(u32, u32)> = img
            .enumerate_pixels()
            .filter(|(_, _, p)| **p == BLUE)
            .map(|(x, y, _)| (x, y))
            .collect();
        LabelCluster::from_pixels(&pixels).expect("label pixels")
    }

    #[test]
    fn every_digit_reads_back_at_several_scales() {
        for scale in 1..=3 {
            for digit in 0..10u64 {
                let label = label_for(digit, scale);
                assert_eq!(read_label(&label, 0.8), Ok(digit), "digit {digit} at scale {scale}");
            }
        }
    }

    #[test]
    fn multi_digit_labels_read_left_to_right() {
        assert_eq!(read_label(&label_for(12, 2), 0.8), Ok(12));
        assert_eq!(read_label(&label_for(470, 1), 0.8), Ok(470));
    }

    #[test]
    fn templates_are_distinct() {
        let t = templates();
        for a in 0..10 {
            for b in (a + 1)..10 {
                assert_ne!(t[a], t[b], "digits {a} and {b} share a template");
            }
        }
    }

    #[test]
    fn minus_sign_is_rejected() {
        let mut img = white(60, 30);
        // A short dash in front of a "5".
        for x in 2..8 {
            img.put_pixel(x, 9, BLUE);
        }
        draw_number(&mut img, 10, 2, 5, 2, BLUE);
        let label = label_from_image(&img);

        assert_eq!(read_label(&label, 0.8), Err(LabelError::NotADigit { glyph: 0 }));
    }

    #[test]
    fn solid_blob_matches_no_digit() {
        let mut img = white(30, 30);
        for y in 2..16 {
            for x in 2..12 {
                img.put_pixel(x, y, Rgb([0, 0, 255]));
            }
        }
        let label = label_from_image(&img);

        assert!(matches!(read_label(&label, 0.8), Err(LabelError::NoMatch { glyph: 0, .. })));
    }
}
