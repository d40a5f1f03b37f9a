//! Shared helpers for drawing synthetic charts in unit tests.

use image::{Rgb, RgbImage};

use crate::digits::FONT;

pub(crate) const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub(crate) const RED: Rgb<u8> = Rgb([255, 0, 0]);
pub(crate) const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
pub(crate) const GREEN: Rgb<u8> = Rgb([0, 255, 0]);

/// A white canvas.
pub(crate) fn white(w: u32, h: u32) -> RgbImage {
    RgbImage::from_pixel(w, h, Rgb([255, 255, 255]))
}

/// Horizontal segment on row `y` from `x0` to `x1` inclusive.
pub(crate) fn draw_hline(img: &mut RgbImage, y: u32, x0: u32, x1: u32, color: Rgb<u8>) {
    for x in x0..=x1 {
        img.put_pixel(x, y, color);
    }
}

/// Vertical segment on column `x` from `y0` to `y1` inclusive.
pub(crate) fn draw_vline(img: &mut RgbImage, x: u32, y0: u32, y1: u32, color: Rgb<u8>) {
    for y in y0..=y1 {
        img.put_pixel(x, y, color);
    }
}

/// Function-style line: one pixel per column from (x0, y0) to (x1, y1),
/// row rounded from linear interpolation.
pub(crate) fn draw_graph_line(img: &mut RgbImage, (x0, y0): (u32, u32), (x1, y1): (u32, u32), color: Rgb<u8>) {
    for x in x0..=x1 {
        let t = if x1 == x0 { 0.0 } else { (x - x0) as f64 / (x1 - x0) as f64 };
        let y = (y0 as f64 + t * (y1 as f64 - y0 as f64)).round() as u32;
        img.put_pixel(x, y, color);
    }
}

/// Write `value` with the 5×7 font, top-left at (x, y), each font cell
/// `scale` pixels wide. Digits advance by 6 cells.
pub(crate) fn draw_number(img: &mut RgbImage, x: u32, y: u32, value: u64, scale: u32, color: Rgb<u8>) {
    for (i, ch) in value.to_string().bytes().enumerate() {
        let glyph = &FONT[(ch - b'0') as usize];
        let gx = x + i as u32 * 6 * scale;
        for (row, line) in glyph.iter().enumerate() {
            for (col, cell) in line.bytes().enumerate() {
                if cell != b'#' {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        img.put_pixel(gx + col as u32 * scale + dx, y + row as u32 * scale + dy, color);
                    }
                }
            }
        }
    }
}

/// Width in pixels of `value` as drawn by [`draw_number`].
pub(crate) fn number_width(value: u64, scale: u32) -> u32 {
    let digits = value.to_string().len() as u32;
    (digits * 6 - 1) * scale
}

/// Chart geometry used by [`draw_chart`].
pub(crate) struct Chart {
    pub size: (u32, u32),
    /// (column, row) of the origin.
    pub origin: (u32, u32),
    /// (column, label) pairs on the horizontal axis.
    pub x_ticks: Vec<(u32, u64)>,
    /// (row, label) pairs on the vertical axis.
    pub y_ticks: Vec<(u32, u64)>,
    pub font_scale: u32,
    pub tick_color: Rgb<u8>,
}

impl Chart {
    /// 100×100 chart with axes at row 80 / column 10, x ticks at columns
    /// 10 and 50 labelled 0 and 4, y ticks at rows 60 and 20 labelled 2 and 6.
    pub(crate) fn standard() -> Self {
        Self {
            size: (100, 100),
            origin: (10, 80),
            x_ticks: vec![(10, 0), (50, 4)],
            y_ticks: vec![(60, 2), (20, 6)],
            font_scale: 1,
            tick_color: BLUE,
        }
    }
}

/// Draw axes (first quadrant only), tick marks and tick labels. Ticks are
/// 5 px long, crossing their axis; x labels sit below the axis, y labels to
/// the left.
pub(crate) fn draw_chart(chart: &Chart) -> RgbImage {
    let (w, h) = chart.size;
    let (ox, oy) = chart.origin;
    let mut img = white(w, h);
    draw_hline(&mut img, oy, ox, w - 1, BLACK);
    draw_vline(&mut img, ox, 0, oy, BLACK);

    let s = chart.font_scale;
    for &(col, value) in &chart.x_ticks {
        draw_vline(&mut img, col, oy - 2, oy + 2, chart.tick_color);
        let lw = number_width(value, s);
        draw_number(&mut img, col - lw / 2, oy + 5, value, s, chart.tick_color);
    }
    for &(row, value) in &chart.y_ticks {
        draw_hline(&mut img, row, ox - 2, ox + 2, chart.tick_color);
        let lw = number_width(value, s);
        draw_number(&mut img, ox - 5 - lw, row - 7 * s / 2, value, s, chart.tick_color);
    }
    img
}
