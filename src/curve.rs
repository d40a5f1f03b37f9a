//! Curve pixel extraction.
//!
//! The curve is read column by column. A column holding several curve
//! pixels (line thickness, a steep stroke) contributes the arithmetic mean
//! of their rows, so every column yields at most one point.

use rayon::prelude::*;

use crate::classify::{ClassMap, PixelClass};
use crate::error::ExtractError;

/// One point of the curve in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    /// Column.
    pub x: u32,
    /// Mean row of the curve pixels in the column (y=0 is the top).
    pub y: f64,
}

/// Extract the curve as one point per column, ordered by column.
///
/// Columns without curve pixels are skipped, not interpolated.
pub fn extract_curve(map: &ClassMap) -> Result<Vec<CurvePoint>, ExtractError> {
    let points: Vec<CurvePoint> = (0..map.width())
        .into_par_iter()
        .filter_map(|x| column_point(map, x))
        .collect();

    if points.is_empty() {
        return Err(ExtractError::EmptyCurve);
    }
    Ok(points)
}

fn column_point(map: &ClassMap, x: u32) -> Option<CurvePoint> {
    let (count, sum) = (0..map.height())
        .filter(|&y| map.get(x, y) == PixelClass::Curve)
        .fold((0u64, 0u64), |(n, s), y| (n + 1, s + y as u64));
    (count > 0).then(|| CurvePoint {
        x,
        y: sum as f64 / count as f64,
    })
}
