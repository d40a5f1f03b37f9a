//! Axis line detection.
//!
//! The horizontal axis is the row holding the most axis-coloured pixels,
//! the vertical axis the column holding the most. The two lines need not
//! intersect.

use std::fmt;
use std::ops::RangeInclusive;

use crate::classify::{ClassMap, PixelClass};
use crate::config::ExtractConfig;
use crate::error::ExtractError;

/// Direction of an axis line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The x axis, drawn as a row.
    Horizontal,
    /// The y axis, drawn as a column.
    Vertical,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => write!(f, "horizontal"),
            Self::Vertical => write!(f, "vertical"),
        }
    }
}

/// A detected axis line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisLine {
    pub axis: Axis,
    /// Row (horizontal) or column (vertical) of the line.
    pub index: u32,
    /// First..=last axis pixel along the line.
    pub span: RangeInclusive<u32>,
    /// Number of axis pixels on the line.
    pub support: u32,
}

/// Both axis lines of a chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Axes {
    pub horizontal: AxisLine,
    pub vertical: AxisLine,
}

impl Axes {
    /// Pixel (column, row) where the data origin sits.
    pub fn origin(&self) -> (u32, u32) {
        (self.vertical.index, self.horizontal.index)
    }
}

/// Find the horizontal and vertical axis lines.
pub fn detect_axes(map: &ClassMap, config: &ExtractConfig) -> Result<Axes, ExtractError> {
    let row_counts: Vec<u32> = (0..map.height())
        .map(|y| map.row_count(y, PixelClass::AxisLine))
        .collect();
    let col_counts: Vec<u32> = (0..map.width())
        .map(|x| map.column_count(x, PixelClass::AxisLine))
        .collect();

    let horizontal = best_line(&row_counts, map.width(), config.min_axis_fraction)
        .ok_or(ExtractError::MissingAxis {
            axis: Axis::Horizontal,
        })?;
    let vertical = best_line(&col_counts, map.height(), config.min_axis_fraction)
        .ok_or(ExtractError::MissingAxis {
            axis: Axis::Vertical,
        })?;

    let row_pixels = |x: u32| map.get(x, horizontal) == PixelClass::AxisLine;
    let col_pixels = |y: u32| map.get(vertical, y) == PixelClass::AxisLine;

    Ok(Axes {
        horizontal: AxisLine {
            axis: Axis::Horizontal,
            index: horizontal,
            span: span(map.width(), row_pixels),
            support: row_counts[horizontal as usize],
        },
        vertical: AxisLine {
            axis: Axis::Vertical,
            index: vertical,
            span: span(map.height(), col_pixels),
            support: col_counts[vertical as usize],
        },
    })
}

/// Pick the line with the highest count.
///
/// Adjacent lines sharing the maximum (a thick axis) resolve to the centre
/// of the first such block. Returns `None` below the minimum support.
fn best_line(counts: &[u32], length: u32, min_fraction: f64) -> Option<u32> {
    let max = *counts.iter().max()?;
    let min_support = ((min_fraction * length as f64).ceil() as u32).max(2);
    if max < min_support {
        return None;
    }

    let first = counts.iter().position(|&c| c == max)?;
    let last = counts[first..]
        .iter()
        .take_while(|&&c| c == max)
        .count()
        + first
        - 1;
    Some(((first + last) / 2) as u32)
}

/// First..=last index along a line where `is_axis` holds.
fn span(length: u32, is_axis: impl Fn(u32) -> bool) -> RangeInclusive<u32> {
    let first = (0..length).find(|&i| is_axis(i)).unwrap_or(0);
    let last = (0..length).rev().find(|&i| is_axis(i)).unwrap_or(first);
    first..=last
}
