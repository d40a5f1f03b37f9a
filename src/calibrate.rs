//! Pixel-to-data calibration of one axis.
//!
//! Tick positions are measured from the axis origin (columns to the right
//! of the vertical axis, rows above the horizontal axis) and mapped to data
//! values by `value = scale * position + offset`.

use nalgebra::{Matrix2, Vector2};

use crate::axes::Axis;
use crate::error::{DegenerateReason, ExtractError};

/// Linear mapping from an axis-relative pixel coordinate to a data value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub scale: f64,
    pub offset: f64,
}

impl Calibration {
    pub fn apply(&self, position: f64) -> f64 {
        self.scale * position + self.offset
    }
}

/// Solve the calibration of `axis` from `(position, value)` tick pairs.
///
/// Two pairs are solved exactly, more by least squares.
pub fn solve(axis: Axis, pairs: &[(f64, f64)]) -> Result<Calibration, ExtractError> {
    let degenerate = |reason| ExtractError::DegenerateCalibration { axis, reason };

    if pairs.len() < 2 {
        return Err(degenerate(DegenerateReason::TooFewTicks(pairs.len())));
    }
    let (p0, v0) = pairs[0];
    if pairs.iter().all(|&(p, _)| p == p0) {
        return Err(degenerate(DegenerateReason::CoincidentPositions));
    }
    if pairs.iter().all(|&(_, v)| v == v0) {
        return Err(degenerate(DegenerateReason::ConstantValues));
    }

    if let [(p1, v1), (p2, v2)] = *pairs {
        let scale = (v2 - v1) / (p2 - p1);
        return Ok(Calibration {
            scale,
            offset: v1 - scale * p1,
        });
    }

    // Normal equations of v = scale * p + offset.
    let n = pairs.len() as f64;
    let sum_p: f64 = pairs.iter().map(|&(p, _)| p).sum();
    let sum_pp: f64 = pairs.iter().map(|&(p, _)| p * p).sum();
    let sum_v: f64 = pairs.iter().map(|&(_, v)| v).sum();
    let sum_pv: f64 = pairs.iter().map(|&(p, v)| p * v).sum();

    let normal = Matrix2::new(sum_pp, sum_p, sum_p, n);
    let rhs = Vector2::new(sum_pv, sum_v);
    let solution = normal
        .lu()
        .solve(&rhs)
        .ok_or_else(|| degenerate(DegenerateReason::CoincidentPositions))?;

    Ok(Calibration {
        scale: solution[0],
        offset: solution[1],
    })
}
