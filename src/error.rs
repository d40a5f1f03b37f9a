use std::fmt;

use thiserror::Error;

use crate::axes::Axis;

/// Why a calibration could not be solved for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateReason {
    /// Fewer than two labelled ticks were found on the axis.
    TooFewTicks(usize),
    /// All tick pixel positions coincide.
    CoincidentPositions,
    /// All tick values are equal.
    ConstantValues,
}

impl fmt::Display for DegenerateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewTicks(n) => write!(f, "needs at least two ticks, found {n}"),
            Self::CoincidentPositions => write!(f, "all ticks sit at the same pixel position"),
            Self::ConstantValues => write!(f, "all tick labels have the same value"),
        }
    }
}

/// Errors that can occur while extracting a function from an image.
///
/// Every variant is fatal for the current invocation.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ExtractError {
    #[error("failed to load image: {0}")]
    ImageLoad(String),

    #[error("no {axis} axis found (no line with enough black pixels)")]
    MissingAxis { axis: Axis },

    #[error("tick at pixel {position:.1} on the {axis} axis has no label nearby")]
    UnlabeledTick { axis: Axis, position: f64 },

    #[error("label of the tick at pixel {position:.1} on the {axis} axis is unreadable: {reason}")]
    UnreadableLabel {
        axis: Axis,
        position: f64,
        reason: String,
    },

    #[error("cannot calibrate the {axis} axis: {reason}")]
    DegenerateCalibration {
        axis: Axis,
        reason: DegenerateReason,
    },

    #[error("no curve pixels found in image")]
    EmptyCurve,

    #[error("invalid harmonic count {requested} (must be between 1 and {available})")]
    InvalidHarmonicCount { requested: usize, available: usize },
}
