//! pic2data: hand-drawn chart image → numeric samples of the plotted function.
//!
//! Reads a raster chart drawn with a fixed colour convention (black axes,
//! red curve, blue tick marks and digit labels), calibrates both axes from
//! the labelled ticks and returns the curve as data-unit samples. The
//! samples can be smoothed by a truncated Fourier series.
//!
//! # Example
//!
//! ```no_run
//! use pic2data::{extract_with_fourier, load_image, ExtractConfig, FourierConfig};
//! use std::path::Path;
//!
//! let img = load_image(Path::new("chart.png"))?;
//! let (extraction, spectrum) =
//!     extract_with_fourier(&img, &ExtractConfig::default(), &FourierConfig::default())?;
//! println!("{} samples, {} coefficients", extraction.samples.len(), spectrum.coefficients.len());
//! # Ok::<(), pic2data::ExtractError>(())
//! ```

#![forbid(unsafe_code)]

mod bitmap;
mod config;
mod geom;

pub mod axes;
pub mod calibrate;
pub mod classify;
pub mod curve;
pub mod digits;
pub mod error;
pub mod fourier;
pub mod samples;
pub mod ticks;

#[cfg(test)]
mod test_utils;

pub use axes::{Axes, Axis, AxisLine};
pub use bitmap::load_image;
pub use calibrate::Calibration;
pub use config::{ExtractConfig, FourierConfig};
pub use curve::CurvePoint;
pub use error::{DegenerateReason, ExtractError};
pub use fourier::FourierSpectrum;
pub use geom::PixelRect;
pub use samples::Sample;
pub use ticks::{TickLabel, TickMark};

use std::time::Instant;

use image::RgbImage;
use log::info;

use classify::ClassMap;

/// Everything the pipeline found in one chart.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub axes: Axes,
    /// Labelled ticks of the horizontal axis, by ascending column.
    pub x_ticks: Vec<TickLabel>,
    /// Labelled ticks of the vertical axis, by ascending row.
    pub y_ticks: Vec<TickLabel>,
    pub x_calibration: Calibration,
    pub y_calibration: Calibration,
    /// One point per curve column, in pixel coordinates.
    pub curve: Vec<CurvePoint>,
    /// The function in data units, ascending x.
    pub samples: Vec<Sample>,
}

/// Full pipeline: chart image → calibrated samples.
pub fn extract(img: &RgbImage, config: &ExtractConfig) -> Result<Extraction, ExtractError> {
    let t_start = Instant::now();

    // ── Classify ──────────────────────────────────────────
    let map = ClassMap::from_image(img, config.color_tolerance);
    info!("classify: {}x{} px, tolerance {}", map.width(), map.height(), config.color_tolerance);

    // ── Axes ──────────────────────────────────────────────
    let axes = axes::detect_axes(&map, config)?;
    let (origin_col, origin_row) = axes.origin();
    info!(
        "axes: horizontal at row {} ({} px), vertical at column {} ({} px)",
        origin_row, axes.horizontal.support, origin_col, axes.vertical.support,
    );

    // ── Ticks & labels ────────────────────────────────────
    let marks = ticks::locate_ticks(&map, &axes, config)?;
    let x_ticks = read_labels(marks.horizontal, config.min_digit_score)?;
    let y_ticks = read_labels(marks.vertical, config.min_digit_score)?;
    info!(
        "ticks: x {:?}, y {:?}",
        x_ticks.iter().map(|t| t.value).collect::<Vec<_>>(),
        y_ticks.iter().map(|t| t.value).collect::<Vec<_>>(),
    );

    // ── Calibration ───────────────────────────────────────
    let x_pairs: Vec<(f64, f64)> = x_ticks
        .iter()
        .map(|t| (t.mark.position - origin_col as f64, t.value as f64))
        .collect();
    let y_pairs: Vec<(f64, f64)> = y_ticks
        .iter()
        .map(|t| (origin_row as f64 - t.mark.position, t.value as f64))
        .collect();
    let x_calibration = calibrate::solve(Axis::Horizontal, &x_pairs)?;
    let y_calibration = calibrate::solve(Axis::Vertical, &y_pairs)?;
    info!(
        "calibrate: x = {:.4}·px + {:.4}, y = {:.4}·px + {:.4}",
        x_calibration.scale, x_calibration.offset, y_calibration.scale, y_calibration.offset,
    );

    // ── Curve ─────────────────────────────────────────────
    let curve = curve::extract_curve(&map)?;
    let samples = samples::map_samples(&curve, (origin_col, origin_row), &x_calibration, &y_calibration);
    info!(
        "curve: {} columns → {} samples  ({}ms)",
        curve.len(),
        samples.len(),
        t_start.elapsed().as_millis(),
    );

    Ok(Extraction {
        axes,
        x_ticks,
        y_ticks,
        x_calibration,
        y_calibration,
        curve,
        samples,
    })
}

/// [`extract`] followed by a truncated Fourier reconstruction of the samples.
pub fn extract_with_fourier(
    img: &RgbImage,
    config: &ExtractConfig,
    fourier: &FourierConfig,
) -> Result<(Extraction, FourierSpectrum), ExtractError> {
    let extraction = extract(img, config)?;

    // ── Fourier ───────────────────────────────────────────
    let spectrum = fourier::reconstruct(&extraction.samples, fourier)?;
    info!(
        "fourier: {} harmonics{}",
        spectrum.coefficients.len(),
        if fourier.suppress_gibbs { ", Gibbs suppression" } else { "" },
    );
    Ok((extraction, spectrum))
}

fn read_labels(marks: Vec<TickMark>, min_score: f64) -> Result<Vec<TickLabel>, ExtractError> {
    marks.into_iter().map(|mark| mark.read(min_score)).collect()
}
