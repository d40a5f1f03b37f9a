//! Truncated discrete Fourier reconstruction of the sampled function.
//!
//! The DFT needs evenly spaced samples: when the x spacing is not uniform
//! (columns without curve pixels) the y values are first linearly resampled
//! onto a uniform grid of the same length spanning the observed x range.
//!
//! The reconstruction keeps the mean plus harmonics `1..=n`, each together
//! with its mirror `N - m`, so it is a real low-pass filter: `n = 1` is a
//! constant plus one sinusoid, `n = N` reproduces the input.

use std::f64::consts::TAU;

use nalgebra::Complex;

use crate::config::FourierConfig;
use crate::error::ExtractError;
use crate::samples::Sample;

/// Relative deviation from the mean step still treated as uniform spacing.
const UNIFORM_TOLERANCE: f64 = 1e-6;

/// Fraction of the signal length added on each side for Gibbs suppression.
const GIBBS_PAD_FRACTION: f64 = 0.2;

/// Result of a truncated Fourier reconstruction.
#[derive(Debug, Clone)]
pub struct FourierSpectrum {
    /// DFT coefficients of harmonics `0..n`.
    pub coefficients: Vec<Complex<f64>>,
    /// Truncated series evaluated at the (uniform) sample positions.
    pub reconstruction: Vec<Sample>,
    /// Kept harmonics as (signed frequency, coefficient).
    kept: Vec<(f64, Complex<f64>)>,
    /// Length of the transformed signal, padding included.
    len: usize,
    /// Padding samples in front of the first real sample.
    pad: usize,
    x_start: f64,
    x_end: f64,
    step: f64,
}

impl FourierSpectrum {
    /// Evaluate the truncated series at `x` (trigonometric interpolation
    /// between sample positions).
    pub fn evaluate(&self, x: f64) -> f64 {
        let t = if self.step == 0.0 {
            self.pad as f64
        } else {
            (x - self.x_start) / self.step + self.pad as f64
        };
        let n = self.len as f64;
        let sum: f64 = self
            .kept
            .iter()
            .map(|&(freq, c)| (c * Complex::from_polar(1.0, TAU * freq * t / n)).re)
            .sum();
        sum / n
    }

    /// `count` evenly spaced evaluations over the sampled x range.
    pub fn resample(&self, count: usize) -> Vec<Sample> {
        match count {
            0 => Vec::new(),
            1 => vec![Sample {
                x: self.x_start,
                y: self.evaluate(self.x_start),
            }],
            _ => {
                let dx = (self.x_end - self.x_start) / (count - 1) as f64;
                (0..count)
                    .map(|i| {
                        let x = self.x_start + i as f64 * dx;
                        Sample {
                            x,
                            y: self.evaluate(x),
                        }
                    })
                    .collect()
            }
        }
    }

    /// Series value at integer index `j` of the transformed signal.
    fn value_at_index(&self, j: usize) -> f64 {
        let n = self.len as f64;
        let sum: f64 = self
            .kept
            .iter()
            .map(|&(freq, c)| {
                // freq * j taken mod len keeps the phase argument small.
                let phase = (freq * j as f64).rem_euclid(n);
                (c * Complex::from_polar(1.0, TAU * phase / n)).re
            })
            .sum();
        sum / n
    }
}

/// Compute the first `config.harmonics` DFT coefficients of the sample
/// y-values and the reconstruction from the mean and harmonics
/// `1..=config.harmonics`.
pub fn reconstruct(samples: &[Sample], config: &FourierConfig) -> Result<FourierSpectrum, ExtractError> {
    let n = config.harmonics;
    if n == 0 || n > samples.len() {
        return Err(ExtractError::InvalidHarmonicCount {
            requested: n,
            available: samples.len(),
        });
    }

    let (xs, ys) = uniform_grid(samples);
    let (signal, pad) = if config.suppress_gibbs {
        pad_ends(&ys)
    } else {
        (ys.clone(), 0)
    };
    let len = signal.len();

    let coefficients: Vec<Complex<f64>> = (0..n).map(|k| dft_bin(&signal, k)).collect();
    // Mean plus harmonics 1..=n and their mirrors.
    let kept: Vec<(f64, Complex<f64>)> = (0..len)
        .filter(|&m| m.min(len - m) <= n)
        .map(|m| {
            let coefficient = if m < n { coefficients[m] } else { dft_bin(&signal, m) };
            let freq = if 2 * m <= len { m as f64 } else { m as f64 - len as f64 };
            (freq, coefficient)
        })
        .collect();
    log::debug!(
        "fourier: {} samples ({} padded), {} harmonics, {} bins kept",
        ys.len(),
        len,
        n,
        kept.len()
    );

    let step = if xs.len() > 1 { xs[1] - xs[0] } else { 0.0 };
    let mut spectrum = FourierSpectrum {
        coefficients,
        reconstruction: Vec::new(),
        kept,
        len,
        pad,
        x_start: xs[0],
        x_end: xs[xs.len() - 1],
        step,
    };
    spectrum.reconstruction = xs
        .iter()
        .enumerate()
        .map(|(j, &x)| Sample {
            x,
            y: spectrum.value_at_index(j + pad),
        })
        .collect();
    Ok(spectrum)
}

/// X_k = sum_j y_j exp(-2 pi i j k / N).
fn dft_bin(signal: &[f64], k: usize) -> Complex<f64> {
    let n = signal.len();
    signal
        .iter()
        .enumerate()
        .map(|(j, &y)| {
            let phase = ((j * k) % n) as f64 / n as f64;
            Complex::from_polar(y, -TAU * phase)
        })
        .sum()
}

/// Sample positions and values on a uniform x grid.
///
/// Already-uniform input is returned as is; otherwise y is linearly
/// interpolated at `len` evenly spaced x over the same range.
fn uniform_grid(samples: &[Sample]) -> (Vec<f64>, Vec<f64>) {
    let xs: Vec<f64> = samples.iter().map(|s| s.x).collect();
    let ys: Vec<f64> = samples.iter().map(|s| s.y).collect();
    if samples.len() < 3 {
        return (xs, ys);
    }

    let first = xs[0];
    let last = xs[xs.len() - 1];
    let step = (last - first) / (xs.len() - 1) as f64;
    let uniform = xs
        .windows(2)
        .all(|w| ((w[1] - w[0]) - step).abs() <= UNIFORM_TOLERANCE * step.abs());
    if uniform {
        return (xs, ys);
    }

    let grid: Vec<f64> = (0..xs.len()).map(|i| first + i as f64 * step).collect();
    let mut values = Vec::with_capacity(grid.len());
    let mut seg = 0;
    for &x in &grid {
        while seg + 2 < xs.len() && xs[seg + 1] < x {
            seg += 1;
        }
        let (x0, x1) = (xs[seg], xs[seg + 1]);
        let t = if x1 == x0 { 0.0 } else { ((x - x0) / (x1 - x0)).clamp(0.0, 1.0) };
        values.push(ys[seg] + t * (ys[seg + 1] - ys[seg]));
    }
    log::debug!("fourier: resampled {} unevenly spaced samples", xs.len());
    (grid, values)
}

/// Extend `ys` on both ends with linear ramps meeting at the mean of the
/// end values, so the periodic extension has no jump. Returns the padded
/// signal and the padding length per side.
fn pad_ends(ys: &[f64]) -> (Vec<f64>, usize) {
    let pad = (GIBBS_PAD_FRACTION * ys.len() as f64).round() as usize;
    if pad == 0 {
        return (ys.to_vec(), 0);
    }
    let first = ys[0];
    let last = ys[ys.len() - 1];
    let mid = (first + last) / 2.0;

    let mut out = Vec::with_capacity(ys.len() + 2 * pad);
    out.extend((0..pad).map(|k| mid + (first - mid) * k as f64 / pad as f64));
    out.extend_from_slice(ys);
    out.extend((1..=pad).map(|k| last + (mid - last) * k as f64 / pad as f64));
    (out, pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples_from(f: impl Fn(f64) -> f64, count: usize) -> Vec<Sample> {
        (0..count)
            .map(|i| {
                let x = i as f64 / (count - 1) as f64;
                Sample { x, y: f(x) }
            })
            .collect()
    }

    fn config(harmonics: usize) -> FourierConfig {
        FourierConfig {
            harmonics,
            suppress_gibbs: false,
        }
    }

    fn sq_error(samples: &[Sample], spectrum: &FourierSpectrum) -> f64 {
        samples
            .iter()
            .zip(&spectrum.reconstruction)
            .map(|(s, r)| (s.y - r.y).powi(2))
            .sum()
    }

    #[test]
    fn all_harmonics_reproduce_the_signal() {
        for count in [7, 8] {
            let samples = samples_from(|x| (3.0 * x).sin() + x * x, count);
            let spectrum = reconstruct(&samples, &config(count)).expect("spectrum");
            assert_eq!(spectrum.coefficients.len(), count);
            for (s, r) in samples.iter().zip(&spectrum.reconstruction) {
                assert_eq!(s.x, r.x);
                assert!((s.y - r.y).abs() < 1e-9, "{} vs {}", s.y, r.y);
            }
        }
    }

    #[test]
    fn one_harmonic_is_mean_plus_one_sinusoid() {
        // One full period over 16 samples lives entirely in bins 0, 1 and 15.
        let samples: Vec<Sample> = (0..16)
            .map(|j| Sample {
                x: j as f64,
                y: 0.5 + (TAU * j as f64 / 16.0).sin(),
            })
            .collect();
        let spectrum = reconstruct(&samples, &config(1)).expect("spectrum");
        assert_eq!(spectrum.coefficients.len(), 1);
        assert!((spectrum.coefficients[0].re - 8.0).abs() < 1e-9);

        let ys: Vec<f64> = spectrum.reconstruction.iter().map(|r| r.y).collect();
        let spread = ys.iter().cloned().fold(f64::MIN, f64::max) - ys.iter().cloned().fold(f64::MAX, f64::min);
        assert!(spread > 1.9, "spread {spread}");
        for (s, r) in samples.iter().zip(&spectrum.reconstruction) {
            assert!((s.y - r.y).abs() < 1e-9, "{} vs {}", s.y, r.y);
        }
    }

    #[test]
    fn one_harmonic_drops_higher_frequencies() {
        let samples: Vec<Sample> = (0..32)
            .map(|j| {
                let t = TAU * j as f64 / 32.0;
                Sample {
                    x: j as f64,
                    y: t.cos() + 0.5 * (3.0 * t).cos(),
                }
            })
            .collect();
        let spectrum = reconstruct(&samples, &config(1)).expect("spectrum");
        for (j, r) in spectrum.reconstruction.iter().enumerate() {
            let expected = (TAU * j as f64 / 32.0).cos();
            assert!((r.y - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn error_never_grows_with_more_harmonics() {
        let samples = samples_from(|x| (x - 0.5).powi(2) + 0.3 * (5.0 * x).cos(), 40);
        let errors: Vec<f64> = (1..=40)
            .map(|n| sq_error(&samples, &reconstruct(&samples, &config(n)).expect("spectrum")))
            .collect();
        for pair in errors.windows(2) {
            assert!(pair[1] <= pair[0] + 1e-9, "{} then {}", pair[0], pair[1]);
        }
        assert!(errors[0] > errors[5]);
        assert!(errors[39] < 1e-12);
    }

    #[test]
    fn harmonic_count_out_of_range() {
        let samples = samples_from(|x| x, 5);
        for n in [0, 6] {
            match reconstruct(&samples, &config(n)) {
                Err(ExtractError::InvalidHarmonicCount {
                    requested,
                    available,
                }) => {
                    assert_eq!(requested, n);
                    assert_eq!(available, 5);
                }
                other => panic!("unexpected result {other:?}"),
            }
        }
    }

    #[test]
    fn uneven_spacing_is_resampled_first() {
        let samples = vec![
            Sample { x: 0.0, y: 0.0 },
            Sample { x: 1.0, y: 2.0 },
            Sample { x: 3.0, y: 6.0 },
            Sample { x: 4.0, y: 8.0 },
            Sample { x: 6.0, y: 12.0 },
        ];
        let spectrum = reconstruct(&samples, &config(5)).expect("spectrum");
        let xs: Vec<f64> = spectrum.reconstruction.iter().map(|s| s.x).collect();
        assert_eq!(xs, vec![0.0, 1.5, 3.0, 4.5, 6.0]);
        // y = 2x is linear, so resampling is exact and n = N reproduces it.
        for r in &spectrum.reconstruction {
            assert!((r.y - 2.0 * r.x).abs() < 1e-9);
        }
    }

    #[test]
    fn evaluate_matches_reconstruction_on_grid() {
        let samples = samples_from(|x| (2.0 * x).sin(), 16);
        let spectrum = reconstruct(&samples, &config(4)).expect("spectrum");
        for r in &spectrum.reconstruction {
            assert!((spectrum.evaluate(r.x) - r.y).abs() < 1e-9);
        }
        let dense = spectrum.resample(61);
        assert_eq!(dense.len(), 61);
        assert_eq!(dense[0].x, 0.0);
        assert!((dense[60].x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn gibbs_suppression_tames_the_edges() {
        // A ramp jumps from its last to its first value when repeated.
        let samples = samples_from(|x| 49.0 * x, 50);
        let plain = reconstruct(&samples, &config(5)).expect("spectrum");
        let padded = reconstruct(
            &samples,
            &FourierConfig {
                harmonics: 5,
                suppress_gibbs: true,
            },
        )
        .expect("spectrum");

        let edge_error = |s: &FourierSpectrum| (s.reconstruction[0].y - samples[0].y).abs();
        assert_eq!(padded.reconstruction.len(), 50);
        assert!(edge_error(&padded) < edge_error(&plain) / 2.0);
    }
}
