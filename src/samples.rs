//! Mapping of curve pixels to data-unit samples.

use crate::calibrate::Calibration;
use crate::curve::CurvePoint;

/// A point of the extracted function in data units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

/// Convert curve points to samples, sorted by ascending x.
///
/// `origin` is the pixel (column, row) of the axis crossing. Rows grow
/// downward while data y grows upward, so y positions are measured as
/// `origin_row - row`.
pub fn map_samples(
    curve: &[CurvePoint],
    origin: (u32, u32),
    x_cal: &Calibration,
    y_cal: &Calibration,
) -> Vec<Sample> {
    let (ox, oy) = (origin.0 as f64, origin.1 as f64);
    let mut samples: Vec<Sample> = curve
        .iter()
        .map(|p| Sample {
            x: x_cal.apply(p.x as f64 - ox),
            y: y_cal.apply(oy - p.y),
        })
        .collect();
    // A negative x scale (labels decreasing to the right) reverses the order.
    samples.sort_by(|a, b| a.x.total_cmp(&b.x));
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_inverted_around_the_origin() {
        let curve = [CurvePoint { x: 10, y: 80.0 }, CurvePoint { x: 50, y: 50.0 }];
        let x_cal = Calibration { scale: 0.1, offset: 0.0 };
        let y_cal = Calibration { scale: 0.5, offset: 1.0 };

        let samples = map_samples(&curve, (10, 80), &x_cal, &y_cal);
        assert_eq!(samples[0], Sample { x: 0.0, y: 1.0 });
        assert_eq!(samples[1], Sample { x: 4.0, y: 16.0 });
    }

    #[test]
    fn descending_labels_still_give_ascending_x() {
        let curve = [
            CurvePoint { x: 0, y: 5.0 },
            CurvePoint { x: 1, y: 6.0 },
            CurvePoint { x: 2, y: 7.0 },
        ];
        let x_cal = Calibration { scale: -2.0, offset: 10.0 };
        let y_cal = Calibration { scale: 1.0, offset: 0.0 };

        let samples = map_samples(&curve, (0, 10), &x_cal, &y_cal);
        let xs: Vec<f64> = samples.iter().map(|s| s.x).collect();
        assert_eq!(xs, vec![6.0, 8.0, 10.0]);
        assert_eq!(samples[0].y, 3.0);
    }
}
