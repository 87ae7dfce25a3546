//! Sampled curves returned alongside results for charting.
//!
//! A curve is built once per calculation and handed back as a plain vector;
//! rendering it is the caller's business.

use serde::{Deserialize, Serialize};

/// One sampled point of a curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

impl CurvePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Sample `f` at `count` evenly spaced x values covering `[start, end]`.
///
/// `count` below 2 yields the single point at `start`.
pub fn sample_curve<F>(start: f64, end: f64, count: usize, f: F) -> Vec<CurvePoint>
where
    F: Fn(f64) -> f64,
{
    if count < 2 {
        return vec![CurvePoint::new(start, f(start))];
    }
    let step = (end - start) / (count - 1) as f64;
    (0..count)
        .map(|i| {
            // pin the last sample to `end` exactly
            let x = if i == count - 1 { end } else { start + step * i as f64 };
            CurvePoint::new(x, f(x))
        })
        .collect()
}

/// Horizons longer than this many years are sampled instead of stepped yearly.
pub const MAX_YEARLY_POINTS: usize = 200;

/// Evaluate `f` at the end of each whole year in `[0, years]`, plus `years`
/// itself when it is fractional.
///
/// Past [`MAX_YEARLY_POINTS`] years the curve switches to evenly spaced
/// samples so its length stays bounded.
pub fn yearly_curve<F>(years: f64, f: F) -> Vec<CurvePoint>
where
    F: Fn(f64) -> f64,
{
    if years > MAX_YEARLY_POINTS as f64 {
        return sample_curve(0.0, years, MAX_YEARLY_POINTS + 1, f);
    }
    let whole = years.floor() as usize;
    let mut curve: Vec<CurvePoint> = (0..=whole)
        .map(|t| {
            let x = t as f64;
            CurvePoint::new(x, f(x))
        })
        .collect();
    if years.fract() > 0.0 {
        curve.push(CurvePoint::new(years, f(years)));
    }
    curve
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_and_count() {
        let curve = sample_curve(0.0, 10.0, 100, |x| x * 2.0);
        assert_eq!(curve.len(), 100);
        assert_eq!(curve[0], CurvePoint::new(0.0, 0.0));
        assert_eq!(curve[99], CurvePoint::new(10.0, 20.0));
    }

    #[test]
    fn test_x_is_increasing() {
        let curve = sample_curve(1.0, 2.0, 11, |x| x);
        assert!(curve.windows(2).all(|w| w[1].x > w[0].x));
    }

    #[test]
    fn test_degenerate_count() {
        assert_eq!(sample_curve(3.0, 9.0, 1, |x| x).len(), 1);
    }

    #[test]
    fn test_yearly_curve_steps_each_year() {
        let curve = yearly_curve(3.5, |t| t * 10.0);
        let xs: Vec<f64> = curve.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 3.5]);
        assert_eq!(curve[4].y, 35.0);
    }

    #[test]
    fn test_yearly_curve_length_is_bounded() {
        let curve = yearly_curve(1e9, |t| t);
        assert_eq!(curve.len(), MAX_YEARLY_POINTS + 1);
        assert_eq!(curve[MAX_YEARLY_POINTS].x, 1e9);

        assert_eq!(yearly_curve(MAX_YEARLY_POINTS as f64, |t| t).len(), MAX_YEARLY_POINTS + 1);
    }
}
