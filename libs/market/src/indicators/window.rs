//! Rolling-window and exponential primitives shared by every indicator.
//!
//! Every function returns a vector aligned 1:1 with its input. Rolling
//! aggregates at index `i` cover `values[i + 1 - window ..= i]`, or the part
//! of that range that exists; `min_periods` decides how many observations
//! must be present before a value is emitted.

use ta::Next;
use ta::indicators::ExponentialMovingAverage;

use crate::error::IndicatorError;

fn rolling<F>(values: &[f64], window: usize, min_periods: usize, agg: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    if window == 0 {
        return vec![None; values.len()];
    }
    let min_periods = min_periods.clamp(1, window);

    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            if slice.len() < min_periods {
                None
            } else {
                agg(slice)
            }
        })
        .collect()
}

pub fn rolling_sum(values: &[f64], window: usize, min_periods: usize) -> Vec<Option<f64>> {
    rolling(values, window, min_periods, |w| Some(w.iter().sum()))
}

pub fn rolling_mean(values: &[f64], window: usize, min_periods: usize) -> Vec<Option<f64>> {
    rolling(values, window, min_periods, |w| {
        Some(w.iter().sum::<f64>() / w.len() as f64)
    })
}

/// Sample standard deviation (`n - 1` denominator). Needs two observations.
pub fn rolling_std(values: &[f64], window: usize, min_periods: usize) -> Vec<Option<f64>> {
    rolling(values, window, min_periods, |w| {
        if w.len() < 2 {
            return None;
        }
        let n = w.len() as f64;
        let mean = w.iter().sum::<f64>() / n;
        let var = w.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        Some(var.max(0.0).sqrt())
    })
}

pub fn rolling_min(values: &[f64], window: usize, min_periods: usize) -> Vec<Option<f64>> {
    rolling(values, window, min_periods, |w| {
        w.iter().copied().reduce(f64::min)
    })
}

pub fn rolling_max(values: &[f64], window: usize, min_periods: usize) -> Vec<Option<f64>> {
    rolling(values, window, min_periods, |w| {
        w.iter().copied().reduce(f64::max)
    })
}

/// Exponential moving average with `k = 2 / (span + 1)`, seeded with the
/// first value and defined from the first bar on.
pub fn ema(values: &[f64], span: usize) -> Result<Vec<f64>, IndicatorError> {
    let mut ema = ExponentialMovingAverage::new(span)
        .map_err(|_| IndicatorError::InvalidPeriod(span))?;

    Ok(values.iter().map(|&x| ema.next(x)).collect())
}

/// EMA over a column whose leading entries may be undefined. Smoothing starts
/// at the first defined value; later gaps carry the previous average forward.
pub fn ema_defined(values: &[Option<f64>], span: usize) -> Result<Vec<Option<f64>>, IndicatorError> {
    let mut ema = ExponentialMovingAverage::new(span)
        .map_err(|_| IndicatorError::InvalidPeriod(span))?;

    let mut current = None;
    Ok(values
        .iter()
        .map(|v| {
            if let Some(x) = v {
                current = Some(ema.next(*x));
            }
            current
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn strict_mean_is_undefined_until_full() {
        let out = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 3, 3);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_close(out[2].unwrap(), 2.0);
        assert_close(out[3].unwrap(), 3.0);
    }

    #[test]
    fn partial_mean_shrinks_window() {
        let out = rolling_mean(&[2.0, 4.0, 6.0], 14, 1);
        assert_close(out[0].unwrap(), 2.0);
        assert_close(out[1].unwrap(), 3.0);
        assert_close(out[2].unwrap(), 4.0);
    }

    #[test]
    fn std_is_sample_deviation() {
        let out = rolling_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 8, 8);
        // population std is 2.0; sample std is sqrt(32 / 7)
        assert_close(out[7].unwrap(), (32.0f64 / 7.0).sqrt());
    }

    #[test]
    fn std_needs_two_points() {
        let out = rolling_std(&[5.0, 6.0], 20, 1);
        assert_eq!(out[0], None);
        assert!(out[1].is_some());
    }

    #[test]
    fn min_max_sum() {
        let xs = [3.0, 1.0, 4.0, 1.0, 5.0];
        assert_eq!(rolling_min(&xs, 3, 3)[4], Some(1.0));
        assert_eq!(rolling_max(&xs, 3, 3)[4], Some(5.0));
        assert_eq!(rolling_sum(&xs, 2, 2)[4], Some(6.0));
    }

    #[test]
    fn zero_window_is_all_undefined() {
        assert!(rolling_mean(&[1.0, 2.0], 0, 0).iter().all(Option::is_none));
    }

    #[test]
    fn ema_recurrence() {
        let out = ema(&[10.0, 11.0, 12.0], 3).unwrap();
        // k = 0.5
        assert_close(out[0], 10.0);
        assert_close(out[1], 10.5);
        assert_close(out[2], 11.25);
    }

    #[test]
    fn ema_rejects_zero_span() {
        assert_eq!(ema(&[1.0], 0), Err(IndicatorError::InvalidPeriod(0)));
    }

    #[test]
    fn ema_is_bit_identical_across_calls() {
        let xs: Vec<f64> = (0..300).map(|i| (i as f64 * 0.37).sin() * 10.0 + 100.0).collect();
        let a = ema(&xs, 26).unwrap();
        let b = ema(&xs, 26).unwrap();
        assert!(a.iter().zip(&b).all(|(x, y)| x.to_bits() == y.to_bits()));
    }

    #[test]
    fn ema_defined_skips_leading_gaps() {
        let out = ema_defined(&[None, Some(4.0), Some(8.0)], 3).unwrap();
        assert_eq!(out[0], None);
        assert_close(out[1].unwrap(), 4.0);
        assert_close(out[2].unwrap(), 6.0);
    }
}
