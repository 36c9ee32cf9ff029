//! Average Directional Index.
//!
//! Directional movement and the normalizer are smoothed with an EMA of
//! `period`. With [`AdxMethod::TrueRange`] the normalizer is the true range
//! and the reported ADX is the EMA of DX. [`AdxMethod::Volume`] keeps the
//! older behavior of normalizing against volume and reporting DX unsmoothed.
//!
//! Values are undefined for the first `period` bars.

use super::config::AdxMethod;
use super::window::ema_defined;
use crate::error::IndicatorError;
use crate::series::Bar;

pub fn calculate(
    bars: &[Bar],
    period: usize,
    method: AdxMethod,
) -> Result<Vec<Option<f64>>, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidPeriod(period));
    }

    let n = bars.len();
    let mut plus_dm = vec![None; n];
    let mut minus_dm = vec![None; n];
    let mut norm = vec![None; n];

    for i in 1..n {
        let (cur, prev) = (&bars[i], &bars[i - 1]);
        let up = cur.high - prev.high;
        let down = prev.low - cur.low;

        plus_dm[i] = Some(if up > down && up > 0.0 { up } else { 0.0 });
        minus_dm[i] = Some(if down > up && down > 0.0 { down } else { 0.0 });
        norm[i] = Some(match method {
            AdxMethod::TrueRange => true_range(cur, prev.close),
            AdxMethod::Volume => cur.volume,
        });
    }

    let plus_dm = ema_defined(&plus_dm, period)?;
    let minus_dm = ema_defined(&minus_dm, period)?;
    let norm = ema_defined(&norm, period)?;

    let dx: Vec<Option<f64>> = (0..n)
        .map(|i| {
            let (p, m, d) = (plus_dm[i]?, minus_dm[i]?, norm[i]?);
            let plus_di = ratio(p, d);
            let minus_di = ratio(m, d);
            let sum = plus_di + minus_di;
            Some(if sum == 0.0 {
                0.0
            } else {
                100.0 * (plus_di - minus_di).abs() / sum
            })
        })
        .collect();

    let adx = match method {
        AdxMethod::TrueRange => ema_defined(&dx, period)?,
        AdxMethod::Volume => dx,
    };

    Ok(adx
        .into_iter()
        .enumerate()
        .map(|(i, v)| if i < period { None } else { v })
        .collect())
}

fn true_range(bar: &Bar, prev_close: f64) -> f64 {
    (bar.high - bar.low)
        .max((bar.high - prev_close).abs())
        .max((bar.low - prev_close).abs())
}

fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { 100.0 * num / den }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(i: usize, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            timestamp: i as i64,
            open: close,
            high,
            low,
            close,
            volume: 1_000.0,
        }
    }

    fn trending(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let c = 100.0 + i as f64;
                bar(i, c + 0.5, c - 0.5, c)
            })
            .collect()
    }

    #[test]
    fn warm_up_is_undefined() {
        let out = calculate(&trending(30), 14, AdxMethod::TrueRange).unwrap();
        assert_eq!(out.len(), 30);
        assert!(out[..14].iter().all(Option::is_none));
        assert!(out[14..].iter().all(Option::is_some));
    }

    #[test]
    fn one_way_trend_is_strong() {
        let out = calculate(&trending(60), 14, AdxMethod::TrueRange).unwrap();
        let last = out.last().unwrap().unwrap();
        assert!((last - 100.0).abs() < 1e-9, "adx = {last}");
    }

    #[test]
    fn flat_market_has_no_direction() {
        let bars: Vec<Bar> = (0..30).map(|i| bar(i, 10.0, 10.0, 10.0)).collect();
        let out = calculate(&bars, 14, AdxMethod::TrueRange).unwrap();
        assert_eq!(*out.last().unwrap(), Some(0.0));
    }

    #[test]
    fn volume_method_reports_raw_dx() {
        let out = calculate(&trending(30), 14, AdxMethod::Volume).unwrap();
        // only +DM is ever non-zero, so DX is 100 regardless of the normalizer
        let last = out.last().unwrap().unwrap();
        assert!((last - 100.0).abs() < 1e-9, "dx = {last}");
    }

    #[test]
    fn bounded() {
        let bars: Vec<Bar> = (0..120)
            .map(|i| {
                let c = 100.0 + (i as f64 * 0.3).sin() * 8.0;
                bar(i, c + 1.0, c - 1.0, c)
            })
            .collect();
        for method in [AdxMethod::TrueRange, AdxMethod::Volume] {
            for v in calculate(&bars, 14, method).unwrap().into_iter().flatten() {
                assert!((0.0..=100.0 + 1e-9).contains(&v));
            }
        }
    }

    #[test]
    fn zero_period_is_rejected() {
        assert_eq!(
            calculate(&trending(5), 0, AdxMethod::TrueRange),
            Err(IndicatorError::InvalidPeriod(0))
        );
    }

    #[test]
    fn short_series() {
        let out = calculate(&trending(5), 14, AdxMethod::TrueRange).unwrap();
        assert!(out.iter().all(Option::is_none));
    }
}
