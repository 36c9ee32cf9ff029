use serde::Serialize;

use super::window::ema;
use crate::error::IndicatorError;

#[derive(Debug, Clone, PartialEq)]
pub struct Macd {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Where the MACD line sits relative to its signal line on the last bar.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Crossover {
    BullishCross,
    BearishCross,
    BullishZone,
    BearishZone,
}

pub fn calculate(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Result<Macd, IndicatorError> {
    let fast_vals = ema(closes, fast)?;
    let slow_vals = ema(closes, slow)?;

    let macd: Vec<f64> = fast_vals
        .iter()
        .zip(&slow_vals)
        .map(|(f, s)| f - s)
        .collect();
    let signal = ema(&macd, signal)?;
    let histogram = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

    Ok(Macd {
        macd,
        signal,
        histogram,
    })
}

impl Macd {
    pub fn crossover(&self) -> Option<Crossover> {
        let n = self.macd.len();
        if n < 2 {
            return None;
        }

        let (c, p) = (n - 1, n - 2);
        let prev_macd = self.macd[p];
        let prev_signal = self.signal[p];
        let cur_macd = self.macd[c];
        let cur_signal = self.signal[c];

        let cross = if prev_macd <= prev_signal && cur_macd > cur_signal {
            Crossover::BullishCross
        } else if prev_macd >= prev_signal && cur_macd < cur_signal {
            Crossover::BearishCross
        } else if cur_macd > cur_signal {
            Crossover::BullishZone
        } else {
            Crossover::BearishZone
        };
        Some(cross)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_series_has_zero_macd() {
        let m = calculate(&[25.0; 40], 12, 26, 9).unwrap();
        assert!(m.macd.iter().all(|v| v.abs() < 1e-9));
        assert!(m.signal.iter().all(|v| v.abs() < 1e-9));
        assert!(m.histogram.iter().all(|v| v.abs() < 1e-9));
    }

    #[test]
    fn defined_from_first_bar() {
        let m = calculate(&[10.0, 11.0], 12, 26, 9).unwrap();
        assert_eq!(m.macd.len(), 2);
        assert_eq!(m.macd[0], 0.0);
        assert!(m.macd[1] > 0.0);
    }

    #[test]
    fn rising_prices_are_bullish() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let m = calculate(&closes, 12, 26, 9).unwrap();
        assert!(*m.macd.last().unwrap() > 0.0);
        assert_eq!(m.crossover(), Some(Crossover::BullishZone));
    }

    #[test]
    fn reversal_is_a_bearish_cross() {
        let mut closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        closes.push(100.0);
        let m = calculate(&closes, 12, 26, 9).unwrap();
        assert_eq!(m.crossover(), Some(Crossover::BearishCross));
    }

    #[test]
    fn single_bar_has_no_crossover() {
        let m = calculate(&[10.0], 12, 26, 9).unwrap();
        assert_eq!(m.crossover(), None);
    }

    #[test]
    fn invalid_span() {
        assert_eq!(
            calculate(&[1.0], 0, 26, 9),
            Err(IndicatorError::InvalidPeriod(0))
        );
    }
}
