use serde::Serialize;

use super::window::{rolling_mean, rolling_std};

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BandPosition {
    AboveUpper,
    BelowLower,
    Inside,
}

/// Bands at `k` sample standard deviations around the `window`-bar mean.
/// Undefined until the window is full.
pub fn calculate(closes: &[f64], window: usize, k: f64) -> BollingerBands {
    let middle = rolling_mean(closes, window, window);
    let std = rolling_std(closes, window, window);

    let (upper, lower): (Vec<_>, Vec<_>) = middle
        .iter()
        .zip(&std)
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => (Some(m + k * s), Some(m - k * s)),
            _ => (None, None),
        })
        .unzip();

    BollingerBands {
        upper,
        middle,
        lower,
    }
}

pub fn classify(close: f64, upper: Option<f64>, lower: Option<f64>) -> Option<BandPosition> {
    let (upper, lower) = (upper?, lower?);
    let pos = if close > upper {
        BandPosition::AboveUpper
    } else if close < lower {
        BandPosition::BelowLower
    } else {
        BandPosition::Inside
    };
    Some(pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_straddle_the_mean() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let bb = calculate(&closes, 20, 2.0);
        let (u, m, l) = (bb.upper[19].unwrap(), bb.middle[19].unwrap(), bb.lower[19].unwrap());
        assert!((m - 10.5).abs() < 1e-9);
        assert!(u > m && l < m);
        assert!(((u - m) - (m - l)).abs() < 1e-9);
    }

    #[test]
    fn insufficient_history_is_undefined() {
        let bb = calculate(&[1.0, 2.0, 3.0], 20, 2.0);
        assert!(bb.upper.iter().all(Option::is_none));
        assert!(bb.middle.iter().all(Option::is_none));
        assert!(bb.lower.iter().all(Option::is_none));
    }

    #[test]
    fn flat_bands_collapse() {
        let bb = calculate(&[100.0; 20], 20, 2.0);
        assert_eq!(bb.upper[19], Some(100.0));
        assert_eq!(bb.lower[19], Some(100.0));
    }

    #[test]
    fn classification() {
        assert_eq!(classify(11.0, Some(10.0), Some(5.0)), Some(BandPosition::AboveUpper));
        assert_eq!(classify(4.0, Some(10.0), Some(5.0)), Some(BandPosition::BelowLower));
        assert_eq!(classify(10.0, Some(10.0), Some(5.0)), Some(BandPosition::Inside));
        assert_eq!(classify(10.0, None, None), None);
    }
}
