use serde::Serialize;

use super::config::PriceBasis;
use crate::series::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceVsVwap {
    Above,
    Below,
    At,
}

/// Cumulative volume-weighted average price over the whole series, no
/// session reset. Undefined while no volume has traded.
pub fn calculate(bars: &[Bar], basis: PriceBasis) -> Vec<Option<f64>> {
    let mut pv = 0.0;
    let mut vol = 0.0;

    bars.iter()
        .map(|bar| {
            let price = match basis {
                PriceBasis::Close => bar.close,
                PriceBasis::Typical => bar.typical_price(),
            };
            pv += price * bar.volume;
            vol += bar.volume;

            (vol > 0.0).then(|| pv / vol)
        })
        .collect()
}

pub fn classify(close: f64, vwap: Option<f64>) -> Option<PriceVsVwap> {
    let vwap = vwap?;
    let pos = if close > vwap {
        PriceVsVwap::Above
    } else if close < vwap {
        PriceVsVwap::Below
    } else {
        PriceVsVwap::At
    };
    Some(pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(high: f64, low: f64, close: f64, volume: f64) -> Bar {
        Bar {
            timestamp: 0,
            open: close,
            high,
            low,
            close,
            volume,
        }
    }

    #[test]
    fn close_basis_weights_by_volume() {
        let bars = vec![bar(10.0, 10.0, 10.0, 100.0), bar(13.0, 13.0, 13.0, 200.0)];
        let out = calculate(&bars, PriceBasis::Close);
        assert_eq!(out[0], Some(10.0));
        assert!((out[1].unwrap() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn typical_basis_uses_hlc_average() {
        let bars = vec![bar(12.0, 6.0, 9.0, 10.0)];
        assert_eq!(calculate(&bars, PriceBasis::Typical)[0], Some(9.0));
    }

    #[test]
    fn zero_volume_is_undefined_until_trading() {
        let bars = vec![bar(5.0, 5.0, 5.0, 0.0), bar(6.0, 6.0, 6.0, 50.0)];
        let out = calculate(&bars, PriceBasis::Close);
        assert_eq!(out[0], None);
        assert_eq!(out[1], Some(6.0));
    }

    #[test]
    fn classification() {
        assert_eq!(classify(11.0, Some(10.0)), Some(PriceVsVwap::Above));
        assert_eq!(classify(9.0, Some(10.0)), Some(PriceVsVwap::Below));
        assert_eq!(classify(10.0, Some(10.0)), Some(PriceVsVwap::At));
        assert_eq!(classify(10.0, None), None);
    }
}
