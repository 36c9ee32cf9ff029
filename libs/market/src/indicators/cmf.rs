use super::window::rolling_sum;
use crate::series::Bar;

/// Chaikin Money Flow over `window` bars. A bar with no range contributes a
/// zero multiplier; a window with no volume is undefined.
pub fn calculate(bars: &[Bar], window: usize) -> Vec<Option<f64>> {
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
    let mfv: Vec<f64> = bars.iter().map(|b| multiplier(b) * b.volume).collect();

    let mfv_sum = rolling_sum(&mfv, window, window);
    let vol_sum = rolling_sum(&volumes, window, window);

    mfv_sum
        .into_iter()
        .zip(vol_sum)
        .map(|(m, v)| match (m, v) {
            (Some(m), Some(v)) if v != 0.0 => Some(m / v),
            _ => None,
        })
        .collect()
}

fn multiplier(bar: &Bar) -> f64 {
    let range = bar.high - bar.low;
    if range == 0.0 {
        return 0.0;
    }
    ((bar.close - bar.low) - (bar.high - bar.close)) / range
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
    fn closes_at_high_is_plus_one() {
        let bars = vec![bar(11.0, 9.0, 11.0, 100.0); 20];
        assert_eq!(calculate(&bars, 20)[19], Some(1.0));
    }

    #[test]
    fn closes_at_low_is_minus_one() {
        let bars = vec![bar(11.0, 9.0, 9.0, 100.0); 20];
        assert_eq!(calculate(&bars, 20)[19], Some(-1.0));
    }

    #[test]
    fn zero_range_contributes_zero() {
        let bars = vec![bar(10.0, 10.0, 10.0, 100.0); 20];
        assert_eq!(calculate(&bars, 20)[19], Some(0.0));
    }

    #[test]
    fn zero_volume_window_is_undefined() {
        let bars = vec![bar(11.0, 9.0, 10.5, 0.0); 20];
        assert_eq!(calculate(&bars, 20)[19], None);
    }

    #[test]
    fn short_series_is_undefined() {
        let bars = vec![bar(11.0, 9.0, 10.5, 10.0); 19];
        assert!(calculate(&bars, 20).iter().all(Option::is_none));
    }

    #[test]
    fn bounded() {
        let bars: Vec<Bar> = (0..60)
            .map(|i| {
                let c = 100.0 + (i as f64 * 0.5).sin() * 3.0;
                bar(c + 1.0 + (i % 3) as f64, c - 1.5, c, 1000.0 + i as f64)
            })
            .collect();
        for v in calculate(&bars, 20).into_iter().flatten() {
            assert!((-1.0..=1.0).contains(&v));
        }
    }
}
