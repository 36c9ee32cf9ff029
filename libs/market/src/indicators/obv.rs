use crate::series::Bar;

/// On-balance volume, starting at 0 on the first bar. Unchanged closes add
/// nothing.
pub fn calculate(bars: &[Bar]) -> Vec<f64> {
    let mut obv = 0.0;
    let mut out = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        if i > 0 {
            let prev = bars[i - 1].close;
            if bar.close > prev {
                obv += bar.volume;
            } else if bar.close < prev {
                obv -= bar.volume;
            }
        }
        out.push(obv);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars(closes: &[f64], volume: f64) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar {
                timestamp: i as i64,
                open: c,
                high: c,
                low: c,
                close: c,
                volume,
            })
            .collect()
    }

    #[test]
    fn up_then_down() {
        assert_eq!(calculate(&bars(&[10.0, 12.0, 11.0], 100.0)), vec![0.0, 100.0, 0.0]);
    }

    #[test]
    fn flat_stays_zero() {
        assert!(calculate(&bars(&[5.0; 10], 250.0)).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn empty() {
        assert!(calculate(&[]).is_empty());
    }
}
