use serde::Serialize;

use super::window::rolling_mean;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendSignal {
    #[serde(rename = "Golden Cross (Bullish)")]
    GoldenCross,
    #[serde(rename = "Death Cross (Bearish)")]
    DeathCross,
}

/// Simple moving average, undefined until `window` closes are available.
pub fn sma(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_mean(closes, window, window)
}

/// Compare the latest fast and slow averages.
pub fn signal(fast: Option<f64>, slow: Option<f64>) -> Option<TrendSignal> {
    let (fast, slow) = (fast?, slow?);
    if fast > slow {
        Some(TrendSignal::GoldenCross)
    } else if fast < slow {
        Some(TrendSignal::DeathCross)
    } else {
        None
    }
}
