use super::config::WindowPolicy;
use super::window::rolling_mean;

/// Relative Strength Index over simple rolling averages of gains and losses.
///
/// Index 0 has no price change and is always `None`. After that the window
/// policy decides whether a partially filled window yields a value. A window
/// with no losses reports 100; a window with no movement at all reports 50.
pub fn rsi(closes: &[f64], period: usize, policy: WindowPolicy) -> Vec<Option<f64>> {
    if closes.is_empty() {
        return Vec::new();
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let gains: Vec<f64> = deltas.iter().map(|d| d.max(0.0)).collect();
    let losses: Vec<f64> = deltas.iter().map(|d| (-d).max(0.0)).collect();

    let min_periods = policy.min_periods(period);
    let avg_gain = rolling_mean(&gains, period, min_periods);
    let avg_loss = rolling_mean(&losses, period, min_periods);

    let mut out = Vec::with_capacity(closes.len());
    out.push(None);
    out.extend(
        avg_gain
            .into_iter()
            .zip(avg_loss)
            .map(|(g, l)| Some(from_averages(g?, l?))),
    );
    out
}

fn from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}
