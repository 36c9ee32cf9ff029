use tracing::{debug, instrument, warn};

use super::config::{
    ADX_PERIOD, BOLLINGER_K, BOLLINGER_WINDOW, CMF_WINDOW, EngineConfig, MACD_FAST, MACD_SIGNAL,
    MACD_SLOW, RSI_PERIOD, SMA_FAST, SMA_SLOW,
};
use super::report::{FullSeriesReport, IndicatorFrame, IndicatorReport};
use super::{adx, bollinger, cmf, macd, obv, rsi, trend, vwap};
use crate::error::{Error, Result};
use crate::series::{Bar, Series};

/// Computes the full indicator suite over a series. Holds only immutable
/// policy, so one engine can serve any number of concurrent requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Compute every column. Fails only when there are no bars at all.
    #[instrument(name = "indicator_frame", skip(self, bars), fields(bars = bars.len()))]
    pub fn frame(&self, symbol: &str, bars: &[Bar]) -> Result<IndicatorFrame> {
        if bars.is_empty() {
            return Err(Error::NoData {
                symbol: symbol.to_string(),
            });
        }

        let n = bars.len();
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        let (macd, macd_signal, macd_histogram, macd_cross) =
            match macd::calculate(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL) {
                Ok(m) => {
                    let cross = m.crossover();
                    (defined(m.macd), defined(m.signal), defined(m.histogram), cross)
                }
                Err(e) => {
                    warn!(error = ?e, "macd unavailable");
                    (vec![None; n], vec![None; n], vec![None; n], None)
                }
            };

        let adx = adx::calculate(bars, ADX_PERIOD, self.config.adx_method).unwrap_or_else(|e| {
            warn!(error = ?e, "adx unavailable");
            vec![None; n]
        });

        let bb = bollinger::calculate(&closes, BOLLINGER_WINDOW, BOLLINGER_K);

        let frame = IndicatorFrame {
            symbol: symbol.to_string(),
            bars: bars.to_vec(),
            rsi: finite(rsi::rsi(&closes, RSI_PERIOD, self.config.rsi_window)),
            macd,
            macd_signal,
            macd_histogram,
            macd_cross,
            bb_upper: finite(bb.upper),
            bb_middle: finite(bb.middle),
            bb_lower: finite(bb.lower),
            vwap: finite(vwap::calculate(bars, self.config.vwap_basis)),
            cmf: finite(cmf::calculate(bars, CMF_WINDOW)),
            obv: defined(obv::calculate(bars)),
            sma50: finite(trend::sma(&closes, SMA_FAST)),
            sma200: finite(trend::sma(&closes, SMA_SLOW)),
            adx: finite(adx),
        };

        debug!(cross = ?frame.macd_cross, "indicator frame computed");
        Ok(frame)
    }

    /// Latest-bar report for a series.
    pub fn report(&self, series: &Series) -> Result<IndicatorReport> {
        let frame = self.frame(series.symbol(), series.bars())?;
        frame.latest().ok_or_else(|| Error::NoData {
            symbol: series.symbol().to_string(),
        })
    }

    /// Per-bar report for a series.
    pub fn full_series(&self, series: &Series) -> Result<FullSeriesReport> {
        Ok(self.frame(series.symbol(), series.bars())?.rows())
    }
}

fn defined(values: Vec<f64>) -> Vec<Option<f64>> {
    values.into_iter().map(|v| Some(v).filter(|v| v.is_finite())).collect()
}

fn finite(values: Vec<Option<f64>>) -> Vec<Option<f64>> {
    values.into_iter().map(|v| v.filter(|v| v.is_finite())).collect()
}
