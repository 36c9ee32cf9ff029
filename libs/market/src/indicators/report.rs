use serde::Serialize;

use super::bollinger::BandPosition;
use super::macd::Crossover;
use super::trend::TrendSignal;
use super::vwap::PriceVsVwap;
use crate::series::Bar;

/// Decimal places for price-scale values.
pub const PRICE_DP: i32 = 2;
/// Decimal places for ratio-scale values such as CMF.
pub const RATIO_DP: i32 = 4;

/// Every indicator column, aligned 1:1 with the input bars. `None` marks an
/// undefined value; columns never hold NaN or infinities.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    pub symbol: String,
    pub bars: Vec<Bar>,
    pub rsi: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
    pub macd_histogram: Vec<Option<f64>>,
    pub macd_cross: Option<Crossover>,
    pub bb_upper: Vec<Option<f64>>,
    pub bb_middle: Vec<Option<f64>>,
    pub bb_lower: Vec<Option<f64>>,
    pub vwap: Vec<Option<f64>>,
    pub cmf: Vec<Option<f64>>,
    pub obv: Vec<Option<f64>>,
    pub sma50: Vec<Option<f64>>,
    pub sma200: Vec<Option<f64>>,
    pub adx: Vec<Option<f64>>,
}

/// Latest-bar values, rounded for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorReport {
    pub symbol: String,
    #[serde(rename = "RSI")]
    pub rsi: Option<f64>,
    #[serde(rename = "MACD")]
    pub macd: Option<f64>,
    #[serde(rename = "Signal")]
    pub signal: Option<f64>,
    #[serde(rename = "Histogram")]
    pub histogram: Option<f64>,
    #[serde(rename = "MACDCross")]
    pub macd_cross: Option<Crossover>,
    #[serde(rename = "BollingerBands")]
    pub bollinger: BandsValue,
    #[serde(rename = "VWAP")]
    pub vwap: VwapValue,
    #[serde(rename = "CMF")]
    pub cmf: Option<f64>,
    #[serde(rename = "OBV")]
    pub obv: Option<f64>,
    #[serde(rename = "SMA50")]
    pub sma50: Option<f64>,
    #[serde(rename = "SMA200")]
    pub sma200: Option<f64>,
    #[serde(rename = "TrendSignal")]
    pub trend_signal: Option<TrendSignal>,
    #[serde(rename = "ADX")]
    pub adx: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandsValue {
    pub upper: Option<f64>,
    pub middle: Option<f64>,
    pub lower: Option<f64>,
    pub price_vs_band: Option<BandPosition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VwapValue {
    pub value: Option<f64>,
    pub price_vs_vwap: Option<PriceVsVwap>,
}

/// Every bar with every indicator column, unrounded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullSeriesReport {
    pub symbol: String,
    pub bars: Vec<IndicatorRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorRow {
    #[serde(flatten)]
    pub bar: Bar,
    #[serde(rename = "RSI")]
    pub rsi: Option<f64>,
    #[serde(rename = "MACD")]
    pub macd: Option<f64>,
    #[serde(rename = "Signal")]
    pub signal: Option<f64>,
    #[serde(rename = "Histogram")]
    pub histogram: Option<f64>,
    #[serde(rename = "BB_upper")]
    pub bb_upper: Option<f64>,
    #[serde(rename = "BB_middle")]
    pub bb_middle: Option<f64>,
    #[serde(rename = "BB_lower")]
    pub bb_lower: Option<f64>,
    #[serde(rename = "VWAP")]
    pub vwap: Option<f64>,
    #[serde(rename = "CMF")]
    pub cmf: Option<f64>,
    #[serde(rename = "OBV")]
    pub obv: Option<f64>,
    #[serde(rename = "SMA50")]
    pub sma50: Option<f64>,
    #[serde(rename = "SMA200")]
    pub sma200: Option<f64>,
    #[serde(rename = "ADX")]
    pub adx: Option<f64>,
}

pub fn round(value: Option<f64>, dp: i32) -> Option<f64> {
    let factor = 10f64.powi(dp);
    value
        // `+ 0.0` folds -0.0 into 0.0
        .map(|v| (v * factor).round() / factor + 0.0)
        .filter(|v| v.is_finite())
}

impl IndicatorFrame {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Assemble the latest-bar report. `None` for an empty frame.
    pub fn latest(&self) -> Option<IndicatorReport> {
        let i = self.len().checked_sub(1)?;
        let close = self.bars[i].close;
        let price = |col: &[Option<f64>]| round(col[i], PRICE_DP);

        let (sma50, sma200) = (self.sma50[i], self.sma200[i]);

        Some(IndicatorReport {
            symbol: self.symbol.clone(),
            rsi: price(&self.rsi),
            macd: price(&self.macd),
            signal: price(&self.macd_signal),
            histogram: price(&self.macd_histogram),
            macd_cross: self.macd_cross,
            bollinger: BandsValue {
                upper: price(&self.bb_upper),
                middle: price(&self.bb_middle),
                lower: price(&self.bb_lower),
                price_vs_band: super::bollinger::classify(close, self.bb_upper[i], self.bb_lower[i]),
            },
            vwap: VwapValue {
                value: price(&self.vwap),
                price_vs_vwap: super::vwap::classify(close, self.vwap[i]),
            },
            cmf: round(self.cmf[i], RATIO_DP),
            obv: price(&self.obv),
            sma50: round(sma50, PRICE_DP),
            sma200: round(sma200, PRICE_DP),
            trend_signal: super::trend::signal(sma50, sma200),
            adx: price(&self.adx),
        })
    }

    /// One row per bar, unrounded.
    pub fn rows(&self) -> FullSeriesReport {
        let bars = self
            .bars
            .iter()
            .enumerate()
            .map(|(i, bar)| IndicatorRow {
                bar: *bar,
                rsi: self.rsi[i],
                macd: self.macd[i],
                signal: self.macd_signal[i],
                histogram: self.macd_histogram[i],
                bb_upper: self.bb_upper[i],
                bb_middle: self.bb_middle[i],
                bb_lower: self.bb_lower[i],
                vwap: self.vwap[i],
                cmf: self.cmf[i],
                obv: self.obv[i],
                sma50: self.sma50[i],
                sma200: self.sma200[i],
                adx: self.adx[i],
            })
            .collect();

        FullSeriesReport {
            symbol: self.symbol.clone(),
            bars,
        }
    }
}
