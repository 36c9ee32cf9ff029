use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One OHLCV observation, keyed by the provider's short field names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Milliseconds since the Unix epoch.
    #[serde(rename = "t")]
    pub timestamp: i64,

    #[serde(rename = "o")]
    pub open: f64,

    #[serde(rename = "h")]
    pub high: f64,

    #[serde(rename = "l")]
    pub low: f64,

    #[serde(rename = "c")]
    pub close: f64,

    #[serde(rename = "v")]
    pub volume: f64,
}

impl Bar {
    /// `(high + low + close) / 3`
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Reject bars the indicator math cannot use: prices must be finite and
    /// positive, volume finite and non-negative, and `low <= close <= high`.
    pub fn validate(&self) -> std::result::Result<(), String> {
        for (name, price) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if !price.is_finite() || price <= 0.0 {
                return Err(format!("{name} must be a positive number, got {price}"));
            }
        }
        if !self.volume.is_finite() || self.volume < 0.0 {
            return Err(format!("volume must be non-negative, got {}", self.volume));
        }
        if self.low > self.high {
            return Err(format!("low {} is above high {}", self.low, self.high));
        }
        if self.close < self.low || self.close > self.high {
            return Err(format!(
                "close {} is outside [{}, {}]",
                self.close, self.low, self.high
            ));
        }
        Ok(())
    }
}

//
// Match Polygon aggregates JSON
// https://polygon.io/docs/stocks/get_v2_aggs_ticker__stocksticker__range__multiplier___timespan___from___to
//
#[derive(Debug, Deserialize, Clone)]
pub struct AggregatesResponse {
    #[serde(default)]
    pub results: Option<Vec<Bar>>,
}

/// Bars for one symbol, ascending by timestamp. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    symbol: String,
    #[serde(rename = "results")]
    bars: Vec<Bar>,
}

impl Series {
    /// Build a series from bars in any order; they are sorted by timestamp.
    /// Every bar must pass [`Bar::validate`].
    pub fn new(symbol: impl Into<String>, mut bars: Vec<Bar>) -> Result<Self> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(Error::NoData { symbol });
        }
        for (index, bar) in bars.iter().enumerate() {
            bar.validate()
                .map_err(|reason| Error::InvalidBar { index, reason })?;
        }
        bars.sort_by_key(|b| b.timestamp);
        Ok(Self { symbol, bars })
    }

    /// Convert a provider aggregates payload. A missing or empty `results`
    /// list is reported as [`Error::NoData`].
    pub fn from_response(symbol: impl Into<String>, res: AggregatesResponse) -> Result<Self> {
        let symbol = symbol.into();
        match res.results {
            Some(bars) => Self::new(symbol, bars),
            None => Err(Error::NoData { symbol }),
        }
    }

    /// Parse raw provider JSON.
    pub fn from_json(symbol: impl Into<String>, body: &str) -> Result<Self> {
        let res: AggregatesResponse = serde_json::from_str(body)?;
        Self::from_response(symbol, res)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }
}
