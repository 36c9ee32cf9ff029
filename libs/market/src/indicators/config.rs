use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;

pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const BOLLINGER_WINDOW: usize = 20;
pub const BOLLINGER_K: f64 = 2.0;
pub const CMF_WINDOW: usize = 20;
pub const SMA_FAST: usize = 50;
pub const SMA_SLOW: usize = 200;
pub const ADX_PERIOD: usize = 14;

/// How a rolling window behaves before it has filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPolicy {
    /// Undefined until the full window is available.
    #[default]
    Strict,
    /// Aggregate over whatever part of the window exists (`min_periods = 1`).
    Partial,
}

impl WindowPolicy {
    /// Minimum number of observations required for a value at `window`.
    pub fn min_periods(self, window: usize) -> usize {
        match self {
            WindowPolicy::Strict => window,
            WindowPolicy::Partial => 1,
        }
    }
}

/// Price used as the weight target for VWAP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceBasis {
    #[default]
    Close,
    /// `(high + low + close) / 3`
    Typical,
}

/// What directional movement is normalized against in ADX.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdxMethod {
    /// Wilder's definition: DI over the smoothed true range, ADX smoothed from DX.
    #[default]
    TrueRange,
    /// Legacy variant: DI over smoothed volume, ADX reported as raw DX.
    Volume,
}

/// Per-indicator policy choices. Periods are fixed constants above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineConfig {
    pub rsi_window: WindowPolicy,
    pub vwap_basis: PriceBasis,
    pub adx_method: AdxMethod,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rsi_window: WindowPolicy::Partial,
            vwap_basis: PriceBasis::Close,
            adx_method: AdxMethod::TrueRange,
        }
    }
}

impl FromStr for WindowPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(WindowPolicy::Strict),
            "partial" => Ok(WindowPolicy::Partial),
            other => Err(Error::InvalidParameter(format!(
                "window policy `{other}` (expected strict|partial)"
            ))),
        }
    }
}

impl FromStr for PriceBasis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "close" => Ok(PriceBasis::Close),
            "typical" | "hlc3" => Ok(PriceBasis::Typical),
            other => Err(Error::InvalidParameter(format!(
                "price basis `{other}` (expected close|typical)"
            ))),
        }
    }
}

impl FromStr for AdxMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "true_range" | "tr" => Ok(AdxMethod::TrueRange),
            "volume" => Ok(AdxMethod::Volume),
            other => Err(Error::InvalidParameter(format!(
                "adx method `{other}` (expected true_range|volume)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_policies() {
        assert_eq!("Strict".parse::<WindowPolicy>().unwrap(), WindowPolicy::Strict);
        assert_eq!("typical".parse::<PriceBasis>().unwrap(), PriceBasis::Typical);
        assert_eq!("volume".parse::<AdxMethod>().unwrap(), AdxMethod::Volume);
        assert!("weekly".parse::<WindowPolicy>().is_err());
    }

    #[test]
    fn min_periods_follow_policy() {
        assert_eq!(WindowPolicy::Strict.min_periods(14), 14);
        assert_eq!(WindowPolicy::Partial.min_periods(14), 1);
    }
}
