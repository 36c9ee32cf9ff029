//! Technical indicators over OHLCV series.
//!
//! Each calculator is a pure function of its input columns returning a
//! vector aligned with the bars. [`Engine`] runs the fixed suite and
//! assembles either the latest-bar [`IndicatorReport`] or the per-bar
//! [`FullSeriesReport`].

pub mod adx;
pub mod bollinger;
pub mod cmf;
pub mod config;
mod engine;
pub mod macd;
pub mod obv;
pub mod report;
pub mod rsi;
pub mod trend;
pub mod vwap;
pub mod window;

pub use config::{AdxMethod, EngineConfig, PriceBasis, WindowPolicy};
pub use engine::Engine;
pub use report::{FullSeriesReport, IndicatorFrame, IndicatorReport, IndicatorRow};
