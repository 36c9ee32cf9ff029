mod error;
mod polygon_client;
mod series;

pub mod indicators;

pub use error::{Error, IndicatorError, Result};
pub use polygon_client::{OptionType, PolygonClient, ProviderConfig, Timespan};
pub use series::{AggregatesResponse, Bar, Series};
