use std::env::var;

use anyhow::{Context, Result};
use market::ProviderConfig;
use market::indicators::EngineConfig;

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: String,
    pub version: String,
    pub provider: ProviderConfig,
    pub engine: EngineConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let provider = ProviderConfig::from_env().context("loading provider config")?;

        let mut engine = EngineConfig::default();
        if let Ok(v) = var("VWAP_PRICE_BASIS") {
            engine.vwap_basis = v.parse().context("VWAP_PRICE_BASIS")?;
        }
        if let Ok(v) = var("RSI_WINDOW_POLICY") {
            engine.rsi_window = v.parse().context("RSI_WINDOW_POLICY")?;
        }
        if let Ok(v) = var("ADX_METHOD") {
            engine.adx_method = v.parse().context("ADX_METHOD")?;
        }

        Ok(Self {
            bind_addr: var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            version: var("APP_VERSION").unwrap_or_else(|_| "Unknown".to_string()),
            provider,
            engine,
        })
    }
}
