use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use market::Timespan;
use market::indicators::{FullSeriesReport, IndicatorReport};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ScanParams {
    symbol: String,
    #[serde(default = "default_tf")]
    tf: String,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_tf() -> String {
    "day".to_string()
}

fn default_limit() -> usize {
    100
}

/// RSI, MACD, Bollinger Bands, VWAP, CMF, OBV, SMA50/200 with golden/death
/// cross and ADX, latest bar only.
#[instrument(skip_all, fields(symbol = %p.symbol, tf = %p.tf, limit = p.limit))]
pub async fn full_scan(
    State(state): State<Arc<AppState>>,
    Query(p): Query<ScanParams>,
) -> Result<Json<IndicatorReport>, ApiError> {
    let timespan: Timespan = p.tf.parse()?;
    let series = state.client.candles(&p.symbol, timespan, p.limit).await?;

    let report = state.engine.report(&series)?;
    info!(bars = series.len(), trend = ?report.trend_signal, "full scan computed");
    Ok(Json(report))
}

/// Same indicators for every bar, unrounded.
#[instrument(skip_all, fields(symbol = %p.symbol, tf = %p.tf, limit = p.limit))]
pub async fn full_series(
    State(state): State<Arc<AppState>>,
    Query(p): Query<ScanParams>,
) -> Result<Json<FullSeriesReport>, ApiError> {
    let timespan: Timespan = p.tf.parse()?;
    let series = state.client.candles(&p.symbol, timespan, p.limit).await?;

    let report = state.engine.full_series(&series)?;
    info!(bars = report.bars.len(), "full series computed");
    Ok(Json(report))
}
