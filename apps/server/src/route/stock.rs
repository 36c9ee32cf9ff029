use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use market::{Series, Timespan};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct LookupParams {
    query: String,
}

#[derive(Debug, Deserialize)]
pub struct SymbolParams {
    symbol: String,
}

#[derive(Debug, Deserialize)]
pub struct CandleParams {
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
    90
}

const NEWS_LIMIT: usize = 10;

pub async fn symbol_lookup(
    State(state): State<Arc<AppState>>,
    Query(p): Query<LookupParams>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.client.symbol_lookup(&p.query).await?))
}

#[instrument(skip_all, fields(symbol = %p.symbol))]
pub async fn candles(
    State(state): State<Arc<AppState>>,
    Query(p): Query<CandleParams>,
) -> Result<Json<Series>, ApiError> {
    let timespan: Timespan = p.tf.parse()?;
    let series = state.client.candles(&p.symbol, timespan, p.limit).await?;
    debug!(bars = series.len(), "candles served");
    Ok(Json(series))
}

pub async fn news(
    State(state): State<Arc<AppState>>,
    Query(p): Query<SymbolParams>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.client.news(&p.symbol, NEWS_LIMIT).await?))
}

pub async fn last_trade(
    State(state): State<Arc<AppState>>,
    Query(p): Query<SymbolParams>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.client.last_trade(&p.symbol).await?))
}

pub async fn ticker_details(
    State(state): State<Arc<AppState>>,
    Query(p): Query<SymbolParams>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.client.ticker_details(&p.symbol).await?))
}

pub async fn fundamentals(
    State(state): State<Arc<AppState>>,
    Query(p): Query<SymbolParams>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.client.fundamentals(&p.symbol).await?))
}

pub async fn previous_day_bar(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.client.previous_day_bar(&ticker).await?))
}

pub async fn stock_snapshot(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.client.stock_snapshot(&ticker).await?))
}
