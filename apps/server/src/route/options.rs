use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use market::{OptionType, Timespan};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ChainParams {
    symbol: String,
    #[serde(rename = "type", default = "default_type")]
    option_type: String,
    #[serde(default = "default_days_out")]
    days_out: u32,
}

fn default_type() -> String {
    "call".to_string()
}

fn default_days_out() -> u32 {
    30
}

#[derive(Debug, Deserialize)]
pub struct AggregateParams {
    multiplier: u32,
    timespan: String,
    from_date: String,
    to_date: String,
}

#[instrument(skip_all, fields(symbol = %p.symbol))]
pub async fn options(
    State(state): State<Arc<AppState>>,
    Query(p): Query<ChainParams>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let option_type: OptionType = p.option_type.parse()?;
    let contracts = state
        .client
        .options_chain(&p.symbol, option_type, p.days_out)
        .await?;
    info!(contracts = contracts.len(), "options chain served");
    Ok(Json(contracts))
}

pub async fn all_option_contracts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.client.all_option_contracts().await?))
}

pub async fn option_aggregates(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
    Query(p): Query<AggregateParams>,
) -> Result<Json<Value>, ApiError> {
    let timespan: Timespan = p.timespan.parse()?;
    let res = state
        .client
        .option_aggregates(&ticker, p.multiplier, timespan, &p.from_date, &p.to_date)
        .await?;
    Ok(Json(res))
}

pub async fn option_previous_day_bar(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.client.option_previous_day_bar(&ticker).await?))
}

/// An unknown or expired contract comes back from the provider as a client
/// error and is answered with 400.
pub async fn option_contract_snapshot(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.client.option_contract_snapshot(&ticker).await?))
}

pub async fn option_chain_snapshot(
    State(state): State<Arc<AppState>>,
    Path(underlying): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.client.option_chain_snapshot(&underlying).await?))
}
