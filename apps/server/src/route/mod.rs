mod indicator;
mod meta;
mod options;
mod stock;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};

use crate::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(meta::root))
        // reference + stock data
        .route("/symbol-lookup", get(stock::symbol_lookup))
        .route("/candles", get(stock::candles))
        .route("/news", get(stock::news))
        .route("/last-trade", get(stock::last_trade))
        .route("/ticker-details", get(stock::ticker_details))
        .route("/fundamentals", get(stock::fundamentals))
        .route("/previous-day-bar/:ticker", get(stock::previous_day_bar))
        .route("/stock-snapshot/:ticker", get(stock::stock_snapshot))
        // options
        .route("/options", get(options::options))
        .route("/all-option-contracts", get(options::all_option_contracts))
        .route("/option-aggregates/:ticker", get(options::option_aggregates))
        .route(
            "/option-previous-day-bar/:ticker",
            get(options::option_previous_day_bar),
        )
        .route(
            "/option-contract-snapshot/:ticker",
            get(options::option_contract_snapshot),
        )
        .route(
            "/option-chain-snapshot/:underlying",
            get(options::option_chain_snapshot),
        )
        // indicators
        .route("/indicator/full-scan", get(indicator::full_scan))
        .route("/indicator/full-series", get(indicator::full_series))
        // meta
        .route("/sse", get(meta::sse))
        .route("/openapi.json", get(meta::openapi))
        .layer(cors)
        .with_state(state)
}
