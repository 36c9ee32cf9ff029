use std::{convert::Infallible, sync::Arc};

use axum::{
    Json,
    extract::State,
    response::sse::{Event, Sse},
};
use futures_util::stream::{self, Stream};
use serde_json::{Map, Value, json};

use crate::AppState;

/// `(path, summary)` for every public GET route.
pub const ROUTES: &[(&str, &str)] = &[
    ("/", "Liveness message"),
    ("/symbol-lookup", "Search tickers by `query`"),
    ("/candles", "OHLCV bars for `symbol` (`tf`, `limit`)"),
    ("/options", "Option chain for `symbol` filtered by `type` and `days_out`"),
    ("/news", "Recent news for `symbol`"),
    ("/last-trade", "Last trade for `symbol`"),
    ("/ticker-details", "Reference details for `symbol`"),
    ("/fundamentals", "Financials for `symbol`"),
    ("/previous-day-bar/{ticker}", "Previous session bar"),
    ("/stock-snapshot/{ticker}", "Current stock snapshot"),
    ("/all-option-contracts", "Option contract reference list"),
    ("/option-aggregates/{options_ticker}", "Option bars over a date range"),
    ("/option-previous-day-bar/{options_ticker}", "Previous session option bar"),
    ("/option-contract-snapshot/{options_ticker}", "Single option contract snapshot"),
    ("/option-chain-snapshot/{underlying_asset}", "Full option chain snapshot"),
    ("/indicator/full-scan", "Latest indicator values for `symbol`"),
    ("/indicator/full-series", "Per-bar indicator values for `symbol`"),
    ("/sse", "Event stream handshake"),
];

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Market data server is running." }))
}

pub async fn sse() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    Sse::new(stream::once(async {
        Ok::<_, Infallible>(Event::default().data("connected"))
    }))
}

pub async fn openapi(State(state): State<Arc<AppState>>) -> Json<Value> {
    let paths: Map<String, Value> = ROUTES
        .iter()
        .map(|(path, summary)| {
            (
                path.to_string(),
                json!({ "get": { "summary": summary, "responses": { "200": { "description": "OK" } } } }),
            )
        })
        .collect();

    Json(json!({
        "openapi": "3.0.3",
        "info": { "title": "Market data server", "version": state.version },
        "paths": paths,
    }))
}
