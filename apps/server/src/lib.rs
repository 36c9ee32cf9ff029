use market::PolygonClient;
use market::indicators::Engine;

pub mod config;
pub mod error;
pub mod route;

pub use route::router;

/// Shared, read-only request context.
pub struct AppState {
    pub client: PolygonClient,
    pub engine: Engine,
    pub version: String,
}
