use std::str::FromStr;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::America::New_York;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::series::{AggregatesResponse, Series};

pub const DEFAULT_BASE_URL: &str = "https://api.polygon.io";
pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(10);
const MAX_LIMIT: usize = 50_000;

/// Connection settings for the provider, fixed at process startup.
#[derive(Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: StdDuration,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Reads POLYGON_API_KEY (required), POLYGON_BASE_URL and
    /// POLYGON_TIMEOUT_SECS.
    pub fn from_env() -> Result<Self> {
        use std::env;

        let api_key = env::var("POLYGON_API_KEY")
            .map_err(|_| Error::MissingEnvVar("POLYGON_API_KEY".to_string()))?;
        let mut config = Self::new(api_key);

        if let Ok(base_url) = env::var("POLYGON_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(secs) = env::var("POLYGON_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                Error::InvalidParameter(format!("POLYGON_TIMEOUT_SECS `{secs}` is not a number"))
            })?;
            config.timeout = StdDuration::from_secs(secs);
        }
        Ok(config)
    }
}

#[derive(Clone)]
pub struct PolygonClient {
    client: Client,
    base_api: String,
}

impl PolygonClient {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| Error::InvalidParameter("api key is not a valid header value".into()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(Error::Request)?;

        Ok(Self {
            client,
            base_api: config.base_url,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(ProviderConfig::from_env()?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_api.trim_end_matches('/'), path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let res = self.client.get(self.url(path)).query(query).send().await?;

        let status = res.status();
        if !status.is_success() {
            let message = res.text().await.unwrap_or_default();
            return Err(Error::Status { status, message });
        }

        let body = res.bytes().await?;
        debug!(path, bytes = body.len(), "provider response");
        Ok(serde_json::from_slice(&body)?)
    }

    /// The most recent `limit` bars of `timespan` granularity, ascending.
    #[instrument(skip(self))]
    pub async fn candles(&self, symbol: &str, timespan: Timespan, limit: usize) -> Result<Series> {
        if limit == 0 || limit > MAX_LIMIT {
            return Err(Error::InvalidParameter(format!(
                "limit {limit} (expected 1..={MAX_LIMIT})"
            )));
        }

        let symbol = normalize(symbol);
        let floor = DateTime::<Utc>::UNIX_EPOCH.date_naive();
        let to = Utc::now().date_naive();
        let from = to
            .checked_sub_signed(timespan.lookback(limit))
            .filter(|d| *d > floor)
            .unwrap_or(floor);

        let path = format!(
            "/v2/aggs/ticker/{}/range/1/{}/{}/{}",
            symbol,
            timespan.as_str(),
            from,
            to
        );

        let res: AggregatesResponse = self
            .get(
                &path,
                &[
                    ("adjusted", "true".to_string()),
                    ("sort", "desc".to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        let series = Series::from_response(symbol, res)?;
        debug!(bars = series.len(), "fetched candles");
        Ok(series)
    }

    #[instrument(skip(self))]
    pub async fn symbol_lookup(&self, query: &str) -> Result<Value> {
        self.get("/v3/reference/tickers", &[("search", query.to_string())])
            .await
    }

    /// Option contracts of one type on `symbol` expiring within `days_out`
    /// days of today's New York date.
    #[instrument(skip(self))]
    pub async fn options_chain(
        &self,
        symbol: &str,
        option_type: OptionType,
        days_out: u32,
    ) -> Result<Vec<Value>> {
        let today = Utc::now().with_timezone(&New_York).date_naive();
        let latest = today
            .checked_add_signed(Duration::days(days_out.into()))
            .unwrap_or(NaiveDate::MAX);

        let page: SnapshotPage = self
            .get(
                &format!("/v3/snapshot/options/{}", normalize(symbol)),
                &[
                    ("contract_type", option_type.as_str().to_string()),
                    ("expiration_date.gte", today.to_string()),
                    ("expiration_date.lte", latest.to_string()),
                    ("limit", "250".to_string()),
                ],
            )
            .await?;

        Ok(filter_chain(page.results, option_type, today, latest))
    }

    #[instrument(skip(self))]
    pub async fn news(&self, symbol: &str, limit: usize) -> Result<Value> {
        self.get(
            "/v2/reference/news",
            &[("ticker", normalize(symbol)), ("limit", limit.to_string())],
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn last_trade(&self, symbol: &str) -> Result<Value> {
        self.get(&format!("/v2/last/trade/{}", normalize(symbol)), &[])
            .await
    }

    #[instrument(skip(self))]
    pub async fn ticker_details(&self, symbol: &str) -> Result<Value> {
        self.get(&format!("/v3/reference/tickers/{}", normalize(symbol)), &[])
            .await
    }

    #[instrument(skip(self))]
    pub async fn fundamentals(&self, symbol: &str) -> Result<Value> {
        self.get("/vX/reference/financials", &[("ticker", normalize(symbol))])
            .await
    }

    #[instrument(skip(self))]
    pub async fn previous_day_bar(&self, ticker: &str) -> Result<Value> {
        self.get(&format!("/v2/aggs/ticker/{}/prev", normalize(ticker)), &[])
            .await
    }

    #[instrument(skip(self))]
    pub async fn stock_snapshot(&self, ticker: &str) -> Result<Value> {
        self.get(
            &format!(
                "/v2/snapshot/locale/us/markets/stocks/tickers/{}",
                normalize(ticker)
            ),
            &[],
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn all_option_contracts(&self) -> Result<Value> {
        self.get("/v3/reference/options/contracts", &[]).await
    }

    #[instrument(skip(self))]
    pub async fn option_aggregates(
        &self,
        options_ticker: &str,
        multiplier: u32,
        timespan: Timespan,
        from: &str,
        to: &str,
    ) -> Result<Value> {
        if multiplier == 0 {
            return Err(Error::InvalidParameter("multiplier must be at least 1".into()));
        }
        let (from, to) = (parse_date(from)?, parse_date(to)?);

        self.get(
            &format!(
                "/v2/aggs/ticker/{}/range/{}/{}/{}/{}",
                option_ticker(options_ticker),
                multiplier,
                timespan.as_str(),
                from,
                to
            ),
            &[],
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn option_previous_day_bar(&self, options_ticker: &str) -> Result<Value> {
        self.get(
            &format!("/v2/aggs/ticker/{}/prev", option_ticker(options_ticker)),
            &[],
        )
        .await
    }

    /// Snapshot of a single contract. The underlying is read from the OCC
    /// ticker, e.g. `O:AAPL250117C00150000` -> `AAPL`.
    #[instrument(skip(self))]
    pub async fn option_contract_snapshot(&self, options_ticker: &str) -> Result<Value> {
        let ticker = option_ticker(options_ticker);
        let underlying = underlying_of(&ticker)?;

        self.get(
            &format!("/v3/snapshot/options/{underlying}/{ticker}"),
            &[],
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn option_chain_snapshot(&self, underlying: &str) -> Result<Value> {
        self.get(
            &format!("/v3/snapshot/options/{}", normalize(underlying)),
            &[],
        )
        .await
    }
}

fn normalize(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

fn option_ticker(ticker: &str) -> String {
    let ticker = normalize(ticker);
    if ticker.starts_with("O:") {
        ticker
    } else {
        format!("O:{ticker}")
    }
}

fn underlying_of(options_ticker: &str) -> Result<String> {
    let root: String = options_ticker
        .trim_start_matches("O:")
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();

    if root.is_empty() {
        return Err(Error::InvalidParameter(format!(
            "`{options_ticker}` is not an OCC option ticker"
        )));
    }
    Ok(root)
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| Error::InvalidParameter(format!("date `{s}` (expected YYYY-MM-DD)")))
}

#[derive(Debug, Deserialize)]
struct SnapshotPage {
    #[serde(default)]
    results: Vec<Value>,
}

/// Keep contracts of `option_type` expiring in `[from, to]`. Entries with no
/// readable expiration are dropped.
fn filter_chain(
    contracts: Vec<Value>,
    option_type: OptionType,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<Value> {
    contracts
        .into_iter()
        .filter(|c| {
            let details = &c["details"];
            let type_ok = details["contract_type"].as_str() == Some(option_type.as_str());
            let expiry = details["expiration_date"]
                .as_str()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
            type_ok && expiry.is_some_and(|d| d >= from && d <= to)
        })
        .collect()
}

//
// Match Polygon aggregate timespans
// https://polygon.io/docs/stocks/get_v2_aggs_ticker__stocksticker__range__multiplier___timespan___from___to
//
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timespan {
    Minute,
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Timespan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timespan::Minute => "minute",
            Timespan::Hour => "hour",
            Timespan::Day => "day",
            Timespan::Week => "week",
            Timespan::Month => "month",
            Timespan::Quarter => "quarter",
            Timespan::Year => "year",
        }
    }

    fn unit(&self) -> Duration {
        match self {
            Timespan::Minute => Duration::minutes(1),
            Timespan::Hour => Duration::hours(1),
            Timespan::Day => Duration::days(1),
            Timespan::Week => Duration::weeks(1),
            Timespan::Month => Duration::days(31),
            Timespan::Quarter => Duration::days(92),
            Timespan::Year => Duration::days(366),
        }
    }

    /// Calendar span wide enough to hold `limit` bars once weekends and
    /// holidays are skipped.
    pub fn lookback(&self, limit: usize) -> Duration {
        let bars = i32::try_from(limit.min(MAX_LIMIT)).unwrap_or(i32::MAX);
        self.unit() * bars.saturating_mul(2) + Duration::days(7)
    }
}

impl FromStr for Timespan {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_ascii_lowercase();
        match s.strip_prefix('1').unwrap_or(s.as_str()) {
            "minute" | "min" => Ok(Timespan::Minute),
            "hour" => Ok(Timespan::Hour),
            "day" => Ok(Timespan::Day),
            "week" => Ok(Timespan::Week),
            "month" => Ok(Timespan::Month),
            "quarter" => Ok(Timespan::Quarter),
            "year" => Ok(Timespan::Year),
            other => Err(Error::InvalidParameter(format!("timespan `{other}`"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptionType {
    #[default]
    Call,
    Put,
}

impl OptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

impl FromStr for OptionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "calls" => Ok(OptionType::Call),
            "put" | "puts" => Ok(OptionType::Put),
            other => Err(Error::InvalidParameter(format!(
                "option type `{other}` (expected call|put)"
            ))),
        }
    }
}
