use crate::errors::{EngineError, EngineResult};
use chrono::NaiveDate;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;

/// Latest closing trade for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    /// Trading session the close belongs to, when the provider reports it.
    pub session: Option<NaiveDate>,
}

/// Anything that can resolve a ticker to a spot price.
/// The pricer only ever sees the resolved number.
#[allow(async_fn_in_trait)]
pub trait QuoteSource {
    fn name(&self) -> &'static str;

    async fn latest_close(&self, symbol: &str) -> EngineResult<Quote>;
}

/// Fixed price, no network. Used for SPOT_PRICE overrides and tests.
pub struct StaticQuoteSource {
    price: f64,
}

impl StaticQuoteSource {
    pub fn new(price: f64) -> Self {
        Self { price }
    }
}

impl QuoteSource for StaticQuoteSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn latest_close(&self, symbol: &str) -> EngineResult<Quote> {
        validate_price(self.price)?;
        Ok(Quote {
            symbol: symbol.to_string(),
            price: self.price,
            session: None,
        })
    }
}

/// Yahoo Finance chart API client. One request per call, no retries.
pub struct YahooQuoteSource {
    client: Client,
    base_url: String,
}

impl YahooQuoteSource {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            base_url: base_url.to_string(),
        }
    }
}

impl QuoteSource for YahooQuoteSource {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn latest_close(&self, symbol: &str) -> EngineResult<Quote> {
        let url = chart_url(&self.base_url, symbol)?;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| EngineError::QuoteSource(format!("request failed: {e}")))?;

        let status = resp.status();
        let body = resp.text().await?;
        read_chart_response(symbol, status, &body)
    }
}

/// `{base}/v8/finance/chart/{symbol}?range=1d&interval=1d`, with the symbol
/// percent-encoded as a single path segment.
fn chart_url(base_url: &str, symbol: &str) -> EngineResult<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| EngineError::QuoteSource(format!("base url {base_url}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| EngineError::QuoteSource(format!("base url {base_url}: cannot hold a path")))?
        .pop_if_empty()
        .extend(["v8", "finance", "chart", symbol]);
    url.query_pairs_mut()
        .append_pair("range", "1d")
        .append_pair("interval", "1d");
    Ok(url)
}

/// Map one HTTP exchange to a quote. Non-2xx keeps the provider's own error
/// message when the body carries one.
fn read_chart_response(symbol: &str, status: StatusCode, body: &str) -> EngineResult<Quote> {
    if status.is_success() {
        return parse_chart(symbol, body);
    }
    // Yahoo reports unknown symbols as 404 with a JSON error body
    Err(match parse_chart(symbol, body) {
        Err(e @ EngineError::QuoteSource(_)) => e,
        _ => EngineError::QuoteSource(format!("HTTP {status}: {body}")),
    })
}

// Chart API response format (trimmed):
// {
//   "chart": {
//     "result": [
//       {
//         "meta": { "symbol": "WMT", "regularMarketPrice": 158.67, ... },
//         "timestamp": [1700836200],
//         "indicators": { "quote": [ { "close": [158.67], ... } ] }
//       }
//     ],
//     "error": null
//   }
// }

#[derive(serde::Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(serde::Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(serde::Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(serde::Deserialize)]
struct ChartResult {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    symbol: Option<String>,
    regular_market_price: Option<f64>,
    regular_market_time: Option<i64>,
}

#[derive(serde::Deserialize)]
struct Indicators {
    quote: Option<Vec<QuoteSeries>>,
}

#[derive(serde::Deserialize)]
struct QuoteSeries {
    close: Option<Vec<Option<f64>>>,
}

/// Pull the most recent close out of a chart payload.
/// Falls back to meta.regularMarketPrice when the close series is empty.
fn parse_chart(requested: &str, body: &str) -> EngineResult<Quote> {
    let data: ChartResponse = serde_json::from_str(body)?;

    if let Some(err) = data.chart.error {
        return Err(EngineError::QuoteSource(format!(
            "{requested}: {} ({})",
            err.description.unwrap_or_default(),
            err.code.unwrap_or_default()
        )));
    }

    let result = data
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.swap_remove(0)) })
        .ok_or_else(|| EngineError::QuoteSource(format!("{requested}: empty chart result")))?;

    let closes: Vec<Option<f64>> = result
        .indicators
        .and_then(|i| i.quote)
        .and_then(|mut q| if q.is_empty() { None } else { q.swap_remove(0).close })
        .unwrap_or_default();
    let timestamps = result.timestamp.unwrap_or_default();

    // Last non-null close, with the timestamp at the same index
    let last_close = closes
        .iter()
        .enumerate()
        .rev()
        .find_map(|(i, c)| c.map(|price| (price, timestamps.get(i).copied())));

    let meta = result.meta;
    let (price, ts) = match last_close {
        Some(found) => found,
        None => {
            let meta = meta
                .as_ref()
                .ok_or_else(|| EngineError::QuoteSource(format!("{requested}: no closes in response")))?;
            let price = meta
                .regular_market_price
                .ok_or_else(|| EngineError::QuoteSource(format!("{requested}: no closes in response")))?;
            (price, meta.regular_market_time)
        }
    };

    validate_price(price)?;

    let symbol = meta
        .and_then(|m| m.symbol)
        .unwrap_or_else(|| requested.to_string());
    let session = ts
        .and_then(|t| chrono::DateTime::from_timestamp(t, 0))
        .map(|dt| dt.date_naive());

    Ok(Quote { symbol, price, session })
}

fn validate_price(price: f64) -> EngineResult<()> {
    if price <= 0.0 || !price.is_finite() {
        return Err(EngineError::QuoteSource(format!("invalid price: {price}")));
    }
    Ok(())
}
