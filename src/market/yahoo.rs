use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::market::MarketDataProvider;
use crate::models::{Bar, BarSeries, Period};

const BASE_URL: &str = "https://query1.finance.yahoo.com";
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(250);
const USER_AGENT: &str = "Mozilla/5.0 (compatible; insightx/0.1)";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Daily bars from the Yahoo Finance chart endpoint.
pub struct YahooClient {
    client: Client,
    base_url: String,
    last_request: Option<Instant>,
}

impl YahooClient {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            last_request: None,
        }
    }

    async fn rate_limit(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < MIN_REQUEST_INTERVAL {
                tokio::time::sleep(MIN_REQUEST_INTERVAL - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }

    pub async fn fetch_daily(&mut self, symbol: &str, period: Period) -> Result<BarSeries> {
        self.rate_limit().await;

        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        debug!("GET {} range={}", url, period);

        let resp = self
            .client
            .get(&url)
            .query(&[("range", period.as_str()), ("interval", "1d")])
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .context("Failed to fetch chart")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Yahoo chart error {}: {}", status, body);
        }

        let body = resp.text().await.context("Failed to read chart response")?;
        let bars = parse_chart(&body)?;
        debug!("Parsed {} bars for {}", bars.len(), symbol);

        Ok(BarSeries::new(bars))
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn a chart response body into bars. Points with any missing OHLC
/// field are dropped (the endpoint emits nulls for halted sessions).
pub fn parse_chart(body: &str) -> Result<Vec<Bar>> {
    let data: ChartResponse = serde_json::from_str(body).context("Failed to parse chart response")?;

    if let Some(err) = data.chart.error {
        anyhow::bail!("{}: {}", err.code, err.description);
    }

    let result = data
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .context("Chart response has no result")?;

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .context("Chart response has no quote block")?;

    let at = |v: &Vec<Option<f64>>, i: usize| v.get(i).copied().flatten();

    let bars = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            Some(Bar {
                timestamp: DateTime::from_timestamp(ts, 0)?,
                open: at(&quote.open, i)?,
                high: at(&quote.high, i)?,
                low: at(&quote.low, i)?,
                close: at(&quote.close, i)?,
                volume: at(&quote.volume, i).unwrap_or(0.0).max(0.0) as u64,
            })
        })
        .collect();

    Ok(bars)
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    async fn fetch_series(&mut self, symbol: &str, period: Period) -> Result<BarSeries> {
        self.fetch_daily(symbol, period).await
    }
}
