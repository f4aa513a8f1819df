#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use insightx::error::InsightError;
use insightx::llm::{ChatRequest, ChatTransport, Clock};
use insightx::market::MarketDataProvider;
use insightx::models::{Bar, BarSeries, Period};

/// Daily bars from closes starting 2024-01-15.
pub fn make_bars(closes: &[f64]) -> BarSeries {
    let base = DateTime::parse_from_rfc3339("2024-01-15T00:00:00Z")
        .unwrap()
        .with_timezone(&Utc);

    let bars: Vec<Bar> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            timestamp: base + Duration::days(i as i64),
            open: close - 0.5,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 5_000,
        })
        .collect();

    BarSeries::new(bars)
}

/// Serves one canned series and remembers what was asked for.
pub struct MockProvider {
    pub series: BarSeries,
    pub fail: bool,
    pub requests: Vec<(String, Period)>,
}

impl MockProvider {
    pub fn new(series: BarSeries) -> Self {
        Self {
            series,
            fail: false,
            requests: Vec::new(),
        }
    }

    pub fn failing() -> Self {
        Self {
            series: BarSeries::default(),
            fail: true,
            requests: Vec::new(),
        }
    }
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    async fn fetch_series(&mut self, symbol: &str, period: Period) -> Result<BarSeries> {
        self.requests.push((symbol.to_string(), period));
        if self.fail {
            return Err(anyhow!("connection refused"));
        }
        Ok(self.series.clone())
    }
}

/// Clock that never actually waits.
pub struct NoWaitClock;

#[async_trait]
impl Clock for NoWaitClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, _duration: std::time::Duration) {}
}

/// Always answers with `reply`, keeping a copy of each request.
pub struct EchoTransport {
    pub reply: String,
    pub seen: Arc<Mutex<Vec<ChatRequest>>>,
}

#[async_trait]
impl ChatTransport for EchoTransport {
    async fn complete(&self, request: &ChatRequest) -> Result<String, InsightError> {
        self.seen.lock().unwrap().push(request.clone());
        Ok(self.reply.clone())
    }

    async fn health(&self) -> Result<bool, InsightError> {
        Ok(true)
    }
}

pub const CAMPAIGNS_CSV: &str = "\
Campaign,Budget,Clicks,Conversions,Revenue
Facebook Ads,5000,1200,45,6750
Google Ads,8000,2500,85,12750
Instagram,3000,800,25,3750
LinkedIn,4000,600,30,6000
Twitter,2000,400,8,1200
";
