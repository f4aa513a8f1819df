pub mod historical;
pub mod symbols;
pub mod yahoo;

pub use historical::HistoricalProvider;
pub use symbols::normalize_symbol;
pub use yahoo::YahooClient;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{BarSeries, Period};

/// Source of daily price/volume bars.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn fetch_series(&mut self, symbol: &str, period: Period) -> Result<BarSeries>;
}
