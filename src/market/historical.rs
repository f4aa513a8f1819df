use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

use crate::data;
use crate::market::MarketDataProvider;
use crate::models::{Bar, BarSeries, Period};

/// A provider that serves pre-loaded bars. The requested period is applied
/// relative to the newest loaded bar, so replays are deterministic.
#[derive(Debug, Default)]
pub struct HistoricalProvider {
    data: HashMap<String, Vec<Bar>>,
}

impl HistoricalProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bars are sorted oldest-first on load.
    pub fn load(&mut self, symbol: &str, bars: Vec<Bar>) {
        let series = BarSeries::new(bars);
        self.data
            .insert(symbol.trim().to_uppercase(), series.into_iter().collect());
    }

    pub fn load_csv<P: AsRef<Path>>(&mut self, symbol: &str, path: P) -> Result<usize> {
        let bars = data::load_bars_csv(path)?;
        let n = bars.len();
        self.load(symbol, bars);
        Ok(n)
    }

    pub fn symbols(&self) -> Vec<String> {
        let mut out: Vec<String> = self.data.keys().cloned().collect();
        out.sort();
        out
    }

    fn window(&self, symbol: &str, period: Period) -> BarSeries {
        let Some(all) = self.data.get(&symbol.trim().to_uppercase()) else {
            return BarSeries::default();
        };
        let Some(last) = all.last() else {
            return BarSeries::default();
        };

        let start = match period.start_from(last.timestamp) {
            Some(s) => all.partition_point(|b| b.timestamp < s),
            None => 0,
        };
        BarSeries::new(all[start..].to_vec())
    }
}

#[async_trait]
impl MarketDataProvider for HistoricalProvider {
    async fn fetch_series(&mut self, symbol: &str, period: Period) -> Result<BarSeries> {
        Ok(self.window(symbol, period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::make_bars;

    #[tokio::test]
    async fn applies_period_relative_to_last_bar() {
        // 100 daily bars
        let closes: Vec<f64> = (0..100).map(|i| 100.0 + i as f64).collect();
        let bars: Vec<Bar> = make_bars(&closes).into_iter().collect();

        let mut p = HistoricalProvider::new();
        p.load("aapl", bars);

        let all = p.fetch_series("AAPL", Period::Max).await.unwrap();
        assert_eq!(all.len(), 100);

        let week = p.fetch_series("AAPL", Period::D5).await.unwrap();
        assert_eq!(week.len(), 6);
        assert!((week.last().unwrap().close - 199.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn unknown_symbol_is_empty() {
        let mut p = HistoricalProvider::new();
        let s = p.fetch_series("NOPE", Period::Y1).await.unwrap();
        assert!(s.is_empty());
        assert!(p.symbols().is_empty());
    }
}
