use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Wraps Vec<Bar> with the column accessors the indicator code reads from.
/// A series is never mutated after a provider hands it out.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Bars are sorted oldest-first and deduplicated by timestamp so the
    /// ordering key is strictly increasing.
    pub fn new(mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        bars.dedup_by_key(|b| b.timestamp);
        Self { bars }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn max_close(&self) -> Option<f64> {
        self.bars.iter().map(|b| b.close).reduce(f64::max)
    }

    pub fn min_close(&self) -> Option<f64> {
        self.bars.iter().map(|b| b.close).reduce(f64::min)
    }

    pub fn avg_volume(&self) -> Option<f64> {
        if self.bars.is_empty() {
            return None;
        }
        let total: f64 = self.bars.iter().map(|b| b.volume as f64).sum();
        Some(total / self.bars.len() as f64)
    }

    /// Percent change from the first close to the last close.
    pub fn price_change_pct(&self) -> Option<f64> {
        let first = self.first()?.close;
        let last = self.last()?.close;
        Some((last / first - 1.0) * 100.0)
    }
}

impl IntoIterator for BarSeries {
    type Item = Bar;
    type IntoIter = std::vec::IntoIter<Bar>;
    fn into_iter(self) -> Self::IntoIter {
        self.bars.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::make_bars;

    #[test]
    fn series_sorts_and_dedups_by_timestamp() {
        let s = make_bars(&[10.0, 20.0, 30.0]);
        let mut raw: Vec<Bar> = s.clone().into_iter().collect();
        raw.reverse();
        raw.push(raw[0].clone());

        let rebuilt = BarSeries::new(raw);
        assert_eq!(rebuilt.len(), 3);
        assert_eq!(rebuilt.closes(), vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn series_column_helpers() {
        let s = make_bars(&[100.0, 120.0, 90.0, 110.0]);
        assert!((s.max_close().unwrap() - 120.0).abs() < 1e-9);
        assert!((s.min_close().unwrap() - 90.0).abs() < 1e-9);
        assert!((s.price_change_pct().unwrap() - 10.0).abs() < 1e-9);
        assert!((s.avg_volume().unwrap() - 1_000.0).abs() < 1e-9);
    }

    #[test]
    fn empty_series_has_no_stats() {
        let s = BarSeries::default();
        assert!(s.is_empty());
        assert!(s.max_close().is_none());
        assert!(s.avg_volume().is_none());
        assert!(s.price_change_pct().is_none());
    }
}
