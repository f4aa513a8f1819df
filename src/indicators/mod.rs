//! Pure indicator math over close-price slices.
//!
//! Every per-point indicator returns one `Option<f64>` per input point;
//! `None` marks points without enough history. Nothing here divides by a
//! zero it has not checked for first.

pub mod macd;
pub mod moving_average;
pub mod rsi;
pub mod stats;
pub mod volatility;

pub use macd::{macd, Macd};
pub use moving_average::{ema, moving_average, sma, MaKind};
pub use rsi::rsi;
pub use volatility::volatility;

pub type IndicatorSeries = Vec<Option<f64>>;

/// Value at the last point, if that point is defined.
pub fn latest(series: &IndicatorSeries) -> Option<f64> {
    series.last().copied().flatten()
}
