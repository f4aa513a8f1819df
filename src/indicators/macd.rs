use serde::{Deserialize, Serialize};

use super::moving_average::{ema, ema_of};
use super::{latest, IndicatorSeries};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Macd {
    pub macd: IndicatorSeries,
    pub signal: IndicatorSeries,
    pub histogram: IndicatorSeries,
}

impl Macd {
    pub fn latest_macd(&self) -> Option<f64> {
        latest(&self.macd)
    }

    pub fn latest_signal(&self) -> Option<f64> {
        latest(&self.signal)
    }

    pub fn latest_histogram(&self) -> Option<f64> {
        latest(&self.histogram)
    }
}

/// MACD line = EMA(fast) - EMA(slow); signal = EMA(macd, signal);
/// histogram = macd - signal. All three are aligned with `closes`.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Macd {
    let fast_ema = ema(closes, fast);
    let slow_ema = ema(closes, slow);

    let macd_line: IndicatorSeries = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();

    let signal_line = ema_of(&macd_line, signal);

    let histogram = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| Some((*m)? - (*s)?))
        .collect();

    Macd {
        macd: macd_line,
        signal: signal_line,
        histogram,
    }
}
