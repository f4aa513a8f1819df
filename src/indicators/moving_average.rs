use serde::{Deserialize, Serialize};

use super::IndicatorSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaKind {
    Simple,
    Exponential,
}

pub fn moving_average(values: &[f64], window: usize, kind: MaKind) -> IndicatorSeries {
    match kind {
        MaKind::Simple => sma(values, window),
        MaKind::Exponential => ema(values, window),
    }
}

/// Trailing arithmetic mean. The first `window - 1` points are absent.
pub fn sma(values: &[f64], window: usize) -> IndicatorSeries {
    if window == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let sum: f64 = values[i + 1 - window..=i].iter().sum();
            Some(sum / window as f64)
        })
        .collect()
}

/// Span-weighted exponential mean with bias-adjusted weights.
///
/// `alpha = 2 / (window + 1)`; point `t` is
/// `sum((1 - alpha)^i * x[t - i]) / sum((1 - alpha)^i)` over all prior
/// points, so the series is defined from the first value onward.
pub fn ema(values: &[f64], window: usize) -> IndicatorSeries {
    if window == 0 {
        return vec![None; values.len()];
    }

    let alpha = 2.0 / (window as f64 + 1.0);
    let decay = 1.0 - alpha;

    let mut num = 0.0;
    let mut den = 0.0;
    values
        .iter()
        .map(|&v| {
            num = v + decay * num;
            den = 1.0 + decay * den;
            Some(num / den)
        })
        .collect()
}

/// EMA over a series that may contain absent points. Absent points are
/// skipped for weighting and stay absent in the output.
pub fn ema_of(series: &IndicatorSeries, window: usize) -> IndicatorSeries {
    if window == 0 {
        return vec![None; series.len()];
    }

    let alpha = 2.0 / (window as f64 + 1.0);
    let decay = 1.0 - alpha;

    let mut num = 0.0;
    let mut den = 0.0;
    series
        .iter()
        .map(|v| {
            let v = (*v)?;
            num = v + decay * num;
            den = 1.0 + decay * den;
            Some(num / den)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_window_three() {
        let out = moving_average(&[10.0, 20.0, 30.0, 40.0], 3, MaKind::Simple);
        assert_eq!(out, vec![None, None, Some(20.0), Some(30.0)]);
    }

    #[test]
    fn sma_shorter_than_window_is_all_absent() {
        let out = sma(&[1.0, 2.0], 5);
        assert!(out.iter().all(|v| v.is_none()));
    }

    #[test]
    fn sma_zero_window_is_absent() {
        assert_eq!(sma(&[1.0, 2.0], 0), vec![None, None]);
    }

    #[test]
    fn ema_defined_from_first_point() {
        let out = ema(&[10.0, 20.0, 30.0], 3);
        // alpha = 0.5, decay = 0.5
        // t0: 10
        // t1: (20 + 0.5*10) / 1.5 = 16.666..
        // t2: (30 + 0.5*25) / 1.75 = 24.2857..
        assert!((out[0].unwrap() - 10.0).abs() < 1e-9);
        assert!((out[1].unwrap() - 50.0 / 3.0).abs() < 1e-9);
        assert!((out[2].unwrap() - 42.5 / 1.75).abs() < 1e-9);
    }

    #[test]
    fn ema_of_constant_is_constant() {
        let out = ema(&[5.0; 40], 12);
        assert!(out.iter().all(|v| (v.unwrap() - 5.0).abs() < 1e-9));
    }

    #[test]
    fn ema_of_keeps_absent_points() {
        let series = vec![None, Some(2.0), Some(4.0)];
        let out = ema_of(&series, 3);
        assert_eq!(out[0], None);
        assert!((out[1].unwrap() - 2.0).abs() < 1e-9);
        assert!((out[2].unwrap() - 5.0 / 1.5).abs() < 1e-9);
    }

    #[test]
    fn ema_zero_window_is_absent() {
        assert_eq!(
            moving_average(&[10.0, 20.0, 30.0], 0, MaKind::Exponential),
            vec![None, None, None]
        );
        assert_eq!(ema_of(&vec![Some(1.0), None], 0), vec![None, None]);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(sma(&[], 3).is_empty());
        assert!(ema(&[], 3).is_empty());
    }
}
