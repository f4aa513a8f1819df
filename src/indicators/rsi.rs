use super::IndicatorSeries;

/// Relative Strength Index from simple rolling means of gains and losses.
///
/// Point `i` averages the `window` price deltas ending at `i`, so the first
/// `window` points are absent. A window with no losses saturates at 100.
pub fn rsi(closes: &[f64], window: usize) -> IndicatorSeries {
    let mut out = vec![None; closes.len()];
    if window == 0 || closes.len() <= window {
        return out;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    for i in window..closes.len() {
        // deltas[k] is the move into close k + 1
        let slice = &deltas[i - window..i];
        let gain = slice.iter().map(|d| d.max(0.0)).sum::<f64>() / window as f64;
        let loss = slice.iter().map(|d| (-d).max(0.0)).sum::<f64>() / window as f64;
        out[i] = Some(rsi_from_means(gain, loss));
    }
    out
}

fn rsi_from_means(mean_gain: f64, mean_loss: f64) -> f64 {
    if mean_loss == 0.0 {
        return 100.0;
    }
    let rs = mean_gain / mean_loss;
    100.0 - 100.0 / (1.0 + rs)
}
