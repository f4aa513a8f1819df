use super::stats::{pct_change, sample_std_dev};

/// Annualized volatility from the most recent `window` daily returns.
///
/// Returns the sample standard deviation of those returns scaled by
/// `sqrt(periods_per_year)`. Absent when fewer than `window` returns exist
/// (so at least `window + 1` closes are needed) or when `window < 2`.
pub fn volatility(closes: &[f64], window: usize, periods_per_year: f64) -> Option<f64> {
    if window < 2 {
        return None;
    }
    let returns = pct_change(closes);
    if returns.len() < window {
        return None;
    }
    let recent = &returns[returns.len() - window..];
    let sd = sample_std_dev(recent)?;
    Some(sd * periods_per_year.sqrt())
}
