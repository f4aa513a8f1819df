use chrono::{DateTime, Duration, Utc};

use crate::config::Config;
use crate::models::{Bar, BarSeries, Campaign};

fn base_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-15T00:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// Daily bars from closes. Each bar opens one below its close.
pub fn make_bars(closes: &[f64]) -> BarSeries {
    let base = base_time();
    let bars: Vec<Bar> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = close - 1.0;
            Bar {
                timestamp: base + Duration::days(i as i64),
                open,
                high: close + 1.0,
                low: open - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect();

    BarSeries::new(bars)
}

/// n closes rising by `step` from `start`.
pub fn make_rising(n: usize, start: f64, step: f64) -> BarSeries {
    let closes: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
    make_bars(&closes)
}

/// n closes falling by `step` from `start`.
pub fn make_falling(n: usize, start: f64, step: f64) -> BarSeries {
    let closes: Vec<f64> = (0..n).map(|i| start - i as f64 * step).collect();
    make_bars(&closes)
}

/// Six channels with distinct ROI, conversion rate and CPC.
pub fn sample_campaigns() -> Vec<Campaign> {
    vec![
        Campaign::new("Facebook Ads", 5000.0, 1200.0, 45.0, 6750.0),
        Campaign::new("Google Ads", 8000.0, 2500.0, 85.0, 12750.0),
        Campaign::new("Instagram", 3000.0, 800.0, 25.0, 3750.0),
        Campaign::new("LinkedIn", 4000.0, 600.0, 30.0, 6000.0),
        Campaign::new("Twitter", 2000.0, 400.0, 8.0, 1200.0),
        Campaign::new("Email", 1000.0, 900.0, 60.0, 4500.0),
    ]
}

/// Defaults with no API key and a quiet log level.
pub fn default_test_config() -> Config {
    Config {
        log_level: "WARN".to_string(),
        ..Config::default()
    }
}
