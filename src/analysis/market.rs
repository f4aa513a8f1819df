use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::IndicatorConfig;
use crate::error::{AnalysisError, Result};
use crate::indicators::{self, latest, IndicatorSeries, MaKind, Macd};
use crate::market::{normalize_symbol, MarketDataProvider};
use crate::models::{BarSeries, MacdBias, Period, TrendAssessment, TrendLabel, VolatilityLevel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub ma_short_window: usize,
    pub ma_long_window: usize,
    pub sma_short: IndicatorSeries,
    pub sma_long: IndicatorSeries,
    pub ema_short: IndicatorSeries,
    pub ema_long: IndicatorSeries,
    pub rsi: IndicatorSeries,
    pub macd: Macd,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestValues {
    pub price: f64,
    pub volume: u64,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub signal: Option<f64>,
    pub macd_bias: Option<MacdBias>,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceStatistics {
    pub current_price: f64,
    pub price_change_pct: f64,
    pub avg_volume: f64,
    pub max_price: f64,
    pub min_price: f64,
    pub volatility: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketReport {
    pub symbol: String,
    pub period: Period,
    pub bars: BarSeries,
    pub indicators: IndicatorSet,
    pub volatility: Option<f64>,
    pub trend: TrendAssessment,
    pub latest: LatestValues,
    pub statistics: PriceStatistics,
}

/// Computes indicators and the trend classification for one bar series.
/// Holds only its configuration; every call is independent.
#[derive(Debug, Clone, Default)]
pub struct MarketAnalyzer {
    config: IndicatorConfig,
}

impl MarketAnalyzer {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Fetch bars for an already-normalized symbol. Provider failures and
    /// empty results both become `DataUnavailable`; nothing is retried.
    pub async fn fetch_series(
        &self,
        provider: &mut dyn MarketDataProvider,
        symbol: &str,
        period: Period,
    ) -> Result<BarSeries> {
        let series = provider.fetch_series(symbol, period).await.map_err(|e| {
            warn!("Fetch failed for {} ({}): {:#}", symbol, period, e);
            AnalysisError::data_unavailable(symbol, format!("{:#}", e))
        })?;

        if series.is_empty() {
            warn!("No bars returned for {} ({})", symbol, period);
            return Err(AnalysisError::data_unavailable(
                symbol,
                format!("No data found for ticker {}", symbol),
            ));
        }

        debug!("Fetched {} bars for {} ({})", series.len(), symbol, period);
        Ok(series)
    }

    pub fn moving_average(&self, series: &BarSeries, window: usize, kind: MaKind) -> IndicatorSeries {
        indicators::moving_average(&series.closes(), window, kind)
    }

    pub fn rsi(&self, series: &BarSeries) -> IndicatorSeries {
        indicators::rsi(&series.closes(), self.config.rsi_window)
    }

    pub fn macd(&self, series: &BarSeries) -> Macd {
        indicators::macd(
            &series.closes(),
            self.config.macd_fast,
            self.config.macd_slow,
            self.config.macd_signal,
        )
    }

    pub fn volatility(&self, series: &BarSeries) -> Option<f64> {
        indicators::volatility(
            &series.closes(),
            self.config.volatility_window,
            self.config.trading_days_per_year,
        )
    }

    /// Classify the latest bar against the two moving averages.
    /// `None` for an empty series.
    pub fn classify_trend(
        &self,
        series: &BarSeries,
        short_ma: &IndicatorSeries,
        long_ma: &IndicatorSeries,
        volatility: Option<f64>,
    ) -> Option<TrendAssessment> {
        let price = series.last()?.close;
        Some(classify(
            price,
            latest(short_ma),
            latest(long_ma),
            volatility,
            &self.config,
        ))
    }

    /// Normalize the symbol, fetch, and build the full report.
    pub async fn analyze(
        &self,
        provider: &mut dyn MarketDataProvider,
        raw_symbol: &str,
        period: Option<Period>,
    ) -> Result<MarketReport> {
        let symbol = normalize_symbol(raw_symbol);
        let period = period.unwrap_or(self.config.default_period);
        info!("Analyzing {} over {}", symbol, period);

        let series = self.fetch_series(provider, &symbol, period).await?;
        self.analyze_series(&symbol, period, series)
    }

    /// Build the report from bars already in hand.
    pub fn analyze_series(&self, symbol: &str, period: Period, series: BarSeries) -> Result<MarketReport> {
        let last = match series.last() {
            Some(b) => b.clone(),
            None => {
                return Err(AnalysisError::data_unavailable(
                    symbol,
                    "series has no close prices",
                ))
            }
        };

        let cfg = &self.config;
        let closes = series.closes();

        let indicators = IndicatorSet {
            ma_short_window: cfg.ma_short,
            ma_long_window: cfg.ma_long,
            sma_short: indicators::sma(&closes, cfg.ma_short),
            sma_long: indicators::sma(&closes, cfg.ma_long),
            ema_short: indicators::ema(&closes, cfg.ma_short),
            ema_long: indicators::ema(&closes, cfg.ma_long),
            rsi: indicators::rsi(&closes, cfg.rsi_window),
            macd: indicators::macd(&closes, cfg.macd_fast, cfg.macd_slow, cfg.macd_signal),
        };

        let volatility = indicators::volatility(&closes, cfg.volatility_window, cfg.trading_days_per_year);

        let trend = classify(
            last.close,
            latest(&indicators.sma_short),
            latest(&indicators.sma_long),
            volatility,
            cfg,
        );

        let macd_now = indicators.macd.latest_macd();
        let signal_now = indicators.macd.latest_signal();
        let latest_values = LatestValues {
            price: last.close,
            volume: last.volume,
            rsi: latest(&indicators.rsi),
            macd: macd_now,
            signal: signal_now,
            macd_bias: macd_now.zip(signal_now).map(|(m, s)| MacdBias::from_lines(m, s)),
            sma_short: latest(&indicators.sma_short),
            sma_long: latest(&indicators.sma_long),
        };

        let statistics = PriceStatistics {
            current_price: last.close,
            price_change_pct: series.price_change_pct().unwrap_or(0.0),
            avg_volume: series.avg_volume().unwrap_or(0.0),
            max_price: series.max_close().unwrap_or(last.close),
            min_price: series.min_close().unwrap_or(last.close),
            volatility,
        };

        info!(
            "{}: {} bars, close {:.2}, trend {}",
            symbol,
            series.len(),
            last.close,
            trend.trend
        );

        Ok(MarketReport {
            symbol: symbol.to_string(),
            period,
            bars: series,
            indicators,
            volatility,
            trend,
            latest: latest_values,
            statistics,
        })
    }
}

/// Trend rules, checked in this order:
///
/// 1. price > short > long          -> Bullish
/// 2. long < price < short          -> Neutral-Bullish
/// 3. price < short < long          -> Bearish
/// 4. anything else                 -> Neutral-Bearish
///
/// The rules are not a full partition: short < price < long lands in the
/// last branch. Comparisons against an absent average are false.
pub fn classify(
    price: f64,
    short_ma: Option<f64>,
    long_ma: Option<f64>,
    volatility: Option<f64>,
    cfg: &IndicatorConfig,
) -> TrendAssessment {
    let p = Some(price);

    let trend = if gt(p, short_ma) && gt(short_ma, long_ma) {
        TrendLabel::Bullish
    } else if gt(p, long_ma) && gt(short_ma, p) {
        TrendLabel::NeutralBullish
    } else if gt(short_ma, p) && gt(long_ma, short_ma) {
        TrendLabel::Bearish
    } else {
        TrendLabel::NeutralBearish
    };

    TrendAssessment::new(trend, volatility_level(volatility, cfg))
}

/// Absent volatility reads as low.
pub fn volatility_level(volatility: Option<f64>, cfg: &IndicatorConfig) -> VolatilityLevel {
    match volatility {
        Some(v) if v > cfg.high_volatility_threshold => VolatilityLevel::High,
        Some(v) if v > cfg.moderate_volatility_threshold => VolatilityLevel::Moderate,
        _ => VolatilityLevel::Low,
    }
}

fn gt(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}
