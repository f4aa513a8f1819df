use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::Period;

/// Indicator windows and thresholds for the market analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub rsi_window: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub ma_short: usize,
    pub ma_long: usize,
    pub volatility_window: usize,

    // Annualized volatility bands for the trend qualifier
    pub high_volatility_threshold: f64,
    pub moderate_volatility_threshold: f64,

    pub trading_days_per_year: f64,
    pub default_period: Period,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_window: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            ma_short: 20,
            ma_long: 50,
            volatility_window: 20,
            high_volatility_threshold: 0.30,
            moderate_volatility_threshold: 0.20,
            trading_days_per_year: 252.0,
            default_period: Period::Y1,
        }
    }
}

/// Upper edges (inclusive) of the ROI bands, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiBands {
    pub poor: f64,
    pub negative: f64,
    pub break_even: f64,
    pub good: f64,
}

impl Default for RoiBands {
    fn default() -> Self {
        Self {
            poor: -10.0,
            negative: 0.0,
            break_even: 10.0,
            good: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignConfig {
    /// Optional header naming each row; absent means synthetic names.
    pub identity_column: String,
    pub synthetic_name_prefix: String,
    pub roi_bands: RoiBands,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            identity_column: "Campaign".to_string(),
            synthetic_name_prefix: "Campaign".to_string(),
            roi_bands: RoiBands::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout: Duration,

    // Call gate
    pub min_request_interval: Duration,
    pub max_attempts: u32,
    pub backoff_base: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "openai/gpt-oss-120b".to_string(),
            temperature: 1.0,
            max_tokens: 8192,
            timeout: Duration::from_secs(30),
            min_request_interval: Duration::from_secs(1),
            max_attempts: 3,
            backoff_base: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub default_symbol: String,
    pub indicators: IndicatorConfig,
    pub campaign: CampaignConfig,
    pub llm: LlmConfig,

    // Logging
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_symbol: "AAPL".to_string(),
            indicators: IndicatorConfig::default(),
            campaign: CampaignConfig::default(),
            llm: LlmConfig::default(),
            log_level: "INFO".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str| -> Option<String> {
            std::env::var(key).ok().filter(|v| !v.trim().is_empty())
        };
        let parsed = |key: &str| -> Option<f64> { env(key).and_then(|v| v.trim().parse().ok()) };
        let window = |key: &str, default: usize| -> usize {
            env(key)
                .and_then(|v| v.trim().parse().ok())
                .filter(|w: &usize| *w > 0)
                .unwrap_or(default)
        };

        let d = Config::default();

        let indicators = IndicatorConfig {
            rsi_window: window("RSI_PERIOD", d.indicators.rsi_window),
            macd_fast: window("MACD_FAST", d.indicators.macd_fast),
            macd_slow: window("MACD_SLOW", d.indicators.macd_slow),
            macd_signal: window("MACD_SIGNAL", d.indicators.macd_signal),
            ma_short: window("MA_SHORT", d.indicators.ma_short),
            ma_long: window("MA_LONG", d.indicators.ma_long),
            volatility_window: window("VOLATILITY_WINDOW", d.indicators.volatility_window),
            high_volatility_threshold: parsed("MAX_VOLATILITY_THRESHOLD")
                .unwrap_or(d.indicators.high_volatility_threshold),
            moderate_volatility_threshold: parsed("MODERATE_VOLATILITY_THRESHOLD")
                .unwrap_or(d.indicators.moderate_volatility_threshold),
            trading_days_per_year: parsed("TRADING_DAYS_PER_YEAR")
                .unwrap_or(d.indicators.trading_days_per_year),
            default_period: env("DEFAULT_PERIOD")
                .and_then(|p| Period::from_str_loose(&p))
                .unwrap_or(d.indicators.default_period),
        };

        let llm = LlmConfig {
            api_key: env("LLM_API_KEY").unwrap_or_default(),
            base_url: env("LLM_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(d.llm.base_url),
            model: env("LLM_MODEL").unwrap_or(d.llm.model),
            temperature: parsed("LLM_TEMPERATURE").unwrap_or(d.llm.temperature),
            max_tokens: env("LLM_MAX_TOKENS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(d.llm.max_tokens),
            ..d.llm
        };

        Config {
            default_symbol: env("DEFAULT_SYMBOL").unwrap_or(d.default_symbol),
            indicators,
            campaign: d.campaign,
            llm,
            log_level: env("LOG_LEVEL").unwrap_or(d.log_level),
        }
    }
}
