use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendLabel {
    Bullish,
    #[serde(rename = "Neutral-Bullish")]
    NeutralBullish,
    Bearish,
    #[serde(rename = "Neutral-Bearish")]
    NeutralBearish,
}

impl TrendLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendLabel::Bullish => "Bullish",
            TrendLabel::NeutralBullish => "Neutral-Bullish",
            TrendLabel::Bearish => "Bearish",
            TrendLabel::NeutralBearish => "Neutral-Bearish",
        }
    }

    /// Base signal text before the volatility qualifier is appended.
    pub fn signal_text(&self) -> &'static str {
        match self {
            TrendLabel::Bullish => "Strong uptrend - Price above both moving averages",
            TrendLabel::NeutralBullish => "Moderate uptrend - Price between moving averages",
            TrendLabel::Bearish => "Strong downtrend - Price below both moving averages",
            TrendLabel::NeutralBearish => "Moderate downtrend - Price between moving averages",
        }
    }
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolatilityLevel {
    Low,
    Moderate,
    High,
}

impl VolatilityLevel {
    pub fn qualifier(&self) -> &'static str {
        match self {
            VolatilityLevel::Low => "(Low volatility)",
            VolatilityLevel::Moderate => "(Moderate volatility)",
            VolatilityLevel::High => "(High volatility - increased risk)",
        }
    }
}

impl fmt::Display for VolatilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolatilityLevel::Low => write!(f, "low"),
            VolatilityLevel::Moderate => write!(f, "moderate"),
            VolatilityLevel::High => write!(f, "high"),
        }
    }
}

/// Which side of the signal line the MACD line sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MacdBias {
    Bullish,
    Bearish,
}

impl MacdBias {
    pub fn from_lines(macd: f64, signal: f64) -> Self {
        if macd > signal {
            MacdBias::Bullish
        } else {
            MacdBias::Bearish
        }
    }
}

impl fmt::Display for MacdBias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacdBias::Bullish => write!(f, "Bullish"),
            MacdBias::Bearish => write!(f, "Bearish"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAssessment {
    pub trend: TrendLabel,
    pub volatility_level: VolatilityLevel,
    pub signal: String,
}

impl TrendAssessment {
    pub fn new(trend: TrendLabel, volatility_level: VolatilityLevel) -> Self {
        Self {
            trend,
            volatility_level,
            signal: format!("{} {}", trend.signal_text(), volatility_level.qualifier()),
        }
    }
}
