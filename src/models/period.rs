use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lookback window requested from a market data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Period {
    #[serde(rename = "1d")]
    D1,
    #[serde(rename = "5d")]
    D5,
    #[serde(rename = "1mo")]
    Mo1,
    #[serde(rename = "3mo")]
    Mo3,
    #[serde(rename = "6mo")]
    Mo6,
    #[default]
    #[serde(rename = "1y")]
    Y1,
    #[serde(rename = "2y")]
    Y2,
    #[serde(rename = "5y")]
    Y5,
    #[serde(rename = "10y")]
    Y10,
    #[serde(rename = "ytd")]
    Ytd,
    #[serde(rename = "max")]
    Max,
}

impl Period {
    pub const ALL: [Period; 11] = [
        Period::D1,
        Period::D5,
        Period::Mo1,
        Period::Mo3,
        Period::Mo6,
        Period::Y1,
        Period::Y2,
        Period::Y5,
        Period::Y10,
        Period::Ytd,
        Period::Max,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::D1 => "1d",
            Period::D5 => "5d",
            Period::Mo1 => "1mo",
            Period::Mo3 => "3mo",
            Period::Mo6 => "6mo",
            Period::Y1 => "1y",
            Period::Y2 => "2y",
            Period::Y5 => "5y",
            Period::Y10 => "10y",
            Period::Ytd => "ytd",
            Period::Max => "max",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Period> {
        let s = s.trim().to_lowercase();
        Period::ALL.into_iter().find(|p| p.as_str() == s)
    }

    /// Earliest timestamp covered when the window ends at `end`.
    /// `None` means unbounded.
    pub fn start_from(&self, end: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Period::D1 => Some(end - Duration::days(1)),
            Period::D5 => Some(end - Duration::days(5)),
            Period::Mo1 => end.checked_sub_months(Months::new(1)),
            Period::Mo3 => end.checked_sub_months(Months::new(3)),
            Period::Mo6 => end.checked_sub_months(Months::new(6)),
            Period::Y1 => end.checked_sub_months(Months::new(12)),
            Period::Y2 => end.checked_sub_months(Months::new(24)),
            Period::Y5 => end.checked_sub_months(Months::new(60)),
            Period::Y10 => end.checked_sub_months(Months::new(120)),
            Period::Ytd => NaiveDate::from_ymd_opt(end.year(), 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc()),
            Period::Max => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
