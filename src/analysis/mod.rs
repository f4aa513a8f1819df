pub mod campaign;
pub mod market;
pub mod report;

pub use campaign::{
    CampaignAnalyzer, CampaignReport, ColumnStats, EfficiencyScores, RankedCampaign, Rankings,
    Totals, ValidationReport,
};
pub use market::{classify, IndicatorSet, LatestValues, MarketAnalyzer, MarketReport, PriceStatistics};
