use serde::{Deserialize, Serialize};
use std::fmt;

pub const BUDGET: &str = "Budget";
pub const CLICKS: &str = "Clicks";
pub const CONVERSIONS: &str = "Conversions";
pub const REVENUE: &str = "Revenue";

pub const REQUIRED_COLUMNS: [&str; 4] = [BUDGET, CLICKS, CONVERSIONS, REVENUE];

/// A campaign row as read from input. Numeric cells that were missing or
/// did not parse are `None`; validation reports them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignInput {
    pub name: String,
    pub budget: Option<f64>,
    pub clicks: Option<f64>,
    pub conversions: Option<f64>,
    pub revenue: Option<f64>,
}

impl CampaignInput {
    pub fn field(&self, column: &str) -> Option<f64> {
        match column {
            BUDGET => self.budget,
            CLICKS => self.clicks,
            CONVERSIONS => self.conversions,
            REVENUE => self.revenue,
            _ => None,
        }
    }
}

/// Raw campaign table: the header names seen plus every row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignTable {
    pub columns: Vec<String>,
    pub rows: Vec<CampaignInput>,
}

impl CampaignTable {
    pub fn new(columns: Vec<String>, rows: Vec<CampaignInput>) -> Self {
        Self { columns, rows }
    }

    /// Build a table with all required columns from already-typed campaigns.
    pub fn from_campaigns(campaigns: &[Campaign]) -> Self {
        let rows = campaigns
            .iter()
            .map(|c| CampaignInput {
                name: c.name.clone(),
                budget: Some(c.budget),
                clicks: Some(c.clicks),
                conversions: Some(c.conversions),
                revenue: Some(c.revenue),
            })
            .collect();
        Self {
            columns: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Typed rows. Only meaningful after validation passed; rows with an
    /// absent field are skipped.
    pub fn campaigns(&self) -> Vec<Campaign> {
        self.rows
            .iter()
            .filter_map(|r| {
                Some(Campaign {
                    name: r.name.clone(),
                    budget: r.budget?,
                    clicks: r.clicks?,
                    conversions: r.conversions?,
                    revenue: r.revenue?,
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub name: String,
    pub budget: f64,
    pub clicks: f64,
    pub conversions: f64,
    pub revenue: f64,
}

impl Campaign {
    pub fn new(name: &str, budget: f64, clicks: f64, conversions: f64, revenue: f64) -> Self {
        Self {
            name: name.to_string(),
            budget,
            clicks,
            conversions,
            revenue,
        }
    }
}

/// Built-in demo table for trying the pipeline without a file.
pub fn demo_campaigns() -> Vec<Campaign> {
    vec![
        Campaign::new("Facebook Ads", 5000.0, 1200.0, 45.0, 6750.0),
        Campaign::new("Google Ads", 8000.0, 2500.0, 85.0, 12750.0),
        Campaign::new("LinkedIn Ads", 3000.0, 800.0, 25.0, 3750.0),
        Campaign::new("Twitter Ads", 2000.0, 600.0, 18.0, 2160.0),
        Campaign::new("Email Campaign", 1500.0, 400.0, 12.0, 1440.0),
    ]
}

/// A campaign with its derived KPI columns.
///
/// `ctr` is the row's share of total clicks across the table (× 100). No
/// impression data exists, so it is not a textbook click-through rate; the
/// name is kept for continuity with existing reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignKpis {
    pub campaign: Campaign,
    pub ctr: f64,
    pub conversion_rate: f64,
    pub cpc: f64,
    pub cost_per_conversion: f64,
    pub roi: f64,
    pub revenue_per_click: f64,
    pub profit: f64,
    pub profit_margin: f64,
}

impl CampaignKpis {
    pub fn name(&self) -> &str {
        &self.campaign.name
    }

    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Budget => self.campaign.budget,
            Metric::Clicks => self.campaign.clicks,
            Metric::Conversions => self.campaign.conversions,
            Metric::Revenue => self.campaign.revenue,
            Metric::Ctr => self.ctr,
            Metric::ConversionRate => self.conversion_rate,
            Metric::Cpc => self.cpc,
            Metric::CostPerConversion => self.cost_per_conversion,
            Metric::Roi => self.roi,
            Metric::RevenuePerClick => self.revenue_per_click,
            Metric::Profit => self.profit,
            Metric::ProfitMargin => self.profit_margin,
        }
    }
}

/// Numeric and derived columns of a KPI table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    Budget,
    Clicks,
    Conversions,
    Revenue,
    Ctr,
    ConversionRate,
    Cpc,
    CostPerConversion,
    Roi,
    RevenuePerClick,
    Profit,
    ProfitMargin,
}

impl Metric {
    pub const ALL: [Metric; 12] = [
        Metric::Budget,
        Metric::Clicks,
        Metric::Conversions,
        Metric::Revenue,
        Metric::Ctr,
        Metric::ConversionRate,
        Metric::Cpc,
        Metric::CostPerConversion,
        Metric::Roi,
        Metric::RevenuePerClick,
        Metric::Profit,
        Metric::ProfitMargin,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            Metric::Budget => BUDGET,
            Metric::Clicks => CLICKS,
            Metric::Conversions => CONVERSIONS,
            Metric::Revenue => REVENUE,
            Metric::Ctr => "CTR",
            Metric::ConversionRate => "Conversion_Rate",
            Metric::Cpc => "CPC",
            Metric::CostPerConversion => "Cost_per_Conversion",
            Metric::Roi => "ROI",
            Metric::RevenuePerClick => "Revenue_per_Click",
            Metric::Profit => "Profit",
            Metric::ProfitMargin => "Profit_Margin",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoiCategory {
    Poor,
    Negative,
    BreakEven,
    Good,
    Excellent,
}

impl fmt::Display for RoiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoiCategory::Poor => write!(f, "Poor (<-10%)"),
            RoiCategory::Negative => write!(f, "Negative (-10% to 0%)"),
            RoiCategory::BreakEven => write!(f, "Break-even (0% to 10%)"),
            RoiCategory::Good => write!(f, "Good (10% to 50%)"),
            RoiCategory::Excellent => write!(f, "Excellent (>50%)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campaigns_skips_rows_with_absent_fields() {
        let table = CampaignTable::new(
            REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            vec![
                CampaignInput {
                    name: "A".into(),
                    budget: Some(100.0),
                    clicks: Some(10.0),
                    conversions: Some(1.0),
                    revenue: Some(150.0),
                },
                CampaignInput {
                    name: "B".into(),
                    budget: None,
                    clicks: Some(10.0),
                    conversions: Some(1.0),
                    revenue: Some(150.0),
                },
            ],
        );
        let typed = table.campaigns();
        assert_eq!(typed.len(), 1);
        assert_eq!(typed[0].name, "A");
    }

    #[test]
    fn demo_table_has_unique_names() {
        let demo = demo_campaigns();
        let mut names: Vec<&str> = demo.iter().map(|c| c.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 5);
    }

    #[test]
    fn from_campaigns_declares_required_columns() {
        let table = CampaignTable::from_campaigns(&[Campaign::new("A", 1.0, 1.0, 1.0, 1.0)]);
        for col in REQUIRED_COLUMNS {
            assert!(table.has_column(col));
        }
        assert_eq!(table.rows[0].field(REVENUE), Some(1.0));
    }
}
