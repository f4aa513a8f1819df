use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::config::CampaignConfig;
use crate::error::Result;
use crate::models::{CampaignInput, CampaignTable, BUDGET, CLICKS, CONVERSIONS, REVENUE};

pub fn load_campaign_csv<P: AsRef<Path>>(path: P, cfg: &CampaignConfig) -> Result<CampaignTable> {
    let file = File::open(path)?;
    read_campaign_csv(file, cfg)
}

/// Read a campaign table. Header names are trimmed; every column is kept
/// in `columns` so validation can report which required ones are missing.
/// Rows without an identity cell are named "<prefix> N" (1-based).
/// Numeric cells that are empty or do not parse become `None`.
pub fn read_campaign_csv<R: Read>(reader: R, cfg: &CampaignConfig) -> Result<CampaignTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    let index_of = |name: &str| columns.iter().position(|c| c == name);

    let name_idx = index_of(&cfg.identity_column);
    let budget_idx = index_of(BUDGET);
    let clicks_idx = index_of(CLICKS);
    let conversions_idx = index_of(CONVERSIONS);
    let revenue_idx = index_of(REVENUE);

    let mut rows = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let cell = |idx: Option<usize>| idx.and_then(|j| record.get(j));
        let number = |idx: Option<usize>| cell(idx).and_then(parse_number);

        let name = cell(name_idx)
            .filter(|n| !n.is_empty())
            .map(|n| n.to_string())
            .unwrap_or_else(|| format!("{} {}", cfg.synthetic_name_prefix, i + 1));

        rows.push(CampaignInput {
            name,
            budget: number(budget_idx),
            clicks: number(clicks_idx),
            conversions: number(conversions_idx),
            revenue: number(revenue_idx),
        });
    }

    debug!("Read {} campaign rows ({} columns)", rows.len(), columns.len());
    Ok(CampaignTable::new(columns, rows))
}

fn parse_number(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_named_campaigns() {
        let csv = "Campaign,Budget,Clicks,Conversions,Revenue\n\
                   Facebook Ads,5000,1200,45,6750\n\
                   Google Ads,8000,2500,85,12750\n";
        let t = read_campaign_csv(csv.as_bytes(), &CampaignConfig::default()).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.rows[0].name, "Facebook Ads");
        assert_eq!(t.rows[1].revenue, Some(12750.0));
    }

    #[test]
    fn synthesizes_names_without_identity_column() {
        let csv = "Budget,Clicks,Conversions,Revenue\n100,10,1,120\n200,20,2,260\n";
        let t = read_campaign_csv(csv.as_bytes(), &CampaignConfig::default()).unwrap();
        assert_eq!(t.rows[0].name, "Campaign 1");
        assert_eq!(t.rows[1].name, "Campaign 2");
    }

    #[test]
    fn keeps_bad_cells_as_absent() {
        let csv = " Budget , Clicks ,Conversions,Revenue\nabc,10,,120\n";
        let t = read_campaign_csv(csv.as_bytes(), &CampaignConfig::default()).unwrap();
        assert!(t.has_column("Budget"));
        assert_eq!(t.rows[0].budget, None);
        assert_eq!(t.rows[0].clicks, Some(10.0));
        assert_eq!(t.rows[0].conversions, None);
    }

    #[test]
    fn missing_column_is_recorded_not_rejected() {
        let csv = "Campaign,Budget,Clicks,Conversions\nA,100,10,1\n";
        let t = read_campaign_csv(csv.as_bytes(), &CampaignConfig::default()).unwrap();
        assert!(!t.has_column("Revenue"));
        assert_eq!(t.rows[0].revenue, None);
    }

    #[test]
    fn header_only_file_is_empty_table() {
        let csv = "Campaign,Budget,Clicks,Conversions,Revenue\n";
        let t = read_campaign_csv(csv.as_bytes(), &CampaignConfig::default()).unwrap();
        assert!(t.is_empty());
        assert_eq!(t.columns.len(), 5);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campaigns.csv");
        std::fs::write(&path, "Budget,Clicks,Conversions,Revenue\n1,1,1,1\n").unwrap();
        let t = load_campaign_csv(&path, &CampaignConfig::default()).unwrap();
        assert_eq!(t.len(), 1);
    }
}
