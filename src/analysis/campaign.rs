use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

use crate::config::CampaignConfig;
use crate::error::{AnalysisError, Result};
use crate::indicators::stats;
use crate::models::{
    Campaign, CampaignKpis, CampaignTable, Metric, RoiCategory, BUDGET, CLICKS, CONVERSIONS,
    REQUIRED_COLUMNS,
};

pub const NO_DATA: &str = "No data found in the uploaded file";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub ok: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            ok: errors.is_empty(),
            errors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation; absent with fewer than two rows.
    pub std_dev: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCampaign {
    pub campaign: String,
    pub value: f64,
    pub budget: f64,
    pub revenue: f64,
    pub clicks: f64,
    pub conversions: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rankings {
    pub best_roi: RankedCampaign,
    pub worst_roi: RankedCampaign,
    pub best_conversion: RankedCampaign,
    pub worst_conversion: RankedCampaign,
    pub most_profitable: RankedCampaign,
    pub least_profitable: RankedCampaign,
}

/// Portfolio totals. The overall ratios come from the summed columns and are
/// absent when their denominator sums to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub total_budget: f64,
    pub total_revenue: f64,
    pub total_clicks: f64,
    pub total_conversions: f64,
    pub total_profit: f64,
    pub overall_roi: Option<f64>,
    pub overall_conversion_rate: Option<f64>,
    pub overall_cpc: Option<f64>,
    pub overall_cost_per_conversion: Option<f64>,
    pub campaign_count: usize,
}

/// Fixed-scale 0-100 scores, comparable across tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyScores {
    pub campaign: String,
    /// `(roi + 100) / 2`
    pub roi_score: f64,
    /// `ctr * 10`
    pub ctr_score: f64,
    /// `conversion_rate * 10`
    pub conversion_score: f64,
    /// `100 - cost_per_conversion / 2`; cheaper conversions score higher.
    pub cost_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignReport {
    pub campaigns: Vec<CampaignKpis>,
    pub summary: BTreeMap<Metric, ColumnStats>,
    pub rankings: Rankings,
    pub totals: Totals,
    pub roi_categories: Vec<(String, RoiCategory)>,
    pub efficiency: Vec<EfficiencyScores>,
}

/// Validates campaign tables and derives KPIs, rankings and totals.
#[derive(Debug, Clone, Default)]
pub struct CampaignAnalyzer {
    config: CampaignConfig,
}

impl CampaignAnalyzer {
    pub fn new(config: CampaignConfig) -> Self {
        Self { config }
    }

    /// Every applicable problem is reported, not just the first one.
    pub fn validate(&self, table: &CampaignTable) -> ValidationReport {
        let mut errors = Vec::new();

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| !table.has_column(c))
            .collect();
        if !missing.is_empty() {
            errors.push(format!("Missing required columns: {}", missing.join(", ")));
        }

        if table.is_empty() {
            errors.push(NO_DATA.to_string());
        }

        for col in REQUIRED_COLUMNS.iter().filter(|c| table.has_column(c)) {
            if table.rows.iter().any(|r| r.field(col).is_none()) {
                errors.push(format!("Non-numeric or missing values found in {} column", col));
            }
            if table.rows.iter().any(|r| r.field(col).is_some_and(|v| v < 0.0)) {
                errors.push(format!("Negative values found in {} column", col));
            }
        }

        let zero_checks = [
            (CLICKS, "cannot calculate conversion rate"),
            (BUDGET, "cannot calculate ROI"),
            (CONVERSIONS, "cannot calculate cost per conversion"),
        ];
        for (col, consequence) in zero_checks {
            if table.has_column(col) && table.rows.iter().any(|r| r.field(col) == Some(0.0)) {
                errors.push(format!("Zero values found in {} column - {}", col, consequence));
            }
        }

        let mut seen = HashSet::new();
        let mut duplicates: Vec<&str> = Vec::new();
        for row in &table.rows {
            if !seen.insert(row.name.as_str()) && !duplicates.contains(&row.name.as_str()) {
                duplicates.push(row.name.as_str());
            }
        }
        if !duplicates.is_empty() {
            errors.push(format!("Duplicate campaign names found: {}", duplicates.join(", ")));
        }

        if !errors.is_empty() {
            debug!("Validation found {} problem(s)", errors.len());
        }
        ValidationReport::from_errors(errors)
    }

    /// Derive per-row KPIs. Inputs are expected to have passed validation;
    /// zero denominators produce non-finite values rather than errors.
    pub fn compute_kpis(&self, campaigns: &[Campaign]) -> Vec<CampaignKpis> {
        let total_clicks: f64 = campaigns.iter().map(|c| c.clicks).sum();

        campaigns
            .iter()
            .map(|c| {
                let profit = c.revenue - c.budget;
                CampaignKpis {
                    campaign: c.clone(),
                    ctr: c.clicks / total_clicks * 100.0,
                    conversion_rate: c.conversions / c.clicks * 100.0,
                    cpc: c.budget / c.clicks,
                    cost_per_conversion: c.budget / c.conversions,
                    roi: profit / c.budget * 100.0,
                    revenue_per_click: c.revenue / c.clicks,
                    profit,
                    profit_margin: profit / c.revenue * 100.0,
                }
            })
            .collect()
    }

    /// Per-column statistics over every numeric and derived column.
    /// Empty input yields an empty map.
    pub fn summary_statistics(&self, kpis: &[CampaignKpis]) -> BTreeMap<Metric, ColumnStats> {
        let mut out = BTreeMap::new();
        if kpis.is_empty() {
            return out;
        }

        for metric in Metric::ALL {
            let values: Vec<f64> = kpis.iter().map(|k| k.metric(metric)).collect();
            let (Some(mean), Some(median), Some(min), Some(max)) = (
                stats::mean(&values),
                stats::median(&values),
                values.iter().copied().reduce(f64::min),
                values.iter().copied().reduce(f64::max),
            ) else {
                continue;
            };
            out.insert(
                metric,
                ColumnStats {
                    sum: values.iter().sum(),
                    mean,
                    median,
                    min,
                    max,
                    std_dev: stats::sample_std_dev(&values),
                },
            );
        }
        out
    }

    /// Best and worst campaigns by ROI, conversion rate and profit.
    /// Ties go to the earliest row.
    pub fn rankings(&self, kpis: &[CampaignKpis]) -> Option<Rankings> {
        Some(Rankings {
            best_roi: ranked(arg_best(kpis, |k| k.roi, true)?, |k| k.roi),
            worst_roi: ranked(arg_best(kpis, |k| k.roi, false)?, |k| k.roi),
            best_conversion: ranked(
                arg_best(kpis, |k| k.conversion_rate, true)?,
                |k| k.conversion_rate,
            ),
            worst_conversion: ranked(
                arg_best(kpis, |k| k.conversion_rate, false)?,
                |k| k.conversion_rate,
            ),
            most_profitable: ranked(arg_best(kpis, |k| k.profit, true)?, |k| k.profit),
            least_profitable: ranked(arg_best(kpis, |k| k.profit, false)?, |k| k.profit),
        })
    }

    pub fn aggregate_totals(&self, kpis: &[CampaignKpis]) -> Totals {
        let total_budget: f64 = kpis.iter().map(|k| k.campaign.budget).sum();
        let total_revenue: f64 = kpis.iter().map(|k| k.campaign.revenue).sum();
        let total_clicks: f64 = kpis.iter().map(|k| k.campaign.clicks).sum();
        let total_conversions: f64 = kpis.iter().map(|k| k.campaign.conversions).sum();
        let total_profit = total_revenue - total_budget;

        Totals {
            total_budget,
            total_revenue,
            total_clicks,
            total_conversions,
            total_profit,
            overall_roi: ratio(total_profit, total_budget).map(|r| r * 100.0),
            overall_conversion_rate: ratio(total_conversions, total_clicks).map(|r| r * 100.0),
            overall_cpc: ratio(total_budget, total_clicks),
            overall_cost_per_conversion: ratio(total_budget, total_conversions),
            campaign_count: kpis.len(),
        }
    }

    pub fn roi_category(&self, roi: f64) -> RoiCategory {
        let bands = &self.config.roi_bands;
        if roi <= bands.poor {
            RoiCategory::Poor
        } else if roi <= bands.negative {
            RoiCategory::Negative
        } else if roi <= bands.break_even {
            RoiCategory::BreakEven
        } else if roi <= bands.good {
            RoiCategory::Good
        } else {
            RoiCategory::Excellent
        }
    }

    /// Per-row scores, each clamped to [0, 100].
    pub fn efficiency_scores(&self, kpis: &[CampaignKpis]) -> Vec<EfficiencyScores> {
        kpis.iter()
            .map(|k| EfficiencyScores {
                campaign: k.name().to_string(),
                roi_score: score((k.roi + 100.0) / 2.0),
                ctr_score: score(k.ctr * 10.0),
                conversion_score: score(k.conversion_rate * 10.0),
                cost_score: score(100.0 - k.cost_per_conversion / 2.0),
            })
            .collect()
    }

    /// Validate then derive everything. Fails with every validation error
    /// when the table is not usable.
    pub fn analyze(&self, table: &CampaignTable) -> Result<CampaignReport> {
        let validation = self.validate(table);
        if !validation.ok {
            warn!("Campaign data rejected: {}", validation.errors.join("; "));
            return Err(AnalysisError::ValidationFailed(validation.errors));
        }

        let kpis = self.compute_kpis(&table.campaigns());
        let rankings = self
            .rankings(&kpis)
            .ok_or_else(|| AnalysisError::ValidationFailed(vec![NO_DATA.to_string()]))?;
        let summary = self.summary_statistics(&kpis);
        let totals = self.aggregate_totals(&kpis);
        let roi_categories = kpis
            .iter()
            .map(|k| (k.name().to_string(), self.roi_category(k.roi)))
            .collect();
        let efficiency = self.efficiency_scores(&kpis);

        info!(
            "Analyzed {} campaigns: budget {:.2}, revenue {:.2}, overall ROI {}",
            totals.campaign_count,
            totals.total_budget,
            totals.total_revenue,
            totals
                .overall_roi
                .map_or_else(|| "n/a".to_string(), |r| format!("{:.2}%", r)),
        );

        Ok(CampaignReport {
            campaigns: kpis,
            summary,
            rankings,
            totals,
            roi_categories,
            efficiency,
        })
    }
}

/// Index of the max (or min) value; the first occurrence wins ties.
fn arg_best<'a>(
    kpis: &'a [CampaignKpis],
    key: fn(&CampaignKpis) -> f64,
    highest: bool,
) -> Option<&'a CampaignKpis> {
    let mut best = kpis.first()?;
    for k in &kpis[1..] {
        let better = if highest {
            key(k) > key(best)
        } else {
            key(k) < key(best)
        };
        if better {
            best = k;
        }
    }
    Some(best)
}

fn ranked(k: &CampaignKpis, key: fn(&CampaignKpis) -> f64) -> RankedCampaign {
    RankedCampaign {
        campaign: k.name().to_string(),
        value: key(k),
        budget: k.campaign.budget,
        revenue: k.campaign.revenue,
        clicks: k.campaign.clicks,
        conversions: k.campaign.conversions,
    }
}

fn ratio(num: f64, den: f64) -> Option<f64> {
    (den != 0.0).then(|| num / den)
}

/// NaN scores 0; infinities clamp to the nearest bound.
fn score(raw: f64) -> f64 {
    if raw.is_nan() {
        0.0
    } else {
        raw.clamp(0.0, 100.0)
    }
}
