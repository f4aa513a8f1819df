use super::campaign::CampaignReport;
use super::market::MarketReport;
use crate::models::Metric;

const RULE: &str = "  ───────────────────────────────────";

/// Format an optional value, "N/A" when absent or non-finite.
pub fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", decimals, v),
        _ => "N/A".to_string(),
    }
}

impl MarketReport {
    pub fn print_summary(&self) {
        let s = &self.statistics;
        let l = &self.latest;

        println!("\n{}", "=".repeat(70));
        println!("  MARKET ANALYSIS: {} ({})", self.symbol, self.period);
        println!("{}", "=".repeat(70));
        if let (Some(first), Some(last)) = (self.bars.first(), self.bars.last()) {
            println!(
                "  {} -> {} ({} bars)",
                first.timestamp.format("%Y-%m-%d"),
                last.timestamp.format("%Y-%m-%d"),
                self.bars.len()
            );
        }
        println!();
        println!("  PRICE");
        println!("{}", RULE);
        println!("  Current:     ${:.2}", s.current_price);
        println!("  Change:      {:+.2}%", s.price_change_pct);
        println!("  High:        ${:.2}", s.max_price);
        println!("  Low:         ${:.2}", s.min_price);
        println!("  Avg Volume:  {:.0}", s.avg_volume);
        println!();
        println!("  INDICATORS");
        println!("{}", RULE);
        println!(
            "  SMA {:<3}     {}",
            self.indicators.ma_short_window,
            fmt_opt(l.sma_short, 2)
        );
        println!(
            "  SMA {:<3}     {}",
            self.indicators.ma_long_window,
            fmt_opt(l.sma_long, 2)
        );
        println!("  RSI:         {}", fmt_opt(l.rsi, 2));
        println!(
            "  MACD:        {} / signal {}",
            fmt_opt(l.macd, 4),
            fmt_opt(l.signal, 4)
        );
        if let Some(bias) = l.macd_bias {
            println!("  MACD Bias:   {}", bias);
        }
        println!(
            "  Volatility:  {}",
            self.volatility
                .map_or_else(|| "N/A".to_string(), |v| format!("{:.2}%", v * 100.0))
        );
        println!();
        println!("  TREND");
        println!("{}", RULE);
        println!("  {}", self.trend.trend);
        println!("  {}", self.trend.signal);
        println!("{}", "=".repeat(70));
    }
}

impl CampaignReport {
    pub fn print_summary(&self) {
        let t = &self.totals;

        println!("\n{}", "=".repeat(70));
        println!("  CAMPAIGN ANALYSIS ({} campaigns)", t.campaign_count);
        println!("{}", "=".repeat(70));
        println!();
        println!("  TOTALS");
        println!("{}", RULE);
        println!("  Budget:      ${:.2}", t.total_budget);
        println!("  Revenue:     ${:.2}", t.total_revenue);
        println!("  Profit:      ${:+.2}", t.total_profit);
        println!("  Clicks:      {:.0}", t.total_clicks);
        println!("  Conversions: {:.0}", t.total_conversions);
        println!("  ROI:         {}%", fmt_opt(t.overall_roi, 2));
        println!("  Conv Rate:   {}%", fmt_opt(t.overall_conversion_rate, 2));
        println!("  CPC:         ${}", fmt_opt(t.overall_cpc, 2));
        println!();
        println!("  RANKINGS");
        println!("{}", RULE);
        let r = &self.rankings;
        println!("  Best ROI:        {} ({:.2}%)", r.best_roi.campaign, r.best_roi.value);
        println!("  Worst ROI:       {} ({:.2}%)", r.worst_roi.campaign, r.worst_roi.value);
        println!(
            "  Best Conv:       {} ({:.2}%)",
            r.best_conversion.campaign, r.best_conversion.value
        );
        println!(
            "  Most Profitable: {} (${:+.2})",
            r.most_profitable.campaign, r.most_profitable.value
        );
        println!();
        println!("  CAMPAIGNS");
        println!("{}", RULE);
        for (k, (_, category)) in self.campaigns.iter().zip(&self.roi_categories) {
            println!(
                "  {:<20} ROI {:>8.2}%  Conv {:>6.2}%  CPC ${:>7.2}  {}",
                k.name(),
                k.roi,
                k.conversion_rate,
                k.cpc,
                category
            );
        }
        if let Some(roi) = self.summary.get(&Metric::Roi) {
            println!();
            println!(
                "  Mean ROI {:.2}% / median {:.2}% / std {}",
                roi.mean,
                roi.median,
                fmt_opt(roi.std_dev, 2)
            );
        }
        println!("{}", "=".repeat(70));
    }
}
