use crate::analysis::report::fmt_opt;
use crate::analysis::{CampaignReport, MarketReport};
use crate::models::CampaignKpis;

pub const TRADING_SYSTEM: &str = "You are an expert financial analyst specializing in stock market analysis. \
Provide professional, educational insights about trading data. Focus on explaining technical indicators \
and their implications in simple terms. Always include educational disclaimers.";

pub const MARKETING_SYSTEM: &str = "You are an expert marketing analyst specializing in digital marketing campaigns. \
Provide professional, educational insights about marketing performance metrics. Focus on explaining \
KPIs and their implications in simple terms. Always include educational disclaimers.";

pub const EXECUTIVE_SYSTEM: &str = "You are an expert business analyst. Generate concise, professional executive \
summaries for business reports. Focus on key findings, implications, and actionable insights.";

/// Returned for chat questions outside the supported topics. The provider is
/// not called for these.
pub const OUT_OF_SCOPE_REPLY: &str =
    "That is outside what I can help with. Ask me about marketing, trading, or finance.";

const CHAT_TOPICS: [&str; 3] = ["marketing", "trading", "finance"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Arabic,
}

impl Language {
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "ar" | "arabic" => Language::Arabic,
            _ => Language::English,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Arabic => "Arabic",
        }
    }
}

pub fn trading_prompt(report: &MarketReport) -> String {
    let l = &report.latest;
    format!(
        "Analyze the following trading data for {symbol}:\n\n\
         Current Price: ${price:.2}\n\
         RSI: {rsi}\n\
         MACD: {macd} (signal {signal})\n\
         Moving Averages: SMA{sw} {sma_s}, SMA{lw} {sma_l}\n\
         Volatility: {vol}\n\
         Trend: {trend}\n\n\
         Please provide:\n\
         1. Technical analysis summary\n\
         2. Key insights from indicators\n\
         3. Educational explanation of what these indicators mean\n\
         4. Risk considerations",
        symbol = report.symbol,
        price = l.price,
        rsi = fmt_opt(l.rsi, 2),
        macd = fmt_opt(l.macd, 4),
        signal = fmt_opt(l.signal, 4),
        sw = report.indicators.ma_short_window,
        sma_s = fmt_opt(l.sma_short, 2),
        lw = report.indicators.ma_long_window,
        sma_l = fmt_opt(l.sma_long, 2),
        vol = fmt_opt(report.volatility, 4),
        trend = report.trend.signal,
    )
}

pub fn marketing_prompt(kpis: &[CampaignKpis]) -> String {
    let rows: Vec<String> = kpis
        .iter()
        .map(|k| {
            format!(
                "Campaign: {}, Budget: ${:.2}, Revenue: ${:.2}, ROI: {:.2}%, Conversion Rate: {:.2}%",
                k.name(),
                k.campaign.budget,
                k.campaign.revenue,
                k.roi,
                k.conversion_rate
            )
        })
        .collect();

    format!(
        "Analyze the following marketing campaign data:\n\n{}\n\n\
         Please provide:\n\
         1. Performance analysis summary\n\
         2. Key insights from the metrics\n\
         3. Educational explanation of what these KPIs mean\n\
         4. Recommendations for optimization",
        rows.join("\n")
    )
}

pub fn trading_summary_prompt(report: &MarketReport) -> String {
    format!(
        "Generate an executive summary for this trading analysis:\n\n\
         Ticker: {}\n\
         Analysis Period: {}\n\
         Key Findings: {} trend, price change {:+.2}% over the period\n\
         Risk Assessment: {}",
        report.symbol,
        report.period,
        report.trend.trend,
        report.statistics.price_change_pct,
        report.trend.signal,
    )
}

pub fn marketing_summary_prompt(report: &CampaignReport) -> String {
    let t = &report.totals;
    let mean_roi = report
        .summary
        .get(&crate::models::Metric::Roi)
        .map(|s| s.mean);
    format!(
        "Generate an executive summary for this marketing analysis:\n\n\
         Campaigns Analyzed: {}\n\
         Total Budget: ${:.2}\n\
         Total Revenue: ${:.2}\n\
         Average ROI: {}%\n\
         Key Findings: best ROI {} ({:.2}%), most profitable {}",
        t.campaign_count,
        t.total_budget,
        t.total_revenue,
        fmt_opt(mean_roi, 2),
        report.rankings.best_roi.campaign,
        report.rankings.best_roi.value,
        report.rankings.most_profitable.campaign,
    )
}

pub fn chat_system_prompt(language: Language) -> String {
    format!(
        "You are a helpful AI assistant for the InsightX analytics platform. \
         You specialize in marketing and trading analytics. Be educational, professional, and helpful. \
         Respond in {}.\n\n\
         Only respond to messages related to marketing, trading, or finance. \
         If a message is not related to these topics, respond with exactly: \"{}\"",
        language.name(),
        OUT_OF_SCOPE_REPLY
    )
}

/// Keyword check on the lowercased message.
pub fn is_in_scope(message: &str) -> bool {
    let lower = message.to_lowercase();
    CHAT_TOPICS.iter().any(|t| lower.contains(t))
}
