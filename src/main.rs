use anyhow::{bail, Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use insightx::analysis::{CampaignAnalyzer, MarketAnalyzer};
use insightx::config::Config;
use insightx::data;
use insightx::llm::{CallGate, InsightClient, Language, SystemClock};
use insightx::market::{normalize_symbol, HistoricalProvider, MarketDataProvider, YahooClient};
use insightx::models::{demo_campaigns, CampaignTable, Period};

const USAGE: &str = "\
Usage:
  insightx market [SYMBOL] [PERIOD] [--csv <bars.csv>] [--insights]
  insightx campaign <campaigns.csv | --demo> [--insights]
  insightx chat [--lang en|ar] <question...>
  insightx health";

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.log_level.to_lowercase()));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };
    let rest = &args[1..];
    let gate = Arc::new(CallGate::new(&cfg.llm, Arc::new(SystemClock)));

    match command.as_str() {
        "market" => run_market(&cfg, gate, rest).await,
        "campaign" => run_campaign(&cfg, gate, rest).await,
        "chat" => run_chat(&cfg, gate, rest).await,
        "health" => {
            let client = InsightClient::from_config_with_gate(cfg.llm.clone(), gate)?;
            let ok = client.health_check().await;
            println!("Provider at {}: {}", cfg.llm.base_url, if ok { "OK" } else { "UNREACHABLE" });
            Ok(())
        }
        "-h" | "--help" | "help" => {
            println!("{}", USAGE);
            Ok(())
        }
        other => bail!("unknown command '{}'\n{}", other, USAGE),
    }
}

/// Value following `flag`, if present.
fn take_option(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

/// Arguments that are neither `--switches` nor the values of `valued` flags.
fn positionals(args: &[String], valued: &[&str]) -> Vec<String> {
    let mut out = Vec::new();
    let mut skip = false;
    for a in args {
        if skip {
            skip = false;
            continue;
        }
        if valued.contains(&a.as_str()) {
            skip = true;
            continue;
        }
        if a.starts_with("--") {
            continue;
        }
        out.push(a.clone());
    }
    out
}

async fn run_market(cfg: &Config, gate: Arc<CallGate>, args: &[String]) -> Result<()> {
    let pos = positionals(args, &["--csv"]);
    let raw_symbol = pos.first().cloned().unwrap_or_else(|| cfg.default_symbol.clone());
    let period = match pos.get(1) {
        Some(p) => Some(
            Period::from_str_loose(p).with_context(|| format!("unknown period '{}'", p))?,
        ),
        None => None,
    };

    let mut provider: Box<dyn MarketDataProvider> = match take_option(args, "--csv") {
        Some(path) => {
            let mut replay = HistoricalProvider::new();
            let n = replay
                .load_csv(&normalize_symbol(&raw_symbol), &path)
                .with_context(|| format!("loading bars from {}", path))?;
            info!("Loaded {} bars from {}", n, path);
            Box::new(replay)
        }
        None => Box::new(YahooClient::new()),
    };

    let analyzer = MarketAnalyzer::new(cfg.indicators.clone());
    let report = analyzer
        .analyze(provider.as_mut(), &raw_symbol, period)
        .await?;
    report.print_summary();

    if args.iter().any(|a| a == "--insights") {
        let client = InsightClient::from_config_with_gate(cfg.llm.clone(), gate)?;
        println!("\n{}", client.analyze_trading(&report).await);
        println!("\n{}", client.trading_summary(&report).await);
    }
    Ok(())
}

async fn run_campaign(cfg: &Config, gate: Arc<CallGate>, args: &[String]) -> Result<()> {
    let pos = positionals(args, &[]);
    let table = if args.iter().any(|a| a == "--demo") {
        CampaignTable::from_campaigns(&demo_campaigns())
    } else {
        let Some(path) = pos.first() else {
            bail!("campaign requires a CSV path or --demo\n{}", USAGE);
        };
        data::load_campaign_csv(path, &cfg.campaign)
            .with_context(|| format!("reading campaigns from {}", path))?
    };
    let analyzer = CampaignAnalyzer::new(cfg.campaign.clone());
    let report = analyzer.analyze(&table)?;
    report.print_summary();

    if args.iter().any(|a| a == "--insights") {
        let client = InsightClient::from_config_with_gate(cfg.llm.clone(), gate)?;
        println!("\n{}", client.analyze_marketing(&report.campaigns).await);
        println!("\n{}", client.marketing_summary(&report).await);
    }
    Ok(())
}

async fn run_chat(cfg: &Config, gate: Arc<CallGate>, args: &[String]) -> Result<()> {
    let language = take_option(args, "--lang")
        .map(|l| Language::from_code(&l))
        .unwrap_or_default();
    let question = positionals(args, &["--lang"]).join(" ");
    if question.trim().is_empty() {
        bail!("chat requires a question\n{}", USAGE);
    }

    let client = InsightClient::from_config_with_gate(cfg.llm.clone(), gate)?;
    println!("{}", client.chat(&question, language).await);
    Ok(())
}
