const ALIASES: &[(&str, &str)] = &[
    ("GOOGLE", "GOOGL"),
    ("GOOG", "GOOGL"),
    ("FACEBOOK", "META"),
    ("FB", "META"),
    ("AMAZON", "AMZN"),
    ("MICROSOFT", "MSFT"),
    ("APPLE", "AAPL"),
    ("TESLA", "TSLA"),
    ("NETFLIX", "NFLX"),
    ("BITCOIN", "BTC-USD"),
    ("BTC", "BTC-USD"),
    ("ETHEREUM", "ETH-USD"),
    ("ETH", "ETH-USD"),
];

/// Uppercase, trim, then map common company names and short tickers onto
/// the symbol the data provider expects. Unknown input passes through.
pub fn normalize_symbol(raw: &str) -> String {
    let symbol = raw.trim().to_uppercase();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == symbol)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(symbol)
}
