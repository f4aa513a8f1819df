//! CSV input for campaign tables and bar series.

pub mod bars;
pub mod campaigns;

pub use bars::{load_bars_csv, read_bars_csv};
pub use campaigns::{load_campaign_csv, read_campaign_csv};
