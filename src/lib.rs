pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod llm;
pub mod market;
pub mod models;
#[cfg(test)]
pub mod test_helpers;
