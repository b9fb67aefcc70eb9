//! Per-source fetch & normalization.
//!
//! Each adapter isolates one upstream's endpoint shape and JSON quirks
//! behind the [`QuoteSource`](crate::data_source::QuoteSource) contract.

mod alphavantage;
mod finnhub;
mod yahoo;

pub use alphavantage::AlphaVantageSource;
pub use finnhub::FinnhubSource;
pub use yahoo::YahooChartSource;
