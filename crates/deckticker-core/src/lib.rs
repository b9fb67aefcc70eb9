//! # Deckticker Core
//!
//! Quote pipeline for the deckticker Stream Deck plugin.
//!
//! Turns a `(symbol, source, credential)` triple into a canonical [`Quote`]
//! or a typed [`FetchError`], and formats the result into the two display
//! artifacts the host understands: a three-line button title and a binary
//! up/down state.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Per-source fetch & normalization (Yahoo chart, Alpha Vantage, Finnhub) |
//! | [`data_source`] | The `QuoteSource` contract and fetch error taxonomy |
//! | [`domain`] | The canonical quote model |
//! | [`format`] | Pure display formatting (title text, up/down state) |
//! | [`http_client`] | HTTP transport abstraction over reqwest |
//! | [`routing`] | Source-kind dispatch |
//! | [`source`] | Source identifiers and settings fallback |
//!
//! ## Error Handling
//!
//! Nothing in this crate panics across the pipeline boundary. Every parse,
//! transport, and upstream failure becomes a [`FetchError`] variant, and the
//! caller renders the uniform error state:
//!
//! ```rust
//! use deckticker_core::FetchError;
//!
//! fn describe(error: &FetchError) -> &'static str {
//!     match error {
//!         FetchError::MissingCredential { .. } => "configure an API key",
//!         FetchError::RateLimited => "upstream rate limit",
//!         FetchError::Http { .. } => "upstream HTTP error",
//!         FetchError::InvalidFormat(_) => "malformed upstream payload",
//!         FetchError::Network(_) => "transport failure",
//!     }
//! }
//! ```

pub mod adapters;
pub mod data_source;
pub mod domain;
pub mod format;
pub mod http_client;
pub mod routing;
pub mod source;

pub use adapters::{AlphaVantageSource, FinnhubSource, YahooChartSource};
pub use data_source::{FetchError, QuoteRequest, QuoteSource};
pub use domain::Quote;
pub use format::{
    format_change, format_percent, format_price, format_title, state_for_change, ButtonState,
};
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use routing::QuoteRouter;
pub use source::SourceKind;
