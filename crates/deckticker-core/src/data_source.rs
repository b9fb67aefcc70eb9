//! Quote source contract and fetch error taxonomy.
//!
//! Every adapter implements [`QuoteSource`]: one symbol in, one normalized
//! [`Quote`] or one [`FetchError`] out. Errors never cross this boundary as
//! panics; the render layer turns all of them into the uniform error state.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::domain::Quote;
use crate::source::SourceKind;

/// Why a fetch produced no quote. All variants are terminal for the current
/// poll; the next timer tick simply tries again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("{source} requires an API key")]
    MissingCredential { source: SourceKind },

    #[error("upstream returned status {status}")]
    Http { status: u16 },

    #[error("rate limited by upstream")]
    RateLimited,

    #[error("invalid response format: {0}")]
    InvalidFormat(String),

    #[error("network error: {0}")]
    Network(String),
}

impl FetchError {
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat(message.into())
    }
}

/// One fetch worth of input: the instance's symbol plus its pass-through
/// credential (empty when the button has none configured).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub symbol: String,
    pub credential: String,
}

impl QuoteRequest {
    pub fn new(symbol: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            credential: credential.into(),
        }
    }
}

/// Source adapter contract.
///
/// Implementations must be `Send + Sync`; a fetch may be awaited from any
/// instance's polling task.
pub trait QuoteSource: Send + Sync {
    /// The source this adapter serves.
    fn kind(&self) -> SourceKind;

    /// Fetch and normalize one quote.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] for missing credentials, transport failures,
    /// upstream HTTP errors (429 distinguished as rate limiting where the
    /// source signals it), and malformed payloads.
    fn fetch_quote<'a>(
        &'a self,
        req: QuoteRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Quote, FetchError>> + Send + 'a>>;
}
