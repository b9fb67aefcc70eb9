use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::data_source::{FetchError, QuoteRequest, QuoteSource};
use crate::domain::Quote;
use crate::http_client::{HttpClient, HttpRequest, BROWSER_USER_AGENT};
use crate::source::SourceKind;

/// Alpha Vantage GLOBAL_QUOTE adapter.
///
/// Requires a caller-supplied API key passed through as the `apikey` query
/// parameter. Numeric fields arrive as JSON strings and are parsed here.
/// The source has no pre/post-market concept, so `is_after_hours` is
/// always false.
pub struct AlphaVantageSource {
    http: Arc<dyn HttpClient>,
}

impl AlphaVantageSource {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    async fn fetch(&self, req: &QuoteRequest) -> Result<Quote, FetchError> {
        if req.credential.is_empty() {
            return Err(FetchError::MissingCredential {
                source: SourceKind::AlphaVantage,
            });
        }

        let endpoint = format!(
            "https://www.alphavantage.co/query?function=GLOBAL_QUOTE&symbol={}&apikey={}",
            urlencoding::encode(&req.symbol),
            urlencoding::encode(&req.credential)
        );

        let request = HttpRequest::get(&endpoint).with_header("user-agent", BROWSER_USER_AGENT);
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !response.is_success() {
            return Err(FetchError::Http {
                status: response.status,
            });
        }

        normalize_global_quote(&response.body)
    }
}

impl QuoteSource for AlphaVantageSource {
    fn kind(&self) -> SourceKind {
        SourceKind::AlphaVantage
    }

    fn fetch_quote<'a>(
        &'a self,
        req: QuoteRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Quote, FetchError>> + Send + 'a>> {
        Box::pin(async move { self.fetch(&req).await })
    }
}

fn normalize_global_quote(body: &str) -> Result<Quote, FetchError> {
    let parsed: GlobalQuoteResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::invalid_format(format!("alphavantage body: {e}")))?;

    let quote = parsed
        .quote
        .ok_or_else(|| FetchError::invalid_format("alphavantage response has no Global Quote"))?;

    let current_price = parse_decimal_field(quote.price.as_deref(), "05. price")?;
    if current_price == 0.0 {
        return Err(FetchError::invalid_format("alphavantage price is zero"));
    }
    let previous_close =
        parse_decimal_field(quote.previous_close.as_deref(), "08. previous close")?;

    Ok(Quote::regular(current_price, previous_close))
}

fn parse_decimal_field(value: Option<&str>, field: &str) -> Result<f64, FetchError> {
    let value = value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| FetchError::invalid_format(format!("alphavantage missing '{field}'")))?;
    value
        .parse::<f64>()
        .map_err(|_| FetchError::invalid_format(format!("alphavantage '{field}' is not a number")))
}

#[derive(Debug, Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote", default)]
    quote: Option<GlobalQuoteData>,
}

#[derive(Debug, Deserialize)]
struct GlobalQuoteData {
    #[serde(rename = "05. price", default)]
    price: Option<String>,
    #[serde(rename = "08. previous close", default)]
    previous_close: Option<String>,
}
