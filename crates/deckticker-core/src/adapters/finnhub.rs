use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::data_source::{FetchError, QuoteRequest, QuoteSource};
use crate::domain::Quote;
use crate::http_client::{HttpClient, HttpRequest, BROWSER_USER_AGENT};
use crate::source::SourceKind;

/// Finnhub quote adapter.
///
/// Requires a caller-supplied API key passed through as the `token` query
/// parameter. Finnhub reports a zero current price for unknown symbols, so
/// zero is treated as "no data" rather than a valid quote. No pre/post
/// market concept here either.
pub struct FinnhubSource {
    http: Arc<dyn HttpClient>,
}

impl FinnhubSource {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    async fn fetch(&self, req: &QuoteRequest) -> Result<Quote, FetchError> {
        if req.credential.is_empty() {
            return Err(FetchError::MissingCredential {
                source: SourceKind::Finnhub,
            });
        }

        let endpoint = format!(
            "https://finnhub.io/api/v1/quote?symbol={}&token={}",
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

        normalize_finnhub_quote(&response.body)
    }
}

impl QuoteSource for FinnhubSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Finnhub
    }

    fn fetch_quote<'a>(
        &'a self,
        req: QuoteRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Quote, FetchError>> + Send + 'a>> {
        Box::pin(async move { self.fetch(&req).await })
    }
}

fn normalize_finnhub_quote(body: &str) -> Result<Quote, FetchError> {
    let parsed: FinnhubQuoteData = serde_json::from_str(body)
        .map_err(|e| FetchError::invalid_format(format!("finnhub body: {e}")))?;

    let current_price = match parsed.current {
        Some(price) if price != 0.0 => price,
        // Zero means "symbol not found / no data" on this source.
        _ => return Err(FetchError::invalid_format("finnhub returned no price")),
    };
    let previous_close = parsed
        .previous_close
        .ok_or_else(|| FetchError::invalid_format("finnhub missing previous close"))?;

    Ok(Quote::regular(current_price, previous_close))
}

#[derive(Debug, Deserialize)]
struct FinnhubQuoteData {
    #[serde(rename = "c", default)]
    current: Option<f64>,
    #[serde(rename = "pc", default)]
    previous_close: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{HttpError, HttpResponse};
    use std::sync::Mutex;

    struct CannedHttpClient {
        response: Result<HttpResponse, HttpError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl CannedHttpClient {
        fn responding(response: HttpResponse) -> Self {
            Self {
                response: Ok(response),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn request_count(&self) -> usize {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .len()
        }

        fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for CannedHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    #[tokio::test]
    async fn quote_normalizes() {
        let body = r#"{"c":175.43,"h":176.1,"l":174.2,"o":175.0,"pc":173.50,"t":1700000000}"#;
        let client = Arc::new(CannedHttpClient::responding(HttpResponse::ok_json(body)));
        let source = FinnhubSource::new(client.clone());

        let quote = source
            .fetch_quote(QuoteRequest::new("AAPL", "fh-token"))
            .await
            .expect("quote should normalize");

        assert_eq!(quote.current_price, 175.43);
        assert_eq!(quote.previous_close, 173.50);
        assert!(!quote.is_after_hours);

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.contains("symbol=AAPL"));
        assert!(requests[0].url.contains("token=fh-token"));
    }

    #[tokio::test]
    async fn empty_credential_fails_without_a_network_call() {
        let client = Arc::new(CannedHttpClient::responding(HttpResponse::ok_json("{}")));
        let source = FinnhubSource::new(client.clone());

        let error = source
            .fetch_quote(QuoteRequest::new("AAPL", ""))
            .await
            .expect_err("must fail");

        assert_eq!(
            error,
            FetchError::MissingCredential {
                source: SourceKind::Finnhub
            }
        );
        assert_eq!(client.request_count(), 0);
    }

    #[tokio::test]
    async fn zero_price_means_no_data() {
        let body = r#"{"c":0,"pc":0}"#;
        let client = Arc::new(CannedHttpClient::responding(HttpResponse::ok_json(body)));
        let source = FinnhubSource::new(client);

        let error = source
            .fetch_quote(QuoteRequest::new("NOPE", "fh-token"))
            .await
            .expect_err("must fail");
        assert!(matches!(error, FetchError::InvalidFormat(_)));
    }

    #[test]
    fn invalid_shapes_are_invalid_format() {
        for body in ["", "not json", "{}", r#"{"c":175.43}"#] {
            let error = normalize_finnhub_quote(body).expect_err("must fail");
            assert!(
                matches!(error, FetchError::InvalidFormat(_)),
                "body {body:?} produced {error:?}"
            );
        }
    }
}
