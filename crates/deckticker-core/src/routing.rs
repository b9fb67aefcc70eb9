//! Source-kind dispatch.
//!
//! Holds one adapter per source over a shared transport and routes each
//! fetch by the instance's configured [`SourceKind`]. There is no fallback
//! chain: a failed fetch renders the error state and waits for the next
//! poll.

use std::sync::Arc;

use crate::adapters::{AlphaVantageSource, FinnhubSource, YahooChartSource};
use crate::data_source::{FetchError, QuoteRequest, QuoteSource};
use crate::domain::Quote;
use crate::http_client::HttpClient;
use crate::source::SourceKind;

pub struct QuoteRouter {
    yahoo: YahooChartSource,
    alphavantage: AlphaVantageSource,
    finnhub: FinnhubSource,
}

impl QuoteRouter {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            yahoo: YahooChartSource::new(Arc::clone(&http)),
            alphavantage: AlphaVantageSource::new(Arc::clone(&http)),
            finnhub: FinnhubSource::new(http),
        }
    }

    pub async fn fetch_quote(
        &self,
        kind: SourceKind,
        req: QuoteRequest,
    ) -> Result<Quote, FetchError> {
        self.source(kind).fetch_quote(req).await
    }

    fn source(&self, kind: SourceKind) -> &dyn QuoteSource {
        match kind {
            SourceKind::Yahoo => &self.yahoo,
            SourceKind::AlphaVantage => &self.alphavantage,
            SourceKind::Finnhub => &self.finnhub,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{HttpError, HttpRequest, HttpResponse};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    struct RecordingHttpClient {
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        fn new() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
            }
        }

        fn urls(&self) -> Vec<String> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .iter()
                .map(|r| r.url.clone())
                .collect()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            Box::pin(async move { Ok(HttpResponse::ok_json("{}")) })
        }
    }

    #[tokio::test]
    async fn dispatches_to_the_configured_source() {
        let client = Arc::new(RecordingHttpClient::new());
        let router = QuoteRouter::new(client.clone());

        let _ = router
            .fetch_quote(SourceKind::Yahoo, QuoteRequest::new("AAPL", ""))
            .await;
        let _ = router
            .fetch_quote(SourceKind::Finnhub, QuoteRequest::new("AAPL", "key"))
            .await;

        let urls = client.urls();
        assert_eq!(urls.len(), 2);
        assert!(urls[0].contains("query1.finance.yahoo.com"));
        assert!(urls[1].contains("finnhub.io"));
    }

    #[tokio::test]
    async fn credential_gated_sources_skip_transport() {
        let client = Arc::new(RecordingHttpClient::new());
        let router = QuoteRouter::new(client.clone());

        let error = router
            .fetch_quote(SourceKind::AlphaVantage, QuoteRequest::new("AAPL", ""))
            .await
            .expect_err("must fail");
        assert!(matches!(error, FetchError::MissingCredential { .. }));
        assert!(client.urls().is_empty());
    }
}
