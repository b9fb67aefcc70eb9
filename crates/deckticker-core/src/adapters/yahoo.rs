use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use log::debug;
use serde::Deserialize;

use crate::data_source::{FetchError, QuoteRequest, QuoteSource};
use crate::domain::Quote;
use crate::http_client::{HttpClient, HttpRequest, BROWSER_USER_AGENT};
use crate::source::SourceKind;

/// Yahoo Finance chart adapter.
///
/// Uses the unauthenticated one-day chart endpoint; the only upstream
/// requirement is a browser-like `User-Agent`, without which Yahoo blocks
/// the request as a non-browser client.
pub struct YahooChartSource {
    http: Arc<dyn HttpClient>,
}

impl YahooChartSource {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    async fn fetch(&self, req: &QuoteRequest) -> Result<Quote, FetchError> {
        let endpoint = format!(
            "https://query1.finance.yahoo.com/v8/finance/chart/{}?interval=1d&range=1d",
            urlencoding::encode(&req.symbol)
        );

        let request = HttpRequest::get(&endpoint).with_header("user-agent", BROWSER_USER_AGENT);
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if response.status == 429 {
            return Err(FetchError::RateLimited);
        }
        if !response.is_success() {
            return Err(FetchError::Http {
                status: response.status,
            });
        }

        normalize_chart_response(&response.body)
    }
}

impl QuoteSource for YahooChartSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Yahoo
    }

    fn fetch_quote<'a>(
        &'a self,
        req: QuoteRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Quote, FetchError>> + Send + 'a>> {
        Box::pin(async move { self.fetch(&req).await })
    }
}

/// Normalize a chart response body into a quote.
///
/// The regular session price is authoritative unless a numerically
/// different post-market price exists; failing that, a different pre-market
/// price. Post beats pre. Previous close prefers `chartPreviousClose` over
/// `previousClose`.
fn normalize_chart_response(body: &str) -> Result<Quote, FetchError> {
    let parsed: ChartResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::invalid_format(format!("yahoo chart body: {e}")))?;

    let result = parsed
        .chart
        .result
        .as_deref()
        .and_then(|results| results.first())
        .ok_or_else(|| FetchError::invalid_format("yahoo chart result is empty"))?;
    let meta = &result.meta;

    let regular = meta
        .regular_market_price
        .ok_or_else(|| FetchError::invalid_format("yahoo meta missing regularMarketPrice"))?;
    let previous_close = meta
        .chart_previous_close
        .or(meta.previous_close)
        .ok_or_else(|| FetchError::invalid_format("yahoo meta missing previous close"))?;

    let mut current_price = regular;
    let mut is_after_hours = false;

    if let Some(post) = meta.post_market_price.filter(|price| *price != regular) {
        debug!("using post-market price {post}");
        current_price = post;
        is_after_hours = true;
    } else if let Some(pre) = meta.pre_market_price.filter(|price| *price != regular) {
        debug!("using pre-market price {pre}");
        current_price = pre;
        is_after_hours = true;
    }

    Ok(Quote {
        current_price,
        previous_close,
        is_after_hours,
    })
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "regularMarketPrice", default)]
    regular_market_price: Option<f64>,
    #[serde(rename = "postMarketPrice", default)]
    post_market_price: Option<f64>,
    #[serde(rename = "preMarketPrice", default)]
    pre_market_price: Option<f64>,
    #[serde(rename = "chartPreviousClose", default)]
    chart_previous_close: Option<f64>,
    #[serde(rename = "previousClose", default)]
    previous_close: Option<f64>,
}
