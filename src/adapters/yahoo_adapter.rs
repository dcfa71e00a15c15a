//! Yahoo Finance market data adapter.
//!
//! Fetches daily closes from Yahoo's v8 chart API. Adjusted closes are used
//! when present; sessions without any close are skipped. Transient failures
//! (rate limiting, 5xx, connection errors) are retried with exponential backoff.

use crate::adapters::http;
use crate::domain::error::ProviderError;
use crate::domain::price_series::{PricePoint, PriceSeries};
use crate::ports::market_data_port::MarketDataPort;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use std::time::Duration;

const PROVIDER: &str = "yahoo";
const BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

pub struct YahooAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooAdapter {
    pub fn new(timeout_secs: u64) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http::build_client(PROVIDER, timeout_secs)?,
            base_url: BASE_URL.to_string(),
            max_retries: 2,
            base_delay: Duration::from_millis(500),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn chart_url(
        &self,
        symbol: &str,
        lookback_days: i64,
        now: DateTime<Utc>,
    ) -> Result<reqwest::Url, ProviderError> {
        let start = TimeDelta::try_days(lookback_days)
            .and_then(|d| now.checked_sub_signed(d))
            .ok_or_else(|| {
                ProviderError::malformed(PROVIDER, format!("lookback of {lookback_days} days"))
            })?;

        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ProviderError::malformed(PROVIDER, format!("base url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::malformed(PROVIDER, "base url cannot take a path"))?
            .pop_if_empty()
            .push(symbol);
        url.query_pairs_mut()
            .append_pair("period1", &start.timestamp().to_string())
            .append_pair("period2", &now.timestamp().to_string())
            .append_pair("interval", "1d")
            .append_pair("includeAdjustedClose", "true");
        Ok(url)
    }

    fn fetch_with_retry(
        &self,
        symbol: &str,
        url: &reqwest::Url,
    ) -> Result<ChartResponse, ProviderError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                tracing::debug!(symbol, attempt, "retrying after {:?}", delay);
                std::thread::sleep(delay);
            }

            let result = self
                .client
                .get(url.clone())
                .send()
                .map_err(|e| http::classify(PROVIDER, symbol, &e))
                .and_then(|resp| http::check_status(PROVIDER, symbol, resp));

            match result {
                Ok(resp) => {
                    return resp.json::<ChartResponse>().map_err(|e| {
                        ProviderError::malformed(
                            PROVIDER,
                            format!("chart response for {symbol}: {e}"),
                        )
                    });
                }
                Err(e) if is_transient(&e) => {
                    tracing::warn!(symbol, "yahoo request failed: {e}");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ProviderError::Network {
            provider: PROVIDER.to_string(),
            reason: "max retries exceeded".to_string(),
        }))
    }
}

fn is_transient(err: &ProviderError) -> bool {
    match err {
        ProviderError::RateLimited { .. } | ProviderError::Network { .. } => true,
        ProviderError::Http { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Convert a chart payload into a normalised close series.
fn parse_chart(symbol: &str, resp: ChartResponse) -> Result<PriceSeries, ProviderError> {
    let result = match (resp.chart.result, resp.chart.error) {
        (Some(result), _) => result,
        (None, Some(err)) if err.code == "Not Found" => {
            return Err(ProviderError::NotFound {
                provider: PROVIDER.to_string(),
                symbol: symbol.to_string(),
            });
        }
        (None, Some(err)) => {
            return Err(ProviderError::malformed(
                PROVIDER,
                format!("{}: {}", err.code, err.description),
            ));
        }
        (None, None) => {
            return Err(ProviderError::malformed(PROVIDER, "empty result with no error"));
        }
    };

    let Some(data) = result.into_iter().next() else {
        return Err(ProviderError::Empty {
            provider: PROVIDER.to_string(),
            symbol: symbol.to_string(),
        });
    };

    // a listed symbol with no sessions in range has no timestamps at all
    let timestamps = data.timestamp.unwrap_or_default();
    let closes = data
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();
    let adj_closes = data
        .indicators
        .adjclose
        .and_then(|v| v.into_iter().next())
        .map(|a| a.adjclose);

    let mut points = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let date = DateTime::from_timestamp(ts, 0)
            .map(|dt| dt.naive_utc().date())
            .ok_or_else(|| ProviderError::malformed(PROVIDER, format!("invalid timestamp: {ts}")))?;

        let adj = adj_closes.as_ref().and_then(|v| v.get(i).copied().flatten());
        let close = adj.or_else(|| closes.get(i).copied().flatten());

        if let Some(close) = close {
            points.push(PricePoint { date, close });
        }
    }

    Ok(PriceSeries::from_unsorted(symbol, points))
}

impl MarketDataPort for YahooAdapter {
    fn fetch_closes(&self, symbol: &str, lookback_days: i64) -> Result<PriceSeries, ProviderError> {
        let url = self.chart_url(symbol, lookback_days, Utc::now())?;
        let chart = self.fetch_with_retry(symbol, &url)?;
        let series = parse_chart(symbol, chart)?;
        tracing::debug!(symbol, observations = series.len(), "yahoo closes parsed");
        Ok(series)
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::stub::StubServer;
    use chrono::NaiveDate;

    fn parse(json: &str) -> Result<PriceSeries, ProviderError> {
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        parse_chart("AAPL", resp)
    }

    // 2024-01-02, 2024-01-03, 2024-01-04 at 14:30 UTC
    const TS: &str = "[1704205800, 1704292200, 1704378600]";

    #[test]
    fn prefers_adjusted_close() {
        let json = format!(
            r#"{{"chart": {{"result": [{{"timestamp": {TS},
                "indicators": {{"quote": [{{"close": [100.0, 101.0, 102.0]}}],
                                "adjclose": [{{"adjclose": [99.0, 100.0, 101.0]}}]}}}}],
                "error": null}}}}"#
        );
        let series = parse(&json).unwrap();
        assert_eq!(series.closes(), vec![99.0, 100.0, 101.0]);
        assert_eq!(
            series.points()[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }

    #[test]
    fn falls_back_to_close_and_skips_missing_sessions() {
        let json = format!(
            r#"{{"chart": {{"result": [{{"timestamp": {TS},
                "indicators": {{"quote": [{{"close": [100.0, null, 102.0]}}]}}}}],
                "error": null}}}}"#
        );
        let series = parse(&json).unwrap();
        assert_eq!(series.closes(), vec![100.0, 102.0]);
    }

    #[test]
    fn not_found_error() {
        let json = r#"{"chart": {"result": null,
            "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}}"#;
        assert!(matches!(parse(json), Err(ProviderError::NotFound { .. })));
    }

    #[test]
    fn other_chart_error_is_malformed() {
        let json = r#"{"chart": {"result": null,
            "error": {"code": "Bad Request", "description": "Invalid input"}}}"#;
        assert!(matches!(parse(json), Err(ProviderError::Malformed { .. })));
    }

    #[test]
    fn missing_timestamps_give_empty_series() {
        let json = r#"{"chart": {"result": [{"indicators": {"quote": [{"close": []}]}}], "error": null}}"#;
        assert!(parse(json).unwrap().is_empty());
    }

    #[test]
    fn empty_result_array() {
        let json = r#"{"chart": {"result": [], "error": null}}"#;
        assert!(matches!(parse(json), Err(ProviderError::Empty { .. })));
    }

    #[test]
    fn chart_url_covers_lookback() {
        let adapter = YahooAdapter::new(5).unwrap().with_base_url("http://localhost/chart/");
        let now = DateTime::from_timestamp(1_704_067_200, 0).unwrap();
        let url = adapter.chart_url("NVDA", 1, now).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost/chart/NVDA?period1=1703980800&period2=1704067200&interval=1d&includeAdjustedClose=true"
        );
    }

    #[test]
    fn chart_url_encodes_symbol() {
        let adapter = YahooAdapter::new(5).unwrap().with_base_url("http://localhost/chart");
        let now = DateTime::from_timestamp(1_704_067_200, 0).unwrap();
        let url = adapter.chart_url("BRK B/A?x", 1, now).unwrap();
        assert_eq!(url.path(), "/chart/BRK%20B%2FA%3Fx");
        assert_eq!(url.query_pairs().count(), 4);
    }

    #[test]
    fn chart_url_rejects_lookback_past_calendar() {
        let adapter = YahooAdapter::new(5).unwrap();
        let now = DateTime::from_timestamp(1_704_067_200, 0).unwrap();
        for days in [1_000_000_000, i64::MAX] {
            assert!(matches!(
                adapter.chart_url("NVDA", days, now),
                Err(ProviderError::Malformed { .. })
            ));
        }
    }

    #[test]
    fn transient_classification() {
        assert!(is_transient(&ProviderError::RateLimited {
            provider: PROVIDER.into()
        }));
        assert!(is_transient(&ProviderError::Http {
            provider: PROVIDER.into(),
            status: 503
        }));
        assert!(!is_transient(&ProviderError::NotFound {
            provider: PROVIDER.into(),
            symbol: "X".into()
        }));
    }

    const CHART_OK: &str = r#"{"chart": {"result": [{"timestamp": [1704205800, 1704292200],
        "indicators": {"quote": [{"close": [100.0, 101.0]}]}}], "error": null}}"#;

    fn stub_adapter(server: &StubServer) -> YahooAdapter {
        let mut adapter = YahooAdapter::new(5).unwrap().with_base_url(&server.base_url);
        adapter.base_delay = Duration::from_millis(1);
        adapter
    }

    #[test]
    fn rate_limit_is_retried() {
        let server = StubServer::start(vec![(429, ""), (200, CHART_OK)]);
        let series = stub_adapter(&server).fetch_closes("NVDA", 30).unwrap();
        assert_eq!(series.closes(), vec![100.0, 101.0]);

        let requests = server.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.starts_with("GET /NVDA?period1=")));
    }

    #[test]
    fn not_found_status_is_not_retried() {
        let server = StubServer::start(vec![(404, "")]);
        let result = stub_adapter(&server).fetch_closes("ZZZZ", 30);
        assert!(matches!(result, Err(ProviderError::NotFound { .. })));
        assert_eq!(server.requests().len(), 1);
    }

    #[test]
    fn server_errors_exhaust_retries() {
        let server = StubServer::start(vec![(500, ""), (500, ""), (500, "")]);
        let result = stub_adapter(&server).fetch_closes("NVDA", 30);
        assert!(matches!(result, Err(ProviderError::Http { status: 500, .. })));
        assert_eq!(server.requests().len(), 3);
    }

    #[test]
    fn unparseable_body_is_malformed() {
        let server = StubServer::start(vec![(200, "<html>blocked</html>")]);
        let result = stub_adapter(&server).fetch_closes("NVDA", 30);
        assert!(matches!(result, Err(ProviderError::Malformed { .. })));
        assert_eq!(server.requests().len(), 1);
    }
}
