#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use hedgebox::domain::error::ProviderError;
use hedgebox::domain::news::NewsItem;
use hedgebox::domain::price_series::{PricePoint, PriceSeries};
use hedgebox::ports::market_data_port::MarketDataPort;
use hedgebox::ports::news_port::NewsPort;
use hedgebox::ports::scoring_port::ScoringPort;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

pub struct MockMarketPort {
    pub data: HashMap<String, PriceSeries>,
    pub errors: HashMap<String, ProviderError>,
    pub calls: RefCell<Vec<String>>,
}

impl MockMarketPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.data.insert(series.symbol().to_string(), series);
        self
    }

    pub fn with_error(mut self, symbol: &str, error: ProviderError) -> Self {
        self.errors.insert(symbol.to_string(), error);
        self
    }
}

impl MarketDataPort for MockMarketPort {
    fn fetch_closes(
        &self,
        symbol: &str,
        _lookback_days: i64,
    ) -> Result<PriceSeries, ProviderError> {
        self.calls.borrow_mut().push(symbol.to_string());
        if let Some(err) = self.errors.get(symbol) {
            return Err(err.clone());
        }
        Ok(self
            .data
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| PriceSeries::empty(symbol)))
    }

    fn name(&self) -> &str {
        "mock-market"
    }
}

pub struct MockNewsPort {
    pub items: HashMap<String, Vec<NewsItem>>,
    pub error: Option<ProviderError>,
}

impl MockNewsPort {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            error: None,
        }
    }

    pub fn with_snippets(mut self, symbol: &str, snippets: &[&str]) -> Self {
        self.items.insert(
            symbol.to_string(),
            snippets.iter().map(|s| NewsItem::new(*s)).collect(),
        );
        self
    }

    pub fn failing(mut self, error: ProviderError) -> Self {
        self.error = Some(error);
        self
    }
}

impl NewsPort for MockNewsPort {
    fn search(&self, symbol: &str, _limit: usize) -> Result<Vec<NewsItem>, ProviderError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        Ok(self.items.get(symbol).cloned().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "mock-news"
    }
}

/// Scorer that answers every prompt with the same canned reply.
pub struct MockScorer {
    pub reply: Result<String, ProviderError>,
    pub calls: Cell<usize>,
    pub prompts: RefCell<Vec<String>>,
}

impl MockScorer {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            calls: Cell::new(0),
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            reply: Err(error),
            calls: Cell::new(0),
            prompts: RefCell::new(Vec::new()),
        }
    }
}

impl ScoringPort for MockScorer {
    fn score(&self, prompt: &str) -> Result<String, ProviderError> {
        self.calls.set(self.calls.get() + 1);
        self.prompts.borrow_mut().push(prompt.to_string());
        self.reply.clone()
    }

    fn name(&self) -> &str {
        "mock-scorer"
    }
}

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Consecutive daily closes starting at 2024-01-01.
pub fn make_series(symbol: &str, closes: &[f64]) -> PriceSeries {
    let points = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint {
            date: start_date() + Duration::days(i as i64),
            close,
        })
        .collect();
    PriceSeries::from_unsorted(symbol, points)
}

/// 60 rising closes (100..159) then 14 declines of 0.5.
///
/// Ends above its 50-day average with a 14-day RSI of 0: technical score 90.
pub fn rally_then_pullback_closes() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
    let mut last = 159.0;
    for _ in 0..14 {
        last -= 0.5;
        closes.push(last);
    }
    closes
}

/// Same closes as CSV text with a `date,close` header.
pub fn closes_csv(closes: &[f64]) -> String {
    let mut out = String::from("date,close\n");
    for (i, close) in closes.iter().enumerate() {
        let date = start_date() + Duration::days(i as i64);
        out.push_str(&format!("{},{}\n", date.format("%Y-%m-%d"), close));
    }
    out
}

pub fn timeout(provider: &str) -> ProviderError {
    ProviderError::Timeout {
        provider: provider.to_string(),
    }
}

pub fn not_found(provider: &str, symbol: &str) -> ProviderError {
    ProviderError::NotFound {
        provider: provider.to_string(),
        symbol: symbol.to_string(),
    }
}
