//! Pipeline orchestration: one symbol in, one outcome out.
//!
//! Stages run strictly in order: prices, quant metrics, news, sentiment,
//! decision. This is the only place collaborator failures are classified.

use crate::domain::config::PipelineConfig;
use crate::domain::decision::{Decision, DecisionEngine};
use crate::domain::error::ProviderError;
use crate::domain::news::NewsItem;
use crate::domain::quant::{QuantEngine, QuantMetrics};
use crate::domain::sentiment::{SentimentEngine, SentimentResult};
use crate::ports::market_data_port::MarketDataPort;
use crate::ports::news_port::NewsPort;
use crate::ports::scoring_port::ScoringPort;

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub symbol: String,
    pub quant: Option<QuantMetrics>,
    pub sentiment: SentimentResult,
    pub decision: Decision,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Decided(Snapshot),
    NoData { symbol: String, reason: String },
    Failed { symbol: String, error: ProviderError },
}

impl RunOutcome {
    pub fn symbol(&self) -> &str {
        match self {
            RunOutcome::Decided(s) => &s.symbol,
            RunOutcome::NoData { symbol, .. } | RunOutcome::Failed { symbol, .. } => symbol,
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            RunOutcome::Decided(s) => Some(s),
            _ => None,
        }
    }
}

pub struct PipelineOrchestrator<'a> {
    market: &'a dyn MarketDataPort,
    news: &'a dyn NewsPort,
    lookback_days: i64,
    news_limit: usize,
    quant: QuantEngine,
    sentiment: SentimentEngine<'a>,
    decision: DecisionEngine,
}

impl<'a> PipelineOrchestrator<'a> {
    pub fn new(
        config: &PipelineConfig,
        market: &'a dyn MarketDataPort,
        news: &'a dyn NewsPort,
        scorer: Option<&'a dyn ScoringPort>,
    ) -> Self {
        Self {
            market,
            news,
            lookback_days: config.market.lookback_days,
            news_limit: config.news.limit,
            quant: QuantEngine::new(config.quant.clone()),
            sentiment: SentimentEngine::new(config.sentiment.clone(), scorer),
            decision: DecisionEngine::new(config.decision.clone()),
        }
    }

    pub fn run(&self, symbol: &str) -> RunOutcome {
        tracing::info!(symbol, source = self.market.name(), "fetching market data");
        let series = match self.market.fetch_closes(symbol, self.lookback_days) {
            Ok(series) if series.is_empty() => {
                tracing::warn!(symbol, "empty price series");
                return RunOutcome::NoData {
                    symbol: symbol.to_string(),
                    reason: "no price data returned".to_string(),
                };
            }
            Ok(series) => series,
            Err(e) if e.is_no_data() => {
                tracing::warn!(symbol, "no price data: {e}");
                return RunOutcome::NoData {
                    symbol: symbol.to_string(),
                    reason: e.to_string(),
                };
            }
            Err(e) => {
                tracing::warn!(symbol, "price fetch failed: {e}");
                return RunOutcome::Failed {
                    symbol: symbol.to_string(),
                    error: e,
                };
            }
        };

        tracing::info!(symbol, observations = series.len(), "computing risk and indicators");
        let quant = self.quant.analyze(&series);

        let news = self.fetch_news(symbol);
        let sentiment = self.sentiment.analyze(&news);

        let decision = self.decision.decide(quant.as_ref(), &sentiment);
        tracing::info!(
            symbol,
            action = %decision.action,
            score = decision.final_score,
            "decision made"
        );

        RunOutcome::Decided(Snapshot {
            symbol: symbol.to_string(),
            quant,
            sentiment,
            decision,
        })
    }

    /// Sequential batch; each symbol is isolated from the others.
    pub fn run_batch(&self, symbols: &[String]) -> Vec<RunOutcome> {
        symbols.iter().map(|s| self.run(s)).collect()
    }

    fn fetch_news(&self, symbol: &str) -> Vec<NewsItem> {
        tracing::info!(symbol, source = self.news.name(), "searching news");
        match self.news.search(symbol, self.news_limit) {
            Ok(mut items) => {
                items.truncate(self.news_limit);
                items
            }
            Err(e) => {
                tracing::warn!(symbol, "news search failed, continuing without news: {e}");
                Vec::new()
            }
        }
    }
}
