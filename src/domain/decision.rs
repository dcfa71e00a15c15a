//! Decision engine: weighted fusion of technical and sentiment scores.

use crate::domain::config::DecisionConfig;
use crate::domain::quant::QuantMetrics;
use crate::domain::sentiment::SentimentResult;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Buy,
    Hold,
    Sell,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Hold => write!(f, "HOLD"),
            Action::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub final_score: f64,
    /// `final_score` clamped to [0, 100].
    pub confidence: f64,
}

#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    config: DecisionConfig,
}

impl DecisionEngine {
    pub fn new(config: DecisionConfig) -> Self {
        Self { config }
    }

    /// Map a sentiment score from [-1, 1] onto [0, 100].
    pub fn normalize_sentiment(score: f64) -> f64 {
        (score + 1.0) * 50.0
    }

    pub fn decide(&self, quant: Option<&QuantMetrics>, sentiment: &SentimentResult) -> Decision {
        let technical = quant
            .and_then(|q| q.technical_score)
            .unwrap_or(self.config.neutral_technical);
        let sentiment_norm = Self::normalize_sentiment(sentiment.score);

        let final_score = technical * self.config.technical_weight
            + sentiment_norm * self.config.sentiment_weight;

        Decision {
            action: self.classify(final_score),
            final_score,
            confidence: final_score.clamp(0.0, 100.0),
        }
    }

    /// Thresholds are exclusive: a score equal to either one holds.
    pub fn classify(&self, final_score: f64) -> Action {
        if final_score > self.config.buy_threshold {
            Action::Buy
        } else if final_score < self.config.sell_threshold {
            Action::Sell
        } else {
            Action::Hold
        }
    }
}
