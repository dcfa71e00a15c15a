//! Pipeline configuration value objects.
//!
//! Every tunable constant of the engines lives here with its default, so a
//! config file (or a test) can override any of them.

use crate::ports::config_port::ConfigPort;

#[derive(Debug, Clone, PartialEq)]
pub struct QuantConfig {
    /// Annual risk-free rate subtracted from the annualized mean return.
    pub risk_free_rate: f64,
    /// Trading days per year used for annualization.
    pub trading_days: f64,
    pub oscillator_window: usize,
    pub moving_average_window: usize,
    pub oversold: f64,
    pub overbought: f64,
    /// Points added or removed per trend / momentum signal.
    pub signal_step: f64,
    /// Guard added to the mean loss before dividing.
    pub epsilon: f64,
}

impl Default for QuantConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.04,
            trading_days: 252.0,
            oscillator_window: 14,
            moving_average_window: 50,
            oversold: 30.0,
            overbought: 70.0,
            signal_step: 20.0,
            epsilon: 1e-9,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentConfig {
    pub max_context_chars: usize,
    pub max_rationale_chars: usize,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            max_context_chars: 4000,
            max_rationale_chars: 280,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionConfig {
    pub technical_weight: f64,
    pub sentiment_weight: f64,
    pub buy_threshold: f64,
    pub sell_threshold: f64,
    /// Technical score assumed when quant metrics are absent.
    pub neutral_technical: f64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            technical_weight: 0.6,
            sentiment_weight: 0.4,
            buy_threshold: 65.0,
            sell_threshold: 35.0,
            neutral_technical: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketSource {
    Yahoo,
    Csv,
}

impl MarketSource {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "yahoo" => Some(MarketSource::Yahoo),
            "csv" => Some(MarketSource::Csv),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketSettings {
    pub source: MarketSource,
    pub csv_dir: Option<String>,
    pub lookback_days: i64,
    pub timeout_secs: u64,
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            source: MarketSource::Yahoo,
            csv_dir: None,
            lookback_days: 365,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewsSettings {
    pub api_key: Option<String>,
    pub limit: usize,
    pub timeout_secs: u64,
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            limit: 3,
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineConfig {
    pub market: MarketSettings,
    pub news: NewsSettings,
    pub scoring: ScoringSettings,
    pub quant: QuantConfig,
    pub sentiment: SentimentConfig,
    pub decision: DecisionConfig,
}

impl PipelineConfig {
    /// Read every section, falling back to defaults for absent keys.
    ///
    /// Call [`validate_config`](crate::domain::config_validation::validate_config)
    /// on the same source first; an unknown `[market] source` falls back to Yahoo here.
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let d = PipelineConfig::default();

        let market = MarketSettings {
            source: config
                .get_string("market", "source")
                .and_then(|s| MarketSource::parse(&s))
                .unwrap_or(d.market.source),
            csv_dir: non_blank(config.get_string("market", "csv_dir")),
            lookback_days: config.get_int("market", "lookback_days", d.market.lookback_days),
            timeout_secs: get_u64(config, "market", "timeout_secs", d.market.timeout_secs),
        };

        let news = NewsSettings {
            api_key: non_blank(config.get_string("news", "api_key")),
            limit: get_usize(config, "news", "limit", d.news.limit),
            timeout_secs: get_u64(config, "news", "timeout_secs", d.news.timeout_secs),
        };

        let scoring = ScoringSettings {
            api_key: non_blank(config.get_string("scoring", "api_key")),
            model: non_blank(config.get_string("scoring", "model")).unwrap_or(d.scoring.model),
            timeout_secs: get_u64(config, "scoring", "timeout_secs", d.scoring.timeout_secs),
        };

        let q = d.quant;
        let quant = QuantConfig {
            risk_free_rate: config.get_double("quant", "risk_free_rate", q.risk_free_rate),
            trading_days: config.get_double("quant", "trading_days", q.trading_days),
            oscillator_window: get_usize(config, "quant", "oscillator_window", q.oscillator_window),
            moving_average_window: get_usize(
                config,
                "quant",
                "moving_average_window",
                q.moving_average_window,
            ),
            oversold: config.get_double("quant", "oversold", q.oversold),
            overbought: config.get_double("quant", "overbought", q.overbought),
            signal_step: config.get_double("quant", "signal_step", q.signal_step),
            epsilon: config.get_double("quant", "epsilon", q.epsilon),
        };

        let sentiment = SentimentConfig {
            max_context_chars: get_usize(
                config,
                "scoring",
                "max_context_chars",
                d.sentiment.max_context_chars,
            ),
            max_rationale_chars: d.sentiment.max_rationale_chars,
        };

        let dc = d.decision;
        let decision = DecisionConfig {
            technical_weight: config.get_double(
                "decision",
                "technical_weight",
                dc.technical_weight,
            ),
            sentiment_weight: config.get_double(
                "decision",
                "sentiment_weight",
                dc.sentiment_weight,
            ),
            buy_threshold: config.get_double("decision", "buy_threshold", dc.buy_threshold),
            sell_threshold: config.get_double("decision", "sell_threshold", dc.sell_threshold),
            neutral_technical: dc.neutral_technical,
        };

        PipelineConfig {
            market,
            news,
            scoring,
            quant,
            sentiment,
            decision,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn get_usize(config: &dyn ConfigPort, section: &str, key: &str, default: usize) -> usize {
    usize::try_from(config.get_int(section, key, default as i64)).unwrap_or(default)
}

fn get_u64(config: &dyn ConfigPort, section: &str, key: &str, default: u64) -> u64 {
    u64::try_from(config.get_int(section, key, default as i64)).unwrap_or(default)
}
