//! Configuration validation.
//!
//! Validates config fields before any symbol is analysed. Absent keys are
//! fine (defaults apply); present keys must be in range.

use crate::domain::config::{MarketSource, PipelineConfig};
use crate::domain::error::HedgeboxError;
use crate::ports::config_port::ConfigPort;

/// Longest history window accepted, about a century of calendar days.
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;

/// Integer keys that are read as unsigned counts.
const UNSIGNED_KEYS: &[(&str, &str)] = &[
    ("market", "timeout_secs"),
    ("news", "limit"),
    ("news", "timeout_secs"),
    ("scoring", "timeout_secs"),
    ("scoring", "max_context_chars"),
    ("quant", "oscillator_window"),
    ("quant", "moving_average_window"),
];

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), HedgeboxError> {
    validate_market_source(config)?;
    validate_unsigned(config)?;

    let resolved = PipelineConfig::from_config(config);
    validate_market(&resolved)?;
    validate_quant(&resolved)?;
    validate_decision(&resolved)?;
    validate_sentiment(&resolved)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> HedgeboxError {
    HedgeboxError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_market_source(config: &dyn ConfigPort) -> Result<(), HedgeboxError> {
    let Some(source) = config.get_string("market", "source") else {
        return Ok(());
    };
    match MarketSource::parse(&source) {
        Some(MarketSource::Csv) => match config.get_string("market", "csv_dir") {
            Some(dir) if !dir.trim().is_empty() => Ok(()),
            _ => Err(HedgeboxError::ConfigMissing {
                section: "market".to_string(),
                key: "csv_dir".to_string(),
            }),
        },
        Some(MarketSource::Yahoo) => Ok(()),
        None => Err(invalid("market", "source", "source must be yahoo or csv")),
    }
}

fn validate_unsigned(config: &dyn ConfigPort) -> Result<(), HedgeboxError> {
    for &(section, key) in UNSIGNED_KEYS {
        if config.get_int(section, key, 0) < 0 {
            return Err(invalid(section, key, &format!("{key} must not be negative")));
        }
    }
    Ok(())
}

fn validate_market(config: &PipelineConfig) -> Result<(), HedgeboxError> {
    if config.market.lookback_days <= 0 {
        return Err(invalid(
            "market",
            "lookback_days",
            "lookback_days must be positive",
        ));
    }
    if config.market.lookback_days > MAX_LOOKBACK_DAYS {
        return Err(invalid(
            "market",
            "lookback_days",
            &format!("lookback_days must be at most {MAX_LOOKBACK_DAYS}"),
        ));
    }
    if config.market.timeout_secs == 0 {
        return Err(invalid("market", "timeout_secs", "timeout_secs must be positive"));
    }
    if config.news.timeout_secs == 0 {
        return Err(invalid("news", "timeout_secs", "timeout_secs must be positive"));
    }
    if config.scoring.timeout_secs == 0 {
        return Err(invalid("scoring", "timeout_secs", "timeout_secs must be positive"));
    }
    Ok(())
}

fn validate_quant(config: &PipelineConfig) -> Result<(), HedgeboxError> {
    let q = &config.quant;
    if !(0.0..1.0).contains(&q.risk_free_rate) {
        return Err(invalid(
            "quant",
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        ));
    }
    if q.trading_days <= 0.0 {
        return Err(invalid("quant", "trading_days", "trading_days must be positive"));
    }
    if q.oscillator_window < 2 {
        return Err(invalid(
            "quant",
            "oscillator_window",
            "oscillator_window must be at least 2",
        ));
    }
    if q.moving_average_window < 2 {
        return Err(invalid(
            "quant",
            "moving_average_window",
            "moving_average_window must be at least 2",
        ));
    }
    if !(0.0..=100.0).contains(&q.oversold)
        || !(0.0..=100.0).contains(&q.overbought)
        || q.oversold >= q.overbought
    {
        return Err(invalid(
            "quant",
            "oversold",
            "oversold must be below overbought, both within 0-100",
        ));
    }
    if q.signal_step < 0.0 {
        return Err(invalid("quant", "signal_step", "signal_step must be non-negative"));
    }
    if q.epsilon <= 0.0 {
        return Err(invalid("quant", "epsilon", "epsilon must be positive"));
    }
    Ok(())
}

fn validate_decision(config: &PipelineConfig) -> Result<(), HedgeboxError> {
    let d = &config.decision;
    if d.technical_weight < 0.0 {
        return Err(invalid(
            "decision",
            "technical_weight",
            "technical_weight must be non-negative",
        ));
    }
    if d.sentiment_weight < 0.0 {
        return Err(invalid(
            "decision",
            "sentiment_weight",
            "sentiment_weight must be non-negative",
        ));
    }
    if d.technical_weight + d.sentiment_weight <= 0.0 {
        return Err(invalid(
            "decision",
            "technical_weight",
            "weights must not both be zero",
        ));
    }
    if d.sell_threshold >= d.buy_threshold {
        return Err(invalid(
            "decision",
            "sell_threshold",
            "sell_threshold must be below buy_threshold",
        ));
    }
    Ok(())
}

fn validate_sentiment(config: &PipelineConfig) -> Result<(), HedgeboxError> {
    if config.sentiment.max_context_chars == 0 {
        return Err(invalid(
            "scoring",
            "max_context_chars",
            "max_context_chars must be positive",
        ));
    }
    Ok(())
}
