//! Quantitative engine: risk and technical metrics from a closing-price series.

use crate::domain::config::QuantConfig;
use crate::domain::indicator::returns::{log_returns, mean, sample_stddev};
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::price_series::PriceSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct QuantMetrics {
    pub observations: usize,
    pub last_price: f64,
    /// Annualized standard deviation of daily log returns.
    pub volatility: f64,
    /// Sharpe-style excess annual return per unit of volatility.
    pub risk_adjusted_return: f64,
    /// RSI-style oscillator in [0, 100]; absent below the oscillator window.
    pub momentum_oscillator: Option<f64>,
    pub moving_average: Option<f64>,
    /// Composite score; absent below the moving-average window.
    pub technical_score: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct QuantEngine {
    config: QuantConfig,
}

impl QuantEngine {
    pub fn new(config: QuantConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QuantConfig {
        &self.config
    }

    /// Returns `None` for series with fewer than two observations.
    pub fn analyze(&self, series: &PriceSeries) -> Option<QuantMetrics> {
        if series.len() < 2 {
            tracing::debug!(
                symbol = series.symbol(),
                observations = series.len(),
                "series too short for quant metrics"
            );
            return None;
        }
        let last_price = series.last()?.close;

        let returns = log_returns(series);
        let volatility = self.volatility(&returns);
        let risk_adjusted_return = self.risk_adjusted_return(&returns, volatility);

        let momentum_oscillator = calculate_rsi(
            series,
            self.config.oscillator_window,
            self.config.epsilon,
        )
        .latest();
        let moving_average = calculate_sma(series, self.config.moving_average_window).latest();
        let technical_score = self.technical_score(last_price, moving_average, momentum_oscillator);

        Some(QuantMetrics {
            observations: series.len(),
            last_price,
            volatility,
            risk_adjusted_return,
            momentum_oscillator,
            moving_average,
            technical_score,
        })
    }

    fn volatility(&self, returns: &[f64]) -> f64 {
        // a single return has no sample deviation
        let daily = sample_stddev(returns).unwrap_or(0.0);
        let annual = daily * self.config.trading_days.sqrt();
        if annual.is_finite() {
            annual
        } else {
            tracing::warn!("non-finite volatility, substituting 0");
            0.0
        }
    }

    fn risk_adjusted_return(&self, returns: &[f64], volatility: f64) -> f64 {
        if volatility == 0.0 {
            return 0.0;
        }
        let annual_mean = mean(returns).unwrap_or(0.0) * self.config.trading_days;
        let ratio = (annual_mean - self.config.risk_free_rate) / volatility;
        if ratio.is_finite() {
            ratio
        } else {
            tracing::warn!("non-finite risk-adjusted return, substituting 0");
            0.0
        }
    }

    /// Trend and momentum vote around the neutral midpoint of 50.
    ///
    /// Undefined without a moving average. A missing oscillator only skips
    /// its own contribution.
    pub fn technical_score(
        &self,
        last_price: f64,
        moving_average: Option<f64>,
        oscillator: Option<f64>,
    ) -> Option<f64> {
        let ma = moving_average?;
        let step = self.config.signal_step;

        let mut score = 50.0;
        if last_price > ma {
            score += step;
        } else {
            score -= step;
        }

        match oscillator {
            Some(osc) if osc < self.config.oversold => score += step,
            Some(osc) if osc > self.config.overbought => score -= step,
            _ => {}
        }

        Some(score)
    }
}
