//! Momentum oscillator (RSI-style) with simple rolling means.
//!
//! - delta[0] = 0, delta[i] = C[i] - C[i-1]
//! - avg_gain / avg_loss: plain mean of the trailing n gains / loss magnitudes
//! - RSI = 100 - 100 / (1 + avg_gain / (avg_loss + epsilon))
//!
//! Unlike Wilder smoothing there is no carry-over between windows. The
//! epsilon keeps the ratio finite when the window holds no losses.
//! Warmup: first (n-1) points are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price_series::PriceSeries;

pub fn calculate_rsi(series: &PriceSeries, period: usize, epsilon: f64) -> IndicatorSeries {
    let points = series.points();
    if period == 0 {
        return IndicatorSeries {
            indicator_type: IndicatorType::Rsi(period),
            values: points
                .iter()
                .map(|p| IndicatorPoint {
                    date: p.date,
                    valid: false,
                    value: 0.0,
                })
                .collect(),
        };
    }

    let mut gains = Vec::with_capacity(points.len());
    let mut losses = Vec::with_capacity(points.len());
    for i in 0..points.len() {
        let change = if i == 0 {
            0.0
        } else {
            points[i].close - points[i - 1].close
        };
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let mut values = Vec::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        if i + 1 < period {
            values.push(IndicatorPoint {
                date: p.date,
                valid: false,
                value: 0.0,
            });
            continue;
        }

        let start = i + 1 - period;
        let avg_gain = gains[start..=i].iter().sum::<f64>() / period as f64;
        let avg_loss = losses[start..=i].iter().sum::<f64>() / period as f64;
        let rs = avg_gain / (avg_loss + epsilon);
        let rsi = 100.0 - 100.0 / (1.0 + rs);

        values.push(IndicatorPoint {
            date: p.date,
            valid: rsi.is_finite(),
            value: rsi,
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}
