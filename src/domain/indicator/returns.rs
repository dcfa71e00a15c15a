//! Log returns and their summary statistics.

use crate::domain::price_series::PriceSeries;

/// r[t] = ln(C[t] / C[t-1]) for every consecutive pair.
pub fn log_returns(series: &PriceSeries) -> Vec<f64> {
    series
        .closes()
        .windows(2)
        .map(|w| (w[1] / w[0]).ln())
        .collect()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator). Undefined below two values.
pub fn sample_stddev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}
