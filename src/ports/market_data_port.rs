//! Market data access port trait.

use crate::domain::error::ProviderError;
use crate::domain::price_series::PriceSeries;

pub trait MarketDataPort {
    /// Daily closes for `symbol` covering the trailing `lookback_days` calendar days.
    ///
    /// An empty series is a valid answer and means "no data available".
    fn fetch_closes(&self, symbol: &str, lookback_days: i64) -> Result<PriceSeries, ProviderError>;

    fn name(&self) -> &str;
}
