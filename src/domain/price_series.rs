//! Daily closing-price series.

use chrono::{NaiveDate, TimeDelta};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Closing prices ordered strictly by date.
///
/// Every close is positive and finite and no date appears twice. Gaps
/// (holidays, missing sessions) are allowed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Normalising constructor for raw provider rows: sorts by date, drops
    /// unusable closes and keeps the last close seen for a repeated date.
    pub fn from_unsorted(symbol: &str, mut points: Vec<PricePoint>) -> Self {
        points.retain(|p| valid_close(p.close));
        points.sort_by_key(|p| p.date);

        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for p in points {
            match deduped.last_mut() {
                Some(last) if last.date == p.date => *last = p,
                _ => deduped.push(p),
            }
        }

        Self {
            symbol: symbol.to_string(),
            points: deduped,
        }
    }

    pub fn empty(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            points: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Keep only points dated within `days` calendar days of the latest point.
    ///
    /// A window reaching past the earliest representable date keeps everything.
    pub fn trailing_days(&self, days: i64) -> Self {
        let Some(last) = self.points.last() else {
            return self.clone();
        };
        let Some(cutoff) = TimeDelta::try_days(days).and_then(|d| last.date.checked_sub_signed(d))
        else {
            return self.clone();
        };
        Self {
            symbol: self.symbol.clone(),
            points: self
                .points
                .iter()
                .copied()
                .filter(|p| p.date > cutoff)
                .collect(),
        }
    }
}

fn valid_close(close: f64) -> bool {
    close.is_finite() && close > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(date: &str, close: f64) -> PricePoint {
        PricePoint {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            close,
        }
    }

    #[test]
    fn from_unsorted_keeps_ordered_input() {
        let series = PriceSeries::from_unsorted(
            "AAPL",
            vec![point("2024-01-02", 100.0), point("2024-01-04", 101.5)],
        );
        assert_eq!(series.len(), 2);
        assert_eq!(series.symbol(), "AAPL");
        assert_eq!(series.closes(), vec![100.0, 101.5]);
    }

    #[test]
    fn from_unsorted_drops_unusable_closes() {
        let series = PriceSeries::from_unsorted(
            "AAPL",
            vec![
                point("2024-01-02", 0.0),
                point("2024-01-03", f64::NAN),
                point("2024-01-04", f64::INFINITY),
                point("2024-01-05", 12.0),
            ],
        );
        assert_eq!(series.closes(), vec![12.0]);
    }

    #[test]
    fn from_unsorted_sorts_and_dedups() {
        let series = PriceSeries::from_unsorted(
            "BTC-USD",
            vec![
                point("2024-01-03", 30.0),
                point("2024-01-01", 10.0),
                point("2024-01-03", 31.0),
                point("2024-01-02", -5.0),
                point("2024-01-02", 20.0),
            ],
        );
        assert_eq!(series.closes(), vec![10.0, 20.0, 31.0]);
        assert!(series.points().windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn trailing_days_keeps_recent_window() {
        let series = PriceSeries::from_unsorted(
            "X",
            vec![
                point("2023-01-01", 1.0),
                point("2023-12-31", 2.0),
                point("2024-06-30", 3.0),
            ],
        );
        let recent = series.trailing_days(365);
        assert_eq!(recent.closes(), vec![2.0, 3.0]);
    }

    #[test]
    fn trailing_days_beyond_calendar_keeps_everything() {
        let series = PriceSeries::from_unsorted(
            "X",
            vec![point("2023-01-01", 1.0), point("2024-06-30", 3.0)],
        );
        assert_eq!(series.trailing_days(1_000_000_000), series);
        assert_eq!(series.trailing_days(i64::MAX), series);
    }

    #[test]
    fn trailing_days_on_empty() {
        assert!(PriceSeries::empty("X").trailing_days(30).is_empty());
    }
}
