//! # Price Series Provider
//!
//! Contract for the external market-data collaborator. The analytics core
//! only consumes the resulting [`PriceTable`]; where the closes come from
//! (a vendor API, a cache, a fixture) is the caller's business.

use crate::analytics::error::AnalyticsError;
use crate::market::table::DateRange;
use crate::market::table::PriceTable;

/// Source of historical daily closes.
///
/// Implementations may block on network I/O; the analytics engine treats
/// this as the single slow call of the pipeline. A ticker with no data in
/// the window simply has no column in the result.
pub trait PriceSeriesProvider {
  /// Closing prices for `tickers` over `range`, aligned on a common
  /// ascending date index.
  fn closing_prices(
    &self,
    tickers: &[&str],
    range: &DateRange,
  ) -> Result<PriceTable, AnalyticsError>;
}

/// Snapshot-backed provider serving slices of a preloaded table. Used by
/// tests and demos, and as the adapter point for hosts that fetch prices
/// upfront.
#[derive(Clone, Debug)]
pub struct FixedPriceProvider {
  table: PriceTable,
}

impl FixedPriceProvider {
  /// Wrap a preloaded price table.
  pub fn new(table: PriceTable) -> Self {
    Self { table }
  }
}

impl PriceSeriesProvider for FixedPriceProvider {
  fn closing_prices(
    &self,
    tickers: &[&str],
    range: &DateRange,
  ) -> Result<PriceTable, AnalyticsError> {
    Ok(self.table.select(tickers).select_range(range))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDate;

  fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
  }

  #[test]
  fn fixed_provider_slices_tickers_and_range() {
    let table = PriceTable::from_columns(
      vec![d(1), d(2), d(3)],
      vec![
        ("AAPL".to_string(), vec![100.0, 101.0, 102.0]),
        ("MSFT".to_string(), vec![200.0, 202.0, 204.0]),
      ],
    )
    .unwrap();
    let provider = FixedPriceProvider::new(table);

    let range = DateRange::new(d(2), d(3)).unwrap();
    let prices = provider.closing_prices(&["MSFT"], &range).unwrap();

    assert_eq!(prices.tickers(), &["MSFT".to_string()]);
    assert_eq!(prices.n_rows(), 2);
    assert_eq!(prices.closes()[(0, 0)], 202.0);
  }

  #[test]
  fn unknown_tickers_yield_empty_table() {
    let table = PriceTable::from_columns(
      vec![d(1), d(2)],
      vec![("AAPL".to_string(), vec![100.0, 101.0])],
    )
    .unwrap();
    let provider = FixedPriceProvider::new(table);

    let range = DateRange::new(d(1), d(2)).unwrap();
    let prices = provider.closing_prices(&["NOPE"], &range).unwrap();
    assert!(prices.is_empty());
  }
}
