//! # Daily Returns
//!
//! $$
//! r_{t,i} = \frac{p_{t,i} - p_{t-1,i}}{p_{t-1,i}}
//! $$
//!
//! Converts a price table into daily percentage returns.

use ndarray::Array2;

use crate::analytics::error::AnalyticsError;
use crate::market::table::PriceTable;
use crate::market::table::ReturnsTable;

/// Daily percentage change per ticker. The output has exactly one fewer row
/// than the input; the first price date is dropped.
pub fn daily_returns(prices: &PriceTable) -> Result<ReturnsTable, AnalyticsError> {
  if prices.n_assets() == 0 {
    return Err(AnalyticsError::NoData(
      "price table has no tickers".to_string(),
    ));
  }
  if prices.n_rows() < 2 {
    return Err(AnalyticsError::NoData(format!(
      "need at least 2 price rows to compute returns, got {}",
      prices.n_rows()
    )));
  }

  let closes = prices.closes();
  let n_rows = prices.n_rows() - 1;
  let n_assets = prices.n_assets();

  let returns = Array2::from_shape_fn((n_rows, n_assets), |(t, i)| {
    let prev = closes[(t, i)];
    (closes[(t + 1, i)] - prev) / prev
  });

  Ok(ReturnsTable::new(
    prices.tickers().to_vec(),
    prices.dates()[1..].to_vec(),
    returns,
  ))
}
