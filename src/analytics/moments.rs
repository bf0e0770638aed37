//! # Annualized Moments
//!
//! $$
//! \mu_i = 252\,\bar r_i,\qquad
//! \Sigma_{ij} = \frac{252}{n-1}\sum_t (r_{t,i}-\bar r_i)(r_{t,j}-\bar r_j)
//! $$
//!
//! Expected-return vector and covariance matrix estimated from daily
//! returns, scaled to annual terms.

use std::collections::BTreeMap;

use ndarray::Array1;
use ndarray::Array2;
use ndarray::Axis;
use ndarray_stats::CorrelationExt;

use crate::analytics::error::AnalyticsError;
use crate::market::table::ReturnsTable;

/// Annualization factor used throughout the crate.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Annualized first and second moments of a set of assets. `mu` and the
/// rows/columns of `cov` are aligned to `tickers`; `cov` is symmetric with
/// variances on the diagonal.
#[derive(Clone, Debug)]
pub struct Moments {
  /// Ticker labels fixing the asset ordering.
  pub tickers: Vec<String>,
  /// Annualized expected returns.
  pub mu: Array1<f64>,
  /// Annualized covariance matrix.
  pub cov: Array2<f64>,
}

impl Moments {
  /// Number of assets.
  pub fn n_assets(&self) -> usize {
    self.tickers.len()
  }

  /// Annualized per-asset volatilities, `sqrt(diag(cov))` with negative
  /// floating-point noise clamped to zero.
  pub fn asset_volatilities(&self) -> Array1<f64> {
    Array1::from_iter((0..self.n_assets()).map(|i| self.cov[(i, i)].max(0.0).sqrt()))
  }

  /// Expected returns keyed by ticker.
  pub fn mu_by_ticker(&self) -> BTreeMap<String, f64> {
    self
      .tickers
      .iter()
      .zip(self.mu.iter())
      .map(|(t, &m)| (t.clone(), m))
      .collect()
  }

  /// Covariance entries keyed by ticker pair.
  pub fn cov_by_ticker(&self) -> BTreeMap<String, BTreeMap<String, f64>> {
    self
      .tickers
      .iter()
      .enumerate()
      .map(|(i, ti)| {
        let row = self
          .tickers
          .iter()
          .enumerate()
          .map(|(j, tj)| (tj.clone(), self.cov[(i, j)]))
          .collect();
        (ti.clone(), row)
      })
      .collect()
  }
}

/// Estimate annualized moments from daily returns.
///
/// The expected return is the simple (not geometric) daily mean scaled by
/// `trading_days`; the covariance uses the unbiased `n-1` convention, also
/// scaled by `trading_days`. At least two return observations are required.
pub fn estimate(returns: &ReturnsTable, trading_days: f64) -> Result<Moments, AnalyticsError> {
  if returns.n_assets() == 0 {
    return Err(AnalyticsError::NoData(
      "returns table has no tickers".to_string(),
    ));
  }
  if returns.n_rows() < 2 {
    return Err(AnalyticsError::NoData(format!(
      "need at least 2 return observations to estimate moments, got {}",
      returns.n_rows()
    )));
  }

  let daily = returns.returns();
  let mu = daily
    .mean_axis(Axis(0))
    .ok_or_else(|| AnalyticsError::NoData("returns table is empty".to_string()))?
    * trading_days;

  // CorrelationExt expects variables on rows, observations on columns.
  let cov = daily
    .t()
    .cov(1.0)
    .map_err(|_| AnalyticsError::NoData("returns table is empty".to_string()))?
    * trading_days;

  Ok(Moments {
    tickers: returns.tickers().to_vec(),
    mu,
    cov,
  })
}
