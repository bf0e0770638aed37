//! # Analytics Engine
//!
//! $$
//! \text{prices} \to r \to (\mu,\Sigma) \to w_{\text{tan}} \to \text{report}
//! $$
//!
//! Facade orchestrating the full mean-variance pipeline for one analysis
//! request. Stateless: every invocation works on freshly derived values and
//! may run concurrently with others.

use std::collections::BTreeMap;

use rand::Rng;
use tracing::info;

use crate::analytics::error::AnalyticsError;
use crate::analytics::frontier::frontier_constants;
use crate::analytics::frontier::min_variance_frontier;
use crate::analytics::frontier::portfolio_moments;
use crate::analytics::frontier::sharpe_ratio;
use crate::analytics::frontier::tangency_portfolio;
use crate::analytics::frontier::FrontierPoint;
use crate::analytics::linalg::InversionStrategy;
use crate::analytics::moments::estimate;
use crate::analytics::moments::Moments;
use crate::analytics::moments::TRADING_DAYS_PER_YEAR;
use crate::analytics::returns::daily_returns;
use crate::analytics::sampling::sample_random_portfolios;
use crate::market::provider::PriceSeriesProvider;
use crate::market::table::DateRange;
use crate::visualization::AssetPoint;
use crate::visualization::CmlLine;
use crate::visualization::MarkowitzBullet;

/// Headroom applied above the largest return/volatility when choosing plot
/// bounds.
const PLOT_MARGIN: f64 = 1.1;

/// Tuning knobs of one analysis run.
#[derive(Clone, Copy, Debug)]
pub struct AnalyticsConfig {
  /// Risk-free rate used for the tangency portfolio and Sharpe ratio.
  pub risk_free_rate: f64,
  /// Annualization factor for the moment estimates.
  pub trading_days: f64,
  /// Size of the random portfolio cloud.
  pub n_simulations: usize,
  /// Samples per frontier branch and along the CML.
  pub frontier_points: usize,
  /// Singular-covariance handling for all inversions in the run.
  pub inversion: InversionStrategy,
}

impl Default for AnalyticsConfig {
  fn default() -> Self {
    Self {
      risk_free_rate: 0.02,
      trading_days: TRADING_DAYS_PER_YEAR,
      n_simulations: 5000,
      frontier_points: 100,
      inversion: InversionStrategy::PseudoFallback,
    }
  }
}

/// Full result of one analysis: moment summaries keyed by ticker, the
/// tangency portfolio with its Sharpe ratio, and the numeric payload for
/// the rendering collaborator.
#[derive(Clone, Debug)]
pub struct AnalysisReport {
  /// Asset ordering shared by all vectors in the report.
  pub tickers: Vec<String>,
  /// Annualized expected return per ticker.
  pub expected_returns: BTreeMap<String, f64>,
  /// Annualized covariance per ticker pair.
  pub covariance: BTreeMap<String, BTreeMap<String, f64>>,
  /// Tangency weight per ticker; may be negative (short).
  pub tangency_weights: BTreeMap<String, f64>,
  /// Sharpe ratio of the tangency portfolio.
  pub sharpe_ratio: f64,
  /// Tangency portfolio in mean-volatility space.
  pub tangency: FrontierPoint,
  /// True when any inversion fell back to the pseudo-inverse; the numbers
  /// are approximate.
  pub degraded: bool,
  /// Rendering payload for the Markowitz bullet chart.
  pub bullet: MarkowitzBullet,
}

/// Stateless orchestrator for analysis requests.
#[derive(Clone, Debug, Default)]
pub struct AnalyticsEngine {
  config: AnalyticsConfig,
}

impl AnalyticsEngine {
  /// Construct an engine with explicit configuration.
  pub fn new(config: AnalyticsConfig) -> Self {
    Self { config }
  }

  /// Borrow engine configuration.
  pub fn config(&self) -> &AnalyticsConfig {
    &self.config
  }

  /// Run the full pipeline: fetch prices for `tickers` over `range`, derive
  /// returns and moments, solve the tangency portfolio and assemble the
  /// report. Fails fast on empty data, an undefined tangency or a
  /// degenerate frontier.
  pub fn analyze<P>(
    &self,
    provider: &P,
    tickers: &[&str],
    range: &DateRange,
  ) -> Result<AnalysisReport, AnalyticsError>
  where
    P: PriceSeriesProvider + ?Sized,
  {
    self.analyze_using(&mut rand::thread_rng(), provider, tickers, range)
  }

  /// [`Self::analyze`] with an injected random source for reproducible
  /// clouds.
  pub fn analyze_using<R, P>(
    &self,
    rng: &mut R,
    provider: &P,
    tickers: &[&str],
    range: &DateRange,
  ) -> Result<AnalysisReport, AnalyticsError>
  where
    R: Rng + ?Sized,
    P: PriceSeriesProvider + ?Sized,
  {
    let prices = provider.closing_prices(tickers, range)?;
    if prices.is_empty() {
      return Err(AnalyticsError::NoData(format!(
        "no historical data for {tickers:?} in {range}"
      )));
    }

    let returns = daily_returns(&prices)?;
    let moments = estimate(&returns, self.config.trading_days)?;
    self.analyze_moments_using(rng, &moments)
  }

  /// Analyze precomputed moments with a thread-local random source.
  pub fn analyze_moments(&self, moments: &Moments) -> Result<AnalysisReport, AnalyticsError> {
    self.analyze_moments_using(&mut rand::thread_rng(), moments)
  }

  /// Core of the pipeline, downstream of moment estimation.
  pub fn analyze_moments_using<R: Rng + ?Sized>(
    &self,
    rng: &mut R,
    moments: &Moments,
  ) -> Result<AnalysisReport, AnalyticsError> {
    let r_f = self.config.risk_free_rate;

    // A collapsed covariance structure makes the whole analysis
    // meaningless; reject it before solving for the tangency portfolio.
    let constants = frontier_constants(&moments.mu, &moments.cov, self.config.inversion)?;
    let discriminant = constants.discriminant();
    if discriminant <= 0.0 {
      return Err(AnalyticsError::DegenerateFrontier { discriminant });
    }

    let tangency = tangency_portfolio(&moments.mu, &moments.cov, r_f, self.config.inversion)?;
    let (mu_tan, sigma_tan) = portfolio_moments(&tangency.weights, &moments.mu, &moments.cov);
    let sharpe = sharpe_ratio(mu_tan, sigma_tan, r_f)?;

    info!(sharpe, mu_tan, sigma_tan, "tangency portfolio solved");

    let mu_high = moments.mu.iter().copied().fold(f64::MIN, f64::max);
    let y_max = PLOT_MARGIN * mu_high.max(mu_tan);
    let frontier = min_variance_frontier(
      &moments.mu,
      &moments.cov,
      y_max,
      self.config.frontier_points,
      self.config.inversion,
    )?;

    let cloud = sample_random_portfolios(rng, &moments.mu, &moments.cov, self.config.n_simulations);

    let asset_sigmas = moments.asset_volatilities();
    let assets: Vec<AssetPoint> = moments
      .tickers
      .iter()
      .zip(asset_sigmas.iter())
      .zip(moments.mu.iter())
      .map(|((ticker, &sigma), &mu)| AssetPoint {
        ticker: ticker.clone(),
        sigma,
        mu,
      })
      .collect();

    let sigma_high = asset_sigmas.iter().copied().fold(sigma_tan, f64::max);
    let cml = CmlLine::sample(r_f, sharpe, PLOT_MARGIN * sigma_high, self.config.frontier_points);

    let degraded = tangency.degraded || frontier.degraded;
    let tangency_point = FrontierPoint {
      sigma: sigma_tan,
      mu: mu_tan,
    };

    let tangency_weights = moments
      .tickers
      .iter()
      .zip(tangency.weights.iter())
      .map(|(t, &w)| (t.clone(), w))
      .collect();

    Ok(AnalysisReport {
      tickers: moments.tickers.clone(),
      expected_returns: moments.mu_by_ticker(),
      covariance: moments.cov_by_ticker(),
      tangency_weights,
      sharpe_ratio: sharpe,
      tangency: tangency_point,
      degraded,
      bullet: MarkowitzBullet {
        assets,
        random_cloud: cloud,
        frontier,
        cml,
        tangency: tangency_point,
      },
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use approx::assert_relative_eq;
  use chrono::NaiveDate;
  use ndarray::arr1;
  use ndarray::arr2;
  use ndarray::Array2;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  use crate::market::provider::FixedPriceProvider;
  use crate::market::table::PriceTable;
  use crate::market::table::ReturnsTable;

  fn provider(columns: Vec<(&str, Vec<f64>)>) -> (FixedPriceProvider, DateRange) {
    let n = columns[0].1.len();
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let dates: Vec<NaiveDate> = (0..n)
      .map(|i| start + chrono::Duration::days(i as i64))
      .collect();
    let range = DateRange::new(dates[0], dates[n - 1]).unwrap();
    let table = PriceTable::from_columns(
      dates,
      columns
        .into_iter()
        .map(|(t, c)| (t.to_string(), c))
        .collect(),
    )
    .unwrap();
    (FixedPriceProvider::new(table), range)
  }

  fn wiggly_prices(seed: u64, start: f64, n: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut prices = Vec::with_capacity(n);
    let mut p = start;
    for _ in 0..n {
      prices.push(p);
      p *= 1.0 + rng.gen_range(-0.02..0.025);
    }
    prices
  }

  fn small_config() -> AnalyticsConfig {
    AnalyticsConfig {
      n_simulations: 200,
      frontier_points: 50,
      ..AnalyticsConfig::default()
    }
  }

  #[test]
  fn end_to_end_report_is_consistent() {
    let (provider, range) = provider(vec![
      ("AAPL", wiggly_prices(1, 150.0, 120)),
      ("MSFT", wiggly_prices(2, 300.0, 120)),
      ("GOOG", wiggly_prices(3, 120.0, 120)),
    ]);
    let engine = AnalyticsEngine::new(small_config());
    let mut rng = StdRng::seed_from_u64(5);

    let report = engine
      .analyze_using(&mut rng, &provider, &["AAPL", "MSFT", "GOOG"], &range)
      .unwrap();

    assert_eq!(report.tickers.len(), 3);
    assert!(report.sharpe_ratio.is_finite());
    assert!(!report.degraded);

    // Weights sum to one and reproduce the reported tangency moments.
    let weight_sum: f64 = report.tangency_weights.values().sum();
    assert_relative_eq!(weight_sum, 1.0, epsilon = 1e-9);

    let mu_values: Vec<f64> = report
      .tickers
      .iter()
      .map(|t| report.expected_returns[t])
      .collect();
    let mu = arr1(&mu_values);
    let mut cov = Array2::<f64>::zeros((3, 3));
    for (i, ti) in report.tickers.iter().enumerate() {
      for (j, tj) in report.tickers.iter().enumerate() {
        cov[(i, j)] = report.covariance[ti][tj];
      }
    }
    let weights = arr1(
      &report
        .tickers
        .iter()
        .map(|t| report.tangency_weights[t])
        .collect::<Vec<_>>(),
    );
    let (mu_p, sigma_p) = portfolio_moments(&weights, &mu, &cov);
    assert_relative_eq!(mu_p, report.tangency.mu, max_relative = 1e-9);
    assert_relative_eq!(sigma_p, report.tangency.sigma, max_relative = 1e-9);
    assert_relative_eq!(
      report.sharpe_ratio,
      (mu_p - engine.config().risk_free_rate) / sigma_p,
      max_relative = 1e-9
    );

    // Rendering payload is fully populated.
    assert_eq!(report.bullet.assets.len(), 3);
    assert_eq!(report.bullet.random_cloud.len(), 200);
    assert_eq!(report.bullet.frontier.efficient.len(), 50);
    assert_relative_eq!(report.bullet.cml.intercept, 0.02);
    assert_relative_eq!(report.bullet.cml.slope, report.sharpe_ratio);
  }

  #[test]
  fn empty_price_data_is_no_data() {
    let (provider, range) = provider(vec![("AAPL", wiggly_prices(1, 150.0, 60))]);
    let engine = AnalyticsEngine::new(small_config());

    let result = engine.analyze(&provider, &["NOPE"], &range);
    assert!(matches!(result, Err(AnalyticsError::NoData(_))));
  }

  #[test]
  fn constant_prices_surface_degenerate_frontier() {
    let (provider, range) = provider(vec![
      ("FLAT1", vec![100.0; 80]),
      ("FLAT2", vec![50.0; 80]),
    ]);
    let engine = AnalyticsEngine::new(small_config());

    let result = engine.analyze(&provider, &["FLAT1", "FLAT2"], &range);
    assert!(matches!(
      result,
      Err(AnalyticsError::DegenerateFrontier { .. })
    ));
  }

  #[test]
  fn perfectly_correlated_assets_do_not_crash() {
    // Identical return columns -> exactly singular covariance. A rank-1
    // pseudo-inverse collapses the frontier discriminant to zero, so the
    // engine reports degeneracy; nothing panics and nothing is NaN.
    let raw: Vec<f64> = vec![0.01, -0.02, 0.015, 0.005, -0.01, 0.02, 0.0, 0.01];
    let n = raw.len();
    let start = NaiveDate::from_ymd_opt(2023, 1, 3).unwrap();
    let dates: Vec<NaiveDate> = (0..n)
      .map(|i| start + chrono::Duration::days(i as i64))
      .collect();
    let data = Array2::from_shape_fn((n, 2), |(i, _)| raw[i]);
    let returns = ReturnsTable::new(vec!["A".to_string(), "B".to_string()], dates, data);
    let moments = estimate(&returns, TRADING_DAYS_PER_YEAR).unwrap();

    let engine = AnalyticsEngine::new(small_config());
    let mut rng = StdRng::seed_from_u64(13);
    match engine.analyze_moments_using(&mut rng, &moments) {
      Ok(report) => {
        assert!(report.degraded);
        assert!(report.tangency_weights.values().all(|w| w.is_finite()));
      }
      Err(AnalyticsError::DegenerateFrontier { .. }) => {}
      Err(other) => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn risk_free_at_gmv_return_is_undefined_tangency() {
    let moments = Moments {
      tickers: vec!["A".to_string(), "B".to_string()],
      mu: arr1(&[0.10, 0.08]),
      cov: arr2(&[[0.04, 0.01], [0.01, 0.03]]),
    };
    // GMV return for this pair is B/A = 0.088.
    let engine = AnalyticsEngine::new(AnalyticsConfig {
      risk_free_rate: 0.088,
      ..small_config()
    });

    let result = engine.analyze_moments(&moments);
    assert!(matches!(
      result,
      Err(AnalyticsError::UndefinedTangency { .. })
    ));
  }
}
