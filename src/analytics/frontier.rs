//! # Portfolio Math
//!
//! $$
//! w_{\text{tan}}=\frac{\Sigma^{-1}(\mu-r_f\mathbf 1)}{B-r_f A},\qquad
//! \sigma(y)=\sqrt{\frac{Ay^2-2By+C}{AC-B^2}}
//! $$
//!
//! Closed-form mean-variance machinery: portfolio moments, Sharpe ratio,
//! frontier constants, the tangency portfolio and the sampled
//! minimum-variance frontier.

use ndarray::Array1;
use ndarray::Array2;

use crate::analytics::error::AnalyticsError;
use crate::analytics::linalg::invert;
use crate::analytics::linalg::InversionStrategy;

/// One portfolio in mean-volatility space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrontierPoint {
  /// Annualized volatility.
  pub sigma: f64,
  /// Annualized expected return.
  pub mu: f64,
}

/// The analytic frontier constants `A = 1'Σ⁻¹1`, `B = 1'Σ⁻¹μ`, `C = μ'Σ⁻¹μ`.
#[derive(Clone, Copy, Debug)]
pub struct FrontierConstants {
  pub a: f64,
  pub b: f64,
  pub c: f64,
  /// True when Σ was singular and the pseudo-inverse was used.
  pub degraded: bool,
}

impl FrontierConstants {
  /// `A·C - B²`; the frontier exists only when this is positive.
  pub fn discriminant(&self) -> f64 {
    self.a * self.c - self.b * self.b
  }

  /// Expected return of the global minimum variance portfolio, `B/A`.
  pub fn gmv_return(&self) -> f64 {
    self.b / self.a
  }
}

/// Tangency portfolio weights plus the degradation flag of the underlying
/// inversion. Weights sum to 1 by construction; shorts are allowed.
#[derive(Clone, Debug)]
pub struct TangencyPortfolio {
  pub weights: Array1<f64>,
  pub degraded: bool,
}

/// The sampled minimum-variance frontier: the inefficient branch below the
/// GMV return and the efficient branch above it.
#[derive(Clone, Debug)]
pub struct FrontierCurve {
  /// Branch sampled on `[0, gmv_return]`.
  pub inefficient: Vec<FrontierPoint>,
  /// Branch sampled on `[gmv_return, y_max]`.
  pub efficient: Vec<FrontierPoint>,
  /// Expected return of the GMV portfolio.
  pub gmv_return: f64,
  /// True when the constants came from a pseudo-inverse.
  pub degraded: bool,
}

/// Expected return and volatility of a portfolio: `μ_p = w·μ`,
/// `σ_p = sqrt(w'Σw)`. Tiny negative variances from floating-point noise
/// are clamped to zero before the square root.
pub fn portfolio_moments(
  weights: &Array1<f64>,
  mu: &Array1<f64>,
  cov: &Array2<f64>,
) -> (f64, f64) {
  let mu_p = weights.dot(mu);
  let var_p = weights.dot(&cov.dot(weights)).max(0.0);
  (mu_p, var_p.sqrt())
}

/// Excess return per unit of volatility, `(μ_p - r_f)/σ_p`. A
/// zero-volatility portfolio has no Sharpe ratio; that is an error, never a
/// silent zero.
pub fn sharpe_ratio(mu_p: f64, sigma_p: f64, risk_free: f64) -> Result<f64, AnalyticsError> {
  if sigma_p == 0.0 {
    return Err(AnalyticsError::ZeroVolatility);
  }
  Ok((mu_p - risk_free) / sigma_p)
}

/// Compute the frontier constants from `μ` and `Σ` under the given
/// inversion strategy.
pub fn frontier_constants(
  mu: &Array1<f64>,
  cov: &Array2<f64>,
  strategy: InversionStrategy,
) -> Result<FrontierConstants, AnalyticsError> {
  check_shapes(mu, cov)?;
  let inv = invert(cov, strategy)?;
  let ones = Array1::ones(mu.len());

  let inv_ones = inv.matrix.dot(&ones);
  let inv_mu = inv.matrix.dot(mu);

  Ok(FrontierConstants {
    a: ones.dot(&inv_ones),
    b: ones.dot(&inv_mu),
    c: mu.dot(&inv_mu),
    degraded: inv.degraded,
  })
}

/// Weights of the maximum-Sharpe portfolio,
/// `w = Σ⁻¹(μ - r_f·1) / (B - r_f·A)`.
///
/// When `B - r_f·A` is numerically zero the tangency line is parallel to
/// the frontier asymptote (the risk-free rate sits at the GMV return) and
/// the weights diverge; that surfaces as
/// [`AnalyticsError::UndefinedTangency`] instead of infinities.
pub fn tangency_portfolio(
  mu: &Array1<f64>,
  cov: &Array2<f64>,
  risk_free: f64,
  strategy: InversionStrategy,
) -> Result<TangencyPortfolio, AnalyticsError> {
  check_shapes(mu, cov)?;
  let inv = invert(cov, strategy)?;
  let ones = Array1::ones(mu.len());

  let inv_ones = inv.matrix.dot(&ones);
  let a = ones.dot(&inv_ones);
  let b = ones.dot(&inv.matrix.dot(mu));

  let denominator = b - risk_free * a;
  let scale = 1.0 + b.abs() + (risk_free * a).abs();
  if denominator.abs() <= 1e-10 * scale {
    return Err(AnalyticsError::UndefinedTangency { denominator });
  }

  let excess = mu - risk_free * &ones;
  let weights = inv.matrix.dot(&excess) / denominator;

  Ok(TangencyPortfolio {
    weights,
    degraded: inv.degraded,
  })
}

/// Sample the minimum-variance frontier.
///
/// The inefficient branch covers `[0, B/A]`, the efficient branch
/// `[B/A, y_max]` (the caller supplies the plotting bound, typically a
/// multiple of `max(μ)`), each with `n_points` samples of
/// `σ(y) = sqrt((A·y² - 2·B·y + C)/(A·C - B²))`. A non-positive
/// discriminant means the covariance structure is degenerate and the curve
/// does not exist.
pub fn min_variance_frontier(
  mu: &Array1<f64>,
  cov: &Array2<f64>,
  y_max: f64,
  n_points: usize,
  strategy: InversionStrategy,
) -> Result<FrontierCurve, AnalyticsError> {
  let constants = frontier_constants(mu, cov, strategy)?;
  let discriminant = constants.discriminant();
  if discriminant <= 0.0 {
    return Err(AnalyticsError::DegenerateFrontier { discriminant });
  }

  let gmv = constants.gmv_return();
  let sigma_at = |y: f64| -> f64 {
    let numerator = (constants.a * y * y - 2.0 * constants.b * y + constants.c).max(0.0);
    (numerator / discriminant).sqrt()
  };

  let branch = |from: f64, to: f64| -> Vec<FrontierPoint> {
    Array1::linspace(from, to, n_points)
      .iter()
      .map(|&y| FrontierPoint {
        sigma: sigma_at(y),
        mu: y,
      })
      .collect()
  };

  Ok(FrontierCurve {
    inefficient: branch(0.0, gmv),
    efficient: branch(gmv, y_max.max(gmv)),
    gmv_return: gmv,
    degraded: constants.degraded,
  })
}

fn check_shapes(mu: &Array1<f64>, cov: &Array2<f64>) -> Result<(), AnalyticsError> {
  let n = mu.len();
  if n == 0 {
    return Err(AnalyticsError::NoData("no assets".to_string()));
  }
  if cov.dim() != (n, n) {
    return Err(AnalyticsError::InvalidInput(format!(
      "covariance is {:?}, expected ({n}, {n})",
      cov.dim()
    )));
  }
  Ok(())
}
