//! # Analytics Errors
//!
//! Typed failure conditions of the mean-variance pipeline.

use thiserror::Error;

/// Failure taxonomy of the analytics core.
///
/// Recoverable degradations (pseudo-inverse fallback) are not errors; they
/// are logged and reported through `degraded` flags on the results. Fatal
/// conditions never collapse into a numeric default.
#[derive(Error, Debug)]
pub enum AnalyticsError {
  /// The price provider returned nothing usable for the request.
  #[error("no price data: {0}")]
  NoData(String),

  /// Exact inversion was requested on a singular matrix.
  #[error("matrix is singular and no fallback was allowed")]
  SingularMatrix,

  /// The frontier discriminant `A*C - B^2` is not positive, so the
  /// minimum-variance frontier cannot be drawn.
  #[error("degenerate frontier: discriminant {discriminant} is not positive")]
  DegenerateFrontier { discriminant: f64 },

  /// The tangency denominator `B - r_f*A` is numerically zero; the tangency
  /// portfolio diverges for this risk-free rate.
  #[error("tangency portfolio undefined for this risk-free rate: denominator {denominator}")]
  UndefinedTangency { denominator: f64 },

  /// Sharpe ratio requested for a zero-volatility portfolio.
  #[error("sharpe ratio undefined for a zero-volatility portfolio")]
  ZeroVolatility,

  /// Malformed input: ragged columns, unordered dates, shape mismatches.
  #[error("invalid input: {0}")]
  InvalidInput(String),
}
