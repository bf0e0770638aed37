//! # Matrix Inversion
//!
//! $$
//! \Sigma^{-1} \quad\text{or}\quad \Sigma^{+} = V\,\Sigma_r^{-1}\,U^\top
//! $$
//!
//! Inversion capability with an explicit pseudo-inverse fallback selected
//! by the caller instead of try/except-shaped control flow.

use nalgebra::DMatrix;
use ndarray::Array2;
use tracing::warn;

use crate::analytics::error::AnalyticsError;

/// Singular values below this (relative) threshold are treated as zero by
/// the pseudo-inverse.
const PINV_EPS: f64 = 1e-12;

/// How to handle a singular matrix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InversionStrategy {
  /// Fail with [`AnalyticsError::SingularMatrix`] when the matrix has no
  /// exact inverse.
  Exact,
  /// Fall back to the Moore-Penrose pseudo-inverse. Recoverable, but the
  /// result is approximate; the fallback is logged and flagged.
  #[default]
  PseudoFallback,
}

/// Result of an inversion: the (pseudo-)inverse and whether the fallback
/// path was taken.
#[derive(Clone, Debug)]
pub struct Inverse {
  /// The inverse, or the pseudo-inverse when `degraded` is set.
  pub matrix: Array2<f64>,
  /// True when the exact inverse did not exist and the pseudo-inverse was
  /// used instead.
  pub degraded: bool,
}

/// Invert a square matrix under the given strategy.
pub fn invert(
  matrix: &Array2<f64>,
  strategy: InversionStrategy,
) -> Result<Inverse, AnalyticsError> {
  let (rows, cols) = matrix.dim();
  if rows != cols {
    return Err(AnalyticsError::InvalidInput(format!(
      "cannot invert a {rows}x{cols} matrix"
    )));
  }

  let dm = DMatrix::from_row_iterator(rows, cols, matrix.iter().copied());

  if let Some(inv) = dm.clone().try_inverse() {
    if inv.iter().all(|v| v.is_finite()) {
      return Ok(Inverse {
        matrix: to_ndarray(&inv),
        degraded: false,
      });
    }
  }

  match strategy {
    InversionStrategy::Exact => Err(AnalyticsError::SingularMatrix),
    InversionStrategy::PseudoFallback => {
      warn!("matrix is singular, using pseudo-inverse");
      let pinv = dm
        .pseudo_inverse(PINV_EPS)
        .map_err(|_| AnalyticsError::SingularMatrix)?;
      Ok(Inverse {
        matrix: to_ndarray(&pinv),
        degraded: true,
      })
    }
  }
}

fn to_ndarray(dm: &DMatrix<f64>) -> Array2<f64> {
  Array2::from_shape_fn(dm.shape(), |(i, j)| dm[(i, j)])
}

#[cfg(test)]
mod tests {
  use super::*;
  use approx::assert_relative_eq;
  use ndarray::arr2;
  use tracing_test::traced_test;

  #[test]
  fn inverts_a_well_conditioned_matrix() {
    let m = arr2(&[[4.0, 1.0], [1.0, 3.0]]);
    let inv = invert(&m, InversionStrategy::Exact).unwrap();

    assert!(!inv.degraded);
    let identity = m.dot(&inv.matrix);
    assert_relative_eq!(identity[(0, 0)], 1.0, epsilon = 1e-12);
    assert_relative_eq!(identity[(0, 1)], 0.0, epsilon = 1e-12);
    assert_relative_eq!(identity[(1, 0)], 0.0, epsilon = 1e-12);
    assert_relative_eq!(identity[(1, 1)], 1.0, epsilon = 1e-12);
  }

  #[test]
  fn exact_strategy_rejects_singular_matrix() {
    let m = arr2(&[[1.0, 2.0], [2.0, 4.0]]);
    assert!(matches!(
      invert(&m, InversionStrategy::Exact),
      Err(AnalyticsError::SingularMatrix)
    ));
  }

  #[traced_test]
  #[test]
  fn fallback_recovers_and_logs() {
    let m = arr2(&[[1.0, 2.0], [2.0, 4.0]]);
    let inv = invert(&m, InversionStrategy::PseudoFallback).unwrap();

    assert!(inv.degraded);
    assert!(inv.matrix.iter().all(|v| v.is_finite()));
    assert!(logs_contain("using pseudo-inverse"));

    // Pseudo-inverse property: A A+ A = A.
    let back = m.dot(&inv.matrix).dot(&m);
    for i in 0..2 {
      for j in 0..2 {
        assert_relative_eq!(back[(i, j)], m[(i, j)], epsilon = 1e-9);
      }
    }
  }

  #[test]
  fn rejects_non_square_input() {
    let m = Array2::<f64>::zeros((2, 3));
    assert!(matches!(
      invert(&m, InversionStrategy::PseudoFallback),
      Err(AnalyticsError::InvalidInput(_))
    ));
  }
}
