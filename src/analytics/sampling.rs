//! # Random Portfolio Sampling
//!
//! $$
//! w_i = \frac{z_i}{\sum_j z_j},\quad z_j \sim \mathcal N(0,1)
//! $$
//!
//! Random feasible weight vectors and the (σ, μ) cloud they induce. Purely
//! diagnostic; the optimization itself never touches this module.

use ndarray::Array1;
use ndarray::Array2;
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::analytics::frontier::portfolio_moments;
use crate::analytics::frontier::FrontierPoint;

/// Draws whose sum is closer to zero than this are rejected; normalizing by
/// a vanishing sum would blow the weights up.
const MIN_ABS_SUM: f64 = 1e-8;

const MAX_REDRAWS: usize = 64;

/// Random long/short weights summing to 1: standard-normal draws normalized
/// by their sum. This is not a probability simplex; individual weights may
/// be negative or exceed 1.
pub fn random_weights<R: Rng + ?Sized>(rng: &mut R, n_assets: usize) -> Array1<f64> {
  if n_assets == 0 {
    return Array1::zeros(0);
  }

  for _ in 0..MAX_REDRAWS {
    let draw: Array1<f64> = Array1::random_using(n_assets, StandardNormal, rng);
    let sum = draw.sum();
    if sum.abs() >= MIN_ABS_SUM {
      return draw / sum;
    }
  }

  // Pathologically unlucky stream; equal weights still sum to 1.
  Array1::from_elem(n_assets, 1.0 / n_assets as f64)
}

/// Map `n_simulations` random weight vectors through the portfolio moments,
/// producing a scatter cloud used for frontier visualization and sanity
/// bounds.
pub fn sample_random_portfolios<R: Rng + ?Sized>(
  rng: &mut R,
  mu: &Array1<f64>,
  cov: &Array2<f64>,
  n_simulations: usize,
) -> Vec<FrontierPoint> {
  (0..n_simulations)
    .map(|_| {
      let weights = random_weights(rng, mu.len());
      let (mu_p, sigma_p) = portfolio_moments(&weights, mu, cov);
      FrontierPoint {
        sigma: sigma_p,
        mu: mu_p,
      }
    })
    .collect()
}
