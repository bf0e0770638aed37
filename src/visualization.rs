//! # Visualization
//!
//! $$
//! \{(\sigma_k,\mu_k)\}\ \mapsto\ \text{Markowitz bullet chart}
//! $$
//!
//! Pure numeric payload for the mean-variance plot plus a plotly adapter.
//! The analytics core only produces series; any drawing-surface state lives
//! in the renderer consuming them.

use plotly::common::DashType;
use plotly::common::Line;
use plotly::common::Marker;
use plotly::common::MarkerSymbol;
use plotly::common::Mode;
use plotly::common::Position;
use plotly::layout::Axis;
use plotly::Layout;
use plotly::Plot;
use plotly::Scatter;

use crate::analytics::frontier::FrontierCurve;
use crate::analytics::frontier::FrontierPoint;

/// A single asset positioned in mean-volatility space.
#[derive(Clone, Debug)]
pub struct AssetPoint {
  pub ticker: String,
  pub sigma: f64,
  pub mu: f64,
}

/// Capital Market Line: `μ(σ) = r_f + sharpe·σ`, sampled over the plotted
/// volatility span.
#[derive(Clone, Debug)]
pub struct CmlLine {
  /// Intercept, the risk-free rate.
  pub intercept: f64,
  /// Slope, the tangency Sharpe ratio.
  pub slope: f64,
  /// Sampled line points.
  pub points: Vec<FrontierPoint>,
}

impl CmlLine {
  /// Sample the line on `[0, sigma_max]`.
  pub fn sample(risk_free: f64, sharpe: f64, sigma_max: f64, n_points: usize) -> Self {
    let points = (0..n_points)
      .map(|k| {
        let sigma = sigma_max * k as f64 / (n_points.saturating_sub(1)).max(1) as f64;
        FrontierPoint {
          sigma,
          mu: risk_free + sharpe * sigma,
        }
      })
      .collect();

    Self {
      intercept: risk_free,
      slope: sharpe,
      points,
    }
  }
}

/// Everything the rendering collaborator needs to draw the Markowitz
/// bullet: individual assets, the random portfolio cloud, both frontier
/// branches, the CML and the tangency point.
#[derive(Clone, Debug)]
pub struct MarkowitzBullet {
  pub assets: Vec<AssetPoint>,
  pub random_cloud: Vec<FrontierPoint>,
  pub frontier: FrontierCurve,
  pub cml: CmlLine,
  pub tangency: FrontierPoint,
}

fn sigmas(points: &[FrontierPoint]) -> Vec<f64> {
  points.iter().map(|p| p.sigma).collect()
}

fn mus(points: &[FrontierPoint]) -> Vec<f64> {
  points.iter().map(|p| p.mu).collect()
}

/// Build the bullet chart as a plotly figure. Encoding (PNG, base64, HTML)
/// is the caller's concern.
pub fn bullet_plot(bullet: &MarkowitzBullet) -> Plot {
  let mut plot = Plot::new();
  plot.set_layout(
    Layout::new()
      .title("Mean-Variance Optimization with Capital Market Line")
      .x_axis(Axis::new().title("Standard Deviation (Annual Volatility)"))
      .y_axis(Axis::new().title("Mean (Annual Expected Return)")),
  );

  plot.add_trace(
    Scatter::new(sigmas(&bullet.random_cloud), mus(&bullet.random_cloud))
      .mode(Mode::Markers)
      .marker(Marker::new().size(4).opacity(0.6))
      .name("Random Portfolios"),
  );

  plot.add_trace(
    Scatter::new(
      sigmas(&bullet.frontier.inefficient),
      mus(&bullet.frontier.inefficient),
    )
    .mode(Mode::Lines)
    .line(Line::new().width(2.5).dash(DashType::Dash).color("black"))
    .show_legend(false),
  );

  plot.add_trace(
    Scatter::new(
      sigmas(&bullet.frontier.efficient),
      mus(&bullet.frontier.efficient),
    )
    .mode(Mode::Lines)
    .line(Line::new().width(2.5).color("black"))
    .name("Efficient Frontier"),
  );

  plot.add_trace(
    Scatter::new(sigmas(&bullet.cml.points), mus(&bullet.cml.points))
      .mode(Mode::Lines)
      .line(Line::new().width(2.5).color("red"))
      .name("Capital Market Line (CML)"),
  );

  plot.add_trace(
    Scatter::new(
      bullet.assets.iter().map(|a| a.sigma).collect(),
      bullet.assets.iter().map(|a| a.mu).collect(),
    )
    .mode(Mode::MarkersText)
    .text_array(bullet.assets.iter().map(|a| a.ticker.clone()).collect())
    .text_position(Position::TopCenter)
    .marker(Marker::new().size(9).color("black"))
    .name("Assets"),
  );

  plot.add_trace(
    Scatter::new(vec![bullet.tangency.sigma], vec![bullet.tangency.mu])
      .mode(Mode::Markers)
      .marker(
        Marker::new()
          .symbol(MarkerSymbol::Star)
          .size(14)
          .color("red"),
      )
      .name("Tangency Portfolio"),
  );

  plot
}

#[cfg(test)]
mod tests {
  use super::*;
  use approx::assert_relative_eq;

  #[test]
  fn cml_sample_spans_zero_to_sigma_max() {
    let cml = CmlLine::sample(0.02, 1.5, 0.5, 100);

    assert_eq!(cml.points.len(), 100);
    assert_relative_eq!(cml.points[0].sigma, 0.0);
    assert_relative_eq!(cml.points[0].mu, 0.02);
    assert_relative_eq!(cml.points[99].sigma, 0.5, max_relative = 1e-12);
    assert_relative_eq!(cml.points[99].mu, 0.02 + 1.5 * 0.5, max_relative = 1e-12);
  }

  #[test]
  fn bullet_plot_carries_all_traces() {
    let frontier = FrontierCurve {
      inefficient: vec![FrontierPoint { sigma: 0.2, mu: 0.0 }],
      efficient: vec![FrontierPoint { sigma: 0.2, mu: 0.1 }],
      gmv_return: 0.05,
      degraded: false,
    };
    let bullet = MarkowitzBullet {
      assets: vec![AssetPoint {
        ticker: "AAPL".to_string(),
        sigma: 0.2,
        mu: 0.1,
      }],
      random_cloud: vec![FrontierPoint { sigma: 0.3, mu: 0.08 }],
      frontier,
      cml: CmlLine::sample(0.02, 0.4, 0.6, 10),
      tangency: FrontierPoint {
        sigma: 0.25,
        mu: 0.12,
      },
    };

    let plot = bullet_plot(&bullet);
    // cloud, two frontier branches, CML, assets, tangency star
    assert_eq!(plot.data().len(), 6);
  }
}
