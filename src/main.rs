use anyhow::Context;
use anyhow::Result;
use chrono::NaiveDate;
use prettytable::row;
use prettytable::Table;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use markowitz_rs::analytics::AnalyticsConfig;
use markowitz_rs::analytics::AnalyticsEngine;
use markowitz_rs::market::DateRange;
use markowitz_rs::market::FixedPriceProvider;
use markowitz_rs::market::PriceTable;
use markowitz_rs::visualization::bullet_plot;

/// Synthetic two-year daily close path with mild drift and noise.
fn synthetic_closes(rng: &mut StdRng, start: f64, drift: f64, vol: f64, n: usize) -> Vec<f64> {
  let mut closes = Vec::with_capacity(n);
  let mut p = start;
  for _ in 0..n {
    closes.push(p);
    let shock: f64 = rng.gen_range(-1.0..1.0);
    p *= 1.0 + drift + vol * shock;
  }
  closes
}

fn main() -> Result<()> {
  tracing_subscriber::fmt().init();

  let n_days = 504;
  let start = NaiveDate::from_ymd_opt(2023, 1, 2).context("invalid start date")?;
  let dates: Vec<NaiveDate> = (0..n_days)
    .map(|i| start + chrono::Duration::days(i as i64))
    .collect();
  let end = *dates.last().context("empty date index")?;

  let mut rng = StdRng::seed_from_u64(2024);
  let table = PriceTable::from_columns(
    dates,
    vec![
      (
        "AAPL".to_string(),
        synthetic_closes(&mut rng, 150.0, 0.0006, 0.012, n_days),
      ),
      (
        "MSFT".to_string(),
        synthetic_closes(&mut rng, 300.0, 0.0005, 0.010, n_days),
      ),
      (
        "GOOG".to_string(),
        synthetic_closes(&mut rng, 120.0, 0.0004, 0.015, n_days),
      ),
    ],
  )?;
  let provider = FixedPriceProvider::new(table);

  let engine = AnalyticsEngine::new(AnalyticsConfig {
    risk_free_rate: 0.02,
    ..AnalyticsConfig::default()
  });
  let range = DateRange::new(start, end)?;
  let report = engine.analyze(&provider, &["AAPL", "MSFT", "GOOG"], &range)?;

  println!("--- Tangency Portfolio ---");
  println!("Max Sharpe Ratio: {:.4}", report.sharpe_ratio);
  println!("Return (mu): {:.4}", report.tangency.mu);
  println!("Volatility (sigma): {:.4}", report.tangency.sigma);

  let mut weights = Table::new();
  weights.add_row(row!["Ticker", "Expected Return", "Tangency Weight"]);
  for ticker in &report.tickers {
    weights.add_row(row![
      ticker,
      format!("{:.4}", report.expected_returns[ticker]),
      format!("{:.4}", report.tangency_weights[ticker]),
    ]);
  }
  weights.printstd();

  let plot = bullet_plot(&report.bullet);
  plot.write_html("markowitz_bullet.html");
  println!("Wrote markowitz_bullet.html");

  Ok(())
}
