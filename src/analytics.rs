//! # Analytics
//!
//! $$
//! w_{\text{tan}}=\arg\max_{\mathbf w}\frac{\mathbb E[R_p]-r_f}{\sigma_p}
//! $$
//!
//! The mean-variance pipeline: returns, annualized moments, closed-form
//! tangency portfolio, sampled frontier and the orchestrating engine.

pub mod engine;
pub mod error;
pub mod frontier;
pub mod linalg;
pub mod moments;
pub mod returns;
pub mod sampling;

pub use engine::AnalysisReport;
pub use engine::AnalyticsConfig;
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use frontier::frontier_constants;
pub use frontier::min_variance_frontier;
pub use frontier::portfolio_moments;
pub use frontier::sharpe_ratio;
pub use frontier::tangency_portfolio;
pub use frontier::FrontierConstants;
pub use frontier::FrontierCurve;
pub use frontier::FrontierPoint;
pub use frontier::TangencyPortfolio;
pub use linalg::invert;
pub use linalg::Inverse;
pub use linalg::InversionStrategy;
pub use moments::estimate;
pub use moments::Moments;
pub use moments::TRADING_DAYS_PER_YEAR;
pub use returns::daily_returns;
pub use sampling::random_weights;
pub use sampling::sample_random_portfolios;
