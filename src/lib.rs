//! # markowitz-rs
//!
//! $$
//! \min_{\mathbf w}\ \mathbf w^\top\Sigma\,\mathbf w
//! \quad\text{s.t.}\quad \mathbf w^\top\mu = y,\ \mathbf w^\top\mathbf 1 = 1
//! $$
//!
//! Mean-variance portfolio analytics: historical closes in, annualized
//! moments, the tangency (max-Sharpe) portfolio, the analytic
//! minimum-variance frontier and a ready-to-render Markowitz bullet
//! payload out.
//!
//! The crate is purely computational and stateless; every analysis works
//! on immutable snapshots and freshly allocated results, so invocations
//! can run concurrently without coordination. Market data enters through
//! the [`market::PriceSeriesProvider`] trait and rendering leaves through
//! the numeric payload in [`visualization`].

pub mod analytics;
pub mod market;
pub mod visualization;
