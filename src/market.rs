//! # Market
//!
//! $$
//! \text{tickers} \times \text{dates} \mapsto p_{t,i}
//! $$
//!
//! Price data model and the provider contract feeding the analytics core.

pub mod provider;
pub mod table;

pub use provider::FixedPriceProvider;
pub use provider::PriceSeriesProvider;
pub use table::DateRange;
pub use table::PriceTable;
pub use table::ReturnsTable;
