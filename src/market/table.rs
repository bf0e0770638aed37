//! # Price and Return Tables
//!
//! $$
//! r_t = \frac{p_t - p_{t-1}}{p_{t-1}}
//! $$
//!
//! Aligned daily close series and the derived daily-return table.

use chrono::NaiveDate;
use ndarray::Array2;
use ndarray::Axis;

use crate::analytics::error::AnalyticsError;

/// Inclusive calendar range for a price request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
  /// First date included.
  pub start: NaiveDate,
  /// Last date included.
  pub end: NaiveDate,
}

impl DateRange {
  /// Construct a range, rejecting `start > end`.
  pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AnalyticsError> {
    if start > end {
      return Err(AnalyticsError::InvalidInput(format!(
        "date range start {start} is after end {end}"
      )));
    }
    Ok(Self { start, end })
  }

  /// Whether `date` falls inside the range (both ends inclusive).
  pub fn contains(&self, date: NaiveDate) -> bool {
    date >= self.start && date <= self.end
  }
}

impl std::fmt::Display for DateRange {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}..={}", self.start, self.end)
  }
}

/// Daily closing prices for a set of tickers on a common ascending date
/// index. Rows are dates, columns are tickers. Columns with no data at all
/// are dropped at construction; they never reach the estimators.
#[derive(Clone, Debug)]
pub struct PriceTable {
  tickers: Vec<String>,
  dates: Vec<NaiveDate>,
  closes: Array2<f64>,
}

impl PriceTable {
  /// Build a table from per-ticker close columns sharing `dates`.
  ///
  /// Columns consisting entirely of NaN are dropped (the ticker had no data
  /// for the window). Ragged columns and non-ascending dates are rejected.
  pub fn from_columns(
    dates: Vec<NaiveDate>,
    columns: Vec<(String, Vec<f64>)>,
  ) -> Result<Self, AnalyticsError> {
    for w in dates.windows(2) {
      if w[0] >= w[1] {
        return Err(AnalyticsError::InvalidInput(format!(
          "dates must be strictly ascending, found {} before {}",
          w[0], w[1]
        )));
      }
    }

    let n_rows = dates.len();
    let mut tickers = Vec::with_capacity(columns.len());
    let mut kept = Vec::with_capacity(columns.len());

    for (ticker, closes) in columns {
      if closes.len() != n_rows {
        return Err(AnalyticsError::InvalidInput(format!(
          "column {} has {} rows, expected {}",
          ticker,
          closes.len(),
          n_rows
        )));
      }
      if closes.iter().all(|c| c.is_nan()) {
        continue;
      }
      tickers.push(ticker);
      kept.push(closes);
    }

    let n_assets = tickers.len();
    let mut closes = Array2::zeros((n_rows, n_assets));
    for (j, column) in kept.iter().enumerate() {
      for (i, &c) in column.iter().enumerate() {
        closes[(i, j)] = c;
      }
    }

    Ok(Self {
      tickers,
      dates,
      closes,
    })
  }

  /// Ticker labels in column order.
  pub fn tickers(&self) -> &[String] {
    &self.tickers
  }

  /// Ascending date index.
  pub fn dates(&self) -> &[NaiveDate] {
    &self.dates
  }

  /// Close matrix, rows = dates, columns = tickers.
  pub fn closes(&self) -> &Array2<f64> {
    &self.closes
  }

  /// Number of dates.
  pub fn n_rows(&self) -> usize {
    self.dates.len()
  }

  /// Number of tickers.
  pub fn n_assets(&self) -> usize {
    self.tickers.len()
  }

  /// True when there are no dates or no tickers left.
  pub fn is_empty(&self) -> bool {
    self.n_rows() == 0 || self.n_assets() == 0
  }

  /// Restrict to the requested tickers, in request order. Tickers absent
  /// from the table are silently skipped, mirroring an upstream provider
  /// that simply has no column for them.
  pub fn select(&self, tickers: &[&str]) -> Self {
    let indices: Vec<usize> = tickers
      .iter()
      .filter_map(|t| self.tickers.iter().position(|have| have == t))
      .collect();

    let selected = self.closes.select(Axis(1), &indices);
    Self {
      tickers: indices.iter().map(|&j| self.tickers[j].clone()).collect(),
      dates: self.dates.clone(),
      closes: selected,
    }
  }

  /// Restrict to rows whose date falls inside `range`.
  pub fn select_range(&self, range: &DateRange) -> Self {
    let indices: Vec<usize> = self
      .dates
      .iter()
      .enumerate()
      .filter(|(_, &d)| range.contains(d))
      .map(|(i, _)| i)
      .collect();

    Self {
      tickers: self.tickers.clone(),
      dates: indices.iter().map(|&i| self.dates[i]).collect(),
      closes: self.closes.select(Axis(0), &indices),
    }
  }
}

/// Daily percentage returns aligned to the source price table. One fewer
/// row than the prices it came from; the first date has nothing to diff
/// against and is dropped, not null-filled.
#[derive(Clone, Debug)]
pub struct ReturnsTable {
  tickers: Vec<String>,
  dates: Vec<NaiveDate>,
  returns: Array2<f64>,
}

impl ReturnsTable {
  pub(crate) fn new(tickers: Vec<String>, dates: Vec<NaiveDate>, returns: Array2<f64>) -> Self {
    Self {
      tickers,
      dates,
      returns,
    }
  }

  /// Ticker labels in column order.
  pub fn tickers(&self) -> &[String] {
    &self.tickers
  }

  /// Date index (starts at the second price date).
  pub fn dates(&self) -> &[NaiveDate] {
    &self.dates
  }

  /// Return matrix, rows = dates, columns = tickers.
  pub fn returns(&self) -> &Array2<f64> {
    &self.returns
  }

  /// Number of return observations.
  pub fn n_rows(&self) -> usize {
    self.dates.len()
  }

  /// Number of tickers.
  pub fn n_assets(&self) -> usize {
    self.tickers.len()
  }
}
