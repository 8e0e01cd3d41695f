//! # Asset Frame
//!
//! $$
//! R_{t,i} = \frac{P_{t,i}}{P_{t-1,i}} - 1
//! $$
//!
//! Time-indexed asset matrix shared by base returns, classification scores
//! and candidate weights. Rows are periods in chronological order, columns
//! are asset identifiers, NaN marks a missing observation.

use chrono::NaiveDate;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::Axis;

use crate::error::ModelError;

/// Rectangular period-by-asset matrix of real values.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetFrame {
  index: Vec<NaiveDate>,
  columns: Vec<String>,
  values: Array2<f64>,
}

impl AssetFrame {
  /// Build a frame, checking that `values` is `index.len() x columns.len()`.
  pub fn new(
    index: Vec<NaiveDate>,
    columns: Vec<String>,
    values: Array2<f64>,
  ) -> Result<Self, ModelError> {
    let (rows, cols) = values.dim();
    if rows != index.len() || cols != columns.len() {
      return Err(ModelError::Shape {
        rows,
        cols,
        expected_rows: index.len(),
        expected_cols: columns.len(),
      });
    }

    Ok(Self {
      index,
      columns,
      values,
    })
  }

  /// Build a frame from row-major period rows.
  pub fn from_rows(
    index: Vec<NaiveDate>,
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
  ) -> Result<Self, ModelError> {
    let n_cols = columns.len();
    for row in &rows {
      if row.len() != n_cols {
        return Err(ModelError::Shape {
          rows: rows.len(),
          cols: row.len(),
          expected_rows: index.len(),
          expected_cols: n_cols,
        });
      }
    }

    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    let values = Array2::from_shape_vec((index.len(), n_cols), flat).map_err(|_| {
      ModelError::Shape {
        rows: 0,
        cols: n_cols,
        expected_rows: index.len(),
        expected_cols: n_cols,
      }
    })?;

    Self::new(index, columns, values)
  }

  pub(crate) fn from_parts(index: Vec<NaiveDate>, columns: Vec<String>, values: Array2<f64>) -> Self {
    debug_assert_eq!(values.dim(), (index.len(), columns.len()));
    Self {
      index,
      columns,
      values,
    }
  }

  /// Period labels, chronological.
  pub fn index(&self) -> &[NaiveDate] {
    &self.index
  }

  /// Asset identifiers in column order.
  pub fn columns(&self) -> &[String] {
    &self.columns
  }

  /// Cell values, one row per period.
  pub fn values(&self) -> &Array2<f64> {
    &self.values
  }

  pub fn n_periods(&self) -> usize {
    self.index.len()
  }

  pub fn n_assets(&self) -> usize {
    self.columns.len()
  }

  /// Simple percentage change down each column.
  ///
  /// The first period is undefined. A cell is also undefined when either
  /// level is missing or the previous level is not strictly positive.
  pub fn pct_change(&self) -> Self {
    let (rows, cols) = self.values.dim();
    let mut out = Array2::from_elem((rows, cols), f64::NAN);

    for t in 1..rows {
      for i in 0..cols {
        let prev = self.values[[t - 1, i]];
        let cur = self.values[[t, i]];
        if prev.is_finite() && prev > 0.0 && cur.is_finite() {
          out[[t, i]] = cur / prev - 1.0;
        }
      }
    }

    Self::from_parts(self.index.clone(), self.columns.clone(), out)
  }

  /// Shift rows forward by `periods`, filling the head with NaN.
  ///
  /// `shift(1)` is the look-ahead guard: values decided at the end of
  /// period t land on period t+1.
  pub fn shift(&self, periods: usize) -> Self {
    let (rows, cols) = self.values.dim();
    let mut out = Array2::from_elem((rows, cols), f64::NAN);

    for t in periods..rows {
      for i in 0..cols {
        out[[t, i]] = self.values[[t - periods, i]];
      }
    }

    Self::from_parts(self.index.clone(), self.columns.clone(), out)
  }

  /// Cross-sectional mean per period, skipping missing cells.
  ///
  /// A period with no observation at all is NaN.
  pub fn row_mean(&self) -> Array1<f64> {
    self
      .values
      .axis_iter(Axis(0))
      .map(|row| {
        let mut sum = 0.0;
        let mut n = 0usize;
        for &v in row {
          if !v.is_nan() {
            sum += v;
            n += 1;
          }
        }
        if n == 0 {
          f64::NAN
        } else {
          sum / n as f64
        }
      })
      .collect()
  }

  /// Check exact period and asset agreement with `other`, order included.
  pub fn ensure_aligned(
    &self,
    other: &AssetFrame,
    left: &str,
    right: &str,
  ) -> Result<(), ModelError> {
    if self.index.len() != other.index.len() {
      return Err(ModelError::Alignment(format!(
        "{left} has {} periods, {right} has {}",
        self.index.len(),
        other.index.len()
      )));
    }

    if let Some(pos) = self
      .index
      .iter()
      .zip(&other.index)
      .position(|(a, b)| a != b)
    {
      return Err(ModelError::Alignment(format!(
        "{left} and {right} disagree on the period at position {pos}: {} vs {}",
        self.index[pos], other.index[pos]
      )));
    }

    if self.columns.len() != other.columns.len() {
      return Err(ModelError::Alignment(format!(
        "{left} has {} assets, {right} has {}",
        self.columns.len(),
        other.columns.len()
      )));
    }

    if let Some(pos) = self
      .columns
      .iter()
      .zip(&other.columns)
      .position(|(a, b)| a != b)
    {
      return Err(ModelError::Alignment(format!(
        "{left} and {right} disagree on the asset at position {pos}: {} vs {}",
        self.columns[pos], other.columns[pos]
      )));
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;

  use super::*;

  fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 9, day).unwrap()
  }

  fn cols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
  }

  #[test]
  fn new_rejects_mismatched_dimensions() {
    let err = AssetFrame::new(
      vec![d(1), d(2)],
      cols(&["AAA"]),
      Array2::zeros((3, 1)),
    )
    .unwrap_err();

    assert_eq!(
      err,
      ModelError::Shape {
        rows: 3,
        cols: 1,
        expected_rows: 2,
        expected_cols: 1,
      }
    );
  }

  #[test]
  fn from_rows_rejects_ragged_rows() {
    let err = AssetFrame::from_rows(
      vec![d(1), d(2)],
      cols(&["AAA", "BBB"]),
      vec![vec![1.0, 2.0], vec![3.0]],
    )
    .unwrap_err();

    assert!(matches!(err, ModelError::Shape { .. }));
  }

  #[test]
  fn pct_change_matches_simple_returns() {
    let frame = AssetFrame::from_rows(
      vec![d(1), d(2), d(3)],
      cols(&["AAA"]),
      vec![vec![100.0], vec![110.0], vec![99.0]],
    )
    .unwrap();

    let rets = frame.pct_change();
    assert!(rets.values()[[0, 0]].is_nan());
    assert_relative_eq!(rets.values()[[1, 0]], 0.1, epsilon = 1e-12);
    assert_relative_eq!(rets.values()[[2, 0]], -0.1, epsilon = 1e-12);
  }

  #[test]
  fn pct_change_undefined_on_missing_or_nonpositive_levels() {
    let frame = AssetFrame::from_rows(
      vec![d(1), d(2), d(3), d(4)],
      cols(&["AAA"]),
      vec![vec![f64::NAN], vec![100.0], vec![0.0], vec![50.0]],
    )
    .unwrap();

    let rets = frame.pct_change();
    assert!(rets.values()[[1, 0]].is_nan());
    assert!(rets.values()[[3, 0]].is_nan());
    assert_relative_eq!(rets.values()[[2, 0]], -1.0, epsilon = 1e-12);
  }

  #[test]
  fn shift_lags_rows_and_blanks_the_head() {
    let frame = AssetFrame::from_rows(
      vec![d(1), d(2), d(3)],
      cols(&["AAA", "BBB"]),
      vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]],
    )
    .unwrap();

    let lagged = frame.shift(1);
    assert!(lagged.values()[[0, 0]].is_nan());
    assert!(lagged.values()[[0, 1]].is_nan());
    assert_eq!(lagged.values()[[1, 0]], 1.0);
    assert_eq!(lagged.values()[[2, 1]], 4.0);
  }

  #[test]
  fn row_mean_skips_missing_cells() {
    let frame = AssetFrame::from_rows(
      vec![d(1), d(2)],
      cols(&["AAA", "BBB", "CCC"]),
      vec![
        vec![0.1, f64::NAN, 0.3],
        vec![f64::NAN, f64::NAN, f64::NAN],
      ],
    )
    .unwrap();

    let means = frame.row_mean();
    assert_relative_eq!(means[0], 0.2, epsilon = 1e-12);
    assert!(means[1].is_nan());
  }

  #[test]
  fn ensure_aligned_accepts_identical_layout() {
    let a = AssetFrame::from_rows(
      vec![d(1), d(2)],
      cols(&["AAA", "BBB"]),
      vec![vec![1.0, 2.0], vec![3.0, 4.0]],
    )
    .unwrap();
    let b = AssetFrame::from_rows(
      vec![d(1), d(2)],
      cols(&["AAA", "BBB"]),
      vec![vec![9.0, 9.0], vec![9.0, 9.0]],
    )
    .unwrap();

    assert!(a.ensure_aligned(&b, "a", "b").is_ok());
  }

  #[test]
  fn ensure_aligned_reports_reordered_columns() {
    let a = AssetFrame::from_rows(
      vec![d(1)],
      cols(&["AAA", "BBB"]),
      vec![vec![1.0, 2.0]],
    )
    .unwrap();
    let b = AssetFrame::from_rows(
      vec![d(1)],
      cols(&["BBB", "AAA"]),
      vec![vec![2.0, 1.0]],
    )
    .unwrap();

    let err = a.ensure_aligned(&b, "a", "b").unwrap_err();
    match err {
      ModelError::Alignment(msg) => assert!(msg.contains("asset at position 0")),
      other => panic!("expected alignment error, got {other:?}"),
    }
  }

  #[test]
  fn ensure_aligned_reports_period_count_mismatch() {
    let a = AssetFrame::from_rows(vec![d(1)], cols(&["AAA"]), vec![vec![1.0]]).unwrap();
    let b = AssetFrame::from_rows(
      vec![d(1), d(2)],
      cols(&["AAA"]),
      vec![vec![1.0], vec![2.0]],
    )
    .unwrap();

    let err = a.ensure_aligned(&b, "a", "b").unwrap_err();
    match err {
      ModelError::Alignment(msg) => assert!(msg.contains("1 periods")),
      other => panic!("expected alignment error, got {other:?}"),
    }
  }
}
