//! # Series
//!
//! $$
//! C_t = \exp\Big(\sum_{s \le t} \ln(1+r_s)\Big) - 1
//! $$
//!
//! Single-column period-indexed series and expanding geometric compounding.

use chrono::NaiveDate;
use ndarray::Array1;

use crate::error::ModelError;

/// Named single-column time series.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
  name: String,
  index: Vec<NaiveDate>,
  values: Array1<f64>,
}

impl Series {
  /// Build a series, checking that `values` matches the index length.
  pub fn new(
    name: impl Into<String>,
    index: Vec<NaiveDate>,
    values: Array1<f64>,
  ) -> Result<Self, ModelError> {
    if values.len() != index.len() {
      return Err(ModelError::Shape {
        rows: values.len(),
        cols: 1,
        expected_rows: index.len(),
        expected_cols: 1,
      });
    }

    Ok(Self {
      name: name.into(),
      index,
      values,
    })
  }

  pub(crate) fn from_parts(name: String, index: Vec<NaiveDate>, values: Array1<f64>) -> Self {
    debug_assert_eq!(values.len(), index.len());
    Self {
      name,
      index,
      values,
    }
  }

  /// Column label.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Period labels, chronological.
  pub fn index(&self) -> &[NaiveDate] {
    &self.index
  }

  /// Per-period values.
  pub fn values(&self) -> &Array1<f64> {
    &self.values
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// Same series under a different label.
  pub fn renamed(&self, name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      index: self.index.clone(),
      values: self.values.clone(),
    }
  }

  /// Restrict to periods at or after `start`.
  pub fn truncate_from(&self, start: NaiveDate) -> Self {
    let from = self
      .index
      .iter()
      .position(|d| *d >= start)
      .unwrap_or(self.index.len());

    Self {
      name: self.name.clone(),
      index: self.index[from..].to_vec(),
      values: self.values.slice(ndarray::s![from..]).to_owned(),
    }
  }

  /// Expanding geometric compounding, `expm1(sum(log1p(r)))` per period.
  ///
  /// Undefined from the first missing value, or any `r <= -1`, onward.
  /// Use [`Series::truncate_from`] first to start after warm-up periods.
  pub fn cumulative_compound(&self) -> Self {
    let mut out = Array1::from_elem(self.values.len(), f64::NAN);
    let mut log_sum = 0.0;
    let mut poisoned = false;

    for (t, &r) in self.values.iter().enumerate() {
      if r.is_nan() || r <= -1.0 {
        poisoned = true;
      }
      if !poisoned {
        log_sum += r.ln_1p();
        out[t] = log_sum.exp_m1();
      }
    }

    Self {
      name: format!("Cum. {}", self.name),
      index: self.index.clone(),
      values: out,
    }
  }
}
