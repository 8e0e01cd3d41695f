//! # Model
//!
//! $$
//! \text{perf}_t = \sum_i w_{t-1,i}\, R_{t,i}
//! $$
//!
//! Strategy model over three aligned input matrices: rank a classification
//! variable each period, keep the top N assets, normalize their candidate
//! weights, and realize the following period's returns under those weights.
//! The one-period lag between selection and realization is the look-ahead
//! guard of the whole pipeline.

use chrono::NaiveDate;
use ndarray::Array1;
use ndarray::Array2;
use prettytable::Cell;
use prettytable::Row;
use prettytable::Table;
use tracing::error;
use tracing::warn;

use crate::error::ModelError;
use crate::frame::AssetFrame;
use crate::ranking::rank_rows;
use crate::ranking::select_top;
use crate::ranking::RankDirection;
use crate::series::Series;

/// Benchmark added by [`Model::compare_cumulative`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BenchmarkKind {
  /// Cross-sectional mean return of the whole universe each period.
  #[default]
  EqualWeighted,
  /// No benchmark columns at all.
  None,
}

impl BenchmarkKind {
  /// Parse a benchmark name. Unrecognized names mean no benchmark.
  pub fn from_str(s: &str) -> Self {
    match s.to_lowercase().as_str() {
      "ew" | "equal-weighted" | "equalweighted" => Self::EqualWeighted,
      _ => Self::None,
    }
  }
}

/// Strategy model definition.
///
/// Construction stores the inputs as given and validates nothing; all
/// validation happens inside [`Model::calculate_performance`]. Instances
/// are immutable after construction, operations return owned result values,
/// and expected usage is single-owner sequential.
#[derive(Clone, Debug)]
pub struct Model {
  /// Caller-defined identity, ex: key in a dictionary of models.
  pub key: String,
  /// Display name, labels the performance column.
  pub name: String,
  /// Price levels per asset per period.
  pub base_prices: Option<AssetFrame>,
  /// One-period returns per asset per period.
  pub base_returns: Option<AssetFrame>,
  /// Classification variable, observable at period end, not pre-lagged.
  pub classif_variable: Option<AssetFrame>,
  /// Raw candidate weights, observable at period end, not pre-lagged.
  pub base_weights: Option<AssetFrame>,
  /// Number of assets selected each period.
  pub assets_n: usize,
  /// Ranking direction for the classification variable.
  pub direction: RankDirection,
  /// Benchmark used when comparing cumulative returns.
  pub benchmark: BenchmarkKind,
}

impl Default for Model {
  fn default() -> Self {
    Self {
      key: String::new(),
      name: "model".to_string(),
      base_prices: None,
      base_returns: None,
      classif_variable: None,
      base_weights: None,
      assets_n: 1,
      direction: RankDirection::PreferHigh,
      benchmark: BenchmarkKind::EqualWeighted,
    }
  }
}

/// Immutable output of [`Model::calculate_performance`].
#[derive(Clone, Debug)]
pub struct Performance {
  /// Returns actually used, supplied or derived from prices.
  pub returns: AssetFrame,
  /// Per-period ordinal rank of the classification variable.
  pub ranking: AssetFrame,
  /// True where rank is at most `assets_n`.
  pub selected: Array2<bool>,
  /// Normalized weights over selected assets, summing to one per period.
  pub weights: AssetFrame,
  /// Realized one-period strategy returns, named after the model.
  pub performance: Series,
}

/// Options for [`Model::compare_cumulative`].
#[derive(Clone, Debug, Default)]
pub struct CompareOpts {
  /// First period of the comparison window; defaults to the earliest period.
  pub compare_starts: Option<NaiveDate>,
  /// Label for the strategy column; defaults to the model name.
  pub r_label: Option<String>,
}

/// Comparison table: raw and cumulative strategy returns next to an
/// optional equal-weighted benchmark, restricted to the comparison window.
#[derive(Clone, Debug)]
pub struct Comparison {
  /// Periods of the comparison window.
  pub index: Vec<NaiveDate>,
  /// Label of the strategy columns.
  pub strategy_label: String,
  /// Raw strategy returns.
  pub strategy: Array1<f64>,
  /// Raw equal-weighted benchmark returns, if a benchmark is configured.
  pub benchmark: Option<Array1<f64>>,
  /// Compounded cumulative strategy returns.
  pub cumulative_strategy: Array1<f64>,
  /// Compounded cumulative benchmark returns, if a benchmark is configured.
  pub cumulative_benchmark: Option<Array1<f64>>,
}

impl Comparison {
  /// Label of the cumulative strategy column.
  pub fn cumulative_strategy_label(&self) -> String {
    format!("Cum. {}", self.strategy_label)
  }

  /// Column labels in table order.
  pub fn column_labels(&self) -> Vec<String> {
    let mut labels = vec![self.strategy_label.clone()];
    if self.benchmark.is_some() {
      labels.push("EW".to_string());
    }
    labels.push(self.cumulative_strategy_label());
    if self.cumulative_benchmark.is_some() {
      labels.push("Cum. EW".to_string());
    }
    labels
  }

  /// Render the comparison as a text table, blank cells for NaN.
  pub fn to_table(&self) -> Table {
    fn value_cell(v: f64) -> Cell {
      if v.is_nan() {
        Cell::new("")
      } else {
        Cell::new(&format!("{v:.6}"))
      }
    }

    let mut table = Table::new();
    let mut titles = vec![Cell::new("period")];
    titles.extend(self.column_labels().iter().map(|l| Cell::new(l)));
    table.set_titles(Row::new(titles));

    for (t, date) in self.index.iter().enumerate() {
      let mut cells = vec![Cell::new(&date.to_string())];
      cells.push(value_cell(self.strategy[t]));
      if let Some(bench) = &self.benchmark {
        cells.push(value_cell(bench[t]));
      }
      cells.push(value_cell(self.cumulative_strategy[t]));
      if let Some(bench) = &self.cumulative_benchmark {
        cells.push(value_cell(bench[t]));
      }
      table.add_row(Row::new(cells));
    }

    table
  }
}

impl Model {
  /// Compute the realized one-period strategy returns.
  ///
  /// When no returns are supplied, prices (if present and
  /// `returns_from_prices` is true) are converted to simple percentage
  /// changes with a warning notice. The three input matrices must agree
  /// exactly on periods and assets, order included; any mismatch aborts
  /// with [`ModelError::Alignment`] and nothing is computed.
  ///
  /// The realized return at period t uses weights decided at the end of
  /// period t-1, never period t's own scores, so the first period is
  /// always undefined.
  pub fn calculate_performance(
    &self,
    returns_from_prices: bool,
  ) -> Result<Performance, ModelError> {
    let returns = match (&self.base_returns, &self.base_prices) {
      (Some(returns), _) => returns.clone(),
      (None, Some(prices)) if returns_from_prices => {
        warn!("base returns automatically derived from base prices");
        prices.pct_change()
      }
      _ => return Err(ModelError::MissingInput("base_returns or base_prices")),
    };

    let classif = self
      .classif_variable
      .as_ref()
      .ok_or(ModelError::MissingInput("classif_variable"))?;
    let base_weights = self
      .base_weights
      .as_ref()
      .ok_or(ModelError::MissingInput("base_weights"))?;

    if let Err(e) = returns
      .ensure_aligned(base_weights, "base_returns", "base_weights")
      .and_then(|()| returns.ensure_aligned(classif, "base_returns", "classif_variable"))
    {
      error!("not calculating anything: {e}");
      return Err(e);
    }

    // selection happens at the end of t, application at t+1
    let ranking = rank_rows(classif, self.direction);
    let selected = select_top(&ranking, self.assets_n);
    let weights = normalize_selected(base_weights, &selected);
    let realized = realized_returns(&weights.shift(1), &returns);

    let performance = Series::from_parts(self.name.clone(), returns.index().to_vec(), realized);
    let ranking = AssetFrame::from_parts(
      classif.index().to_vec(),
      classif.columns().to_vec(),
      ranking,
    );

    Ok(Performance {
      returns,
      ranking,
      selected,
      weights,
      performance,
    })
  }

  /// Compare strategy and benchmark cumulative returns over a window.
  ///
  /// The window starts at `compare_starts` (default: the earliest period)
  /// and both raw columns are compounded with the log-sum identity. A
  /// [`BenchmarkKind::None`] model simply has no benchmark columns.
  pub fn compare_cumulative(&self, perf: &Performance, opts: &CompareOpts) -> Comparison {
    let label = opts
      .r_label
      .clone()
      .unwrap_or_else(|| self.name.clone());
    let start = opts
      .compare_starts
      .or_else(|| perf.returns.index().first().copied());

    let mut strategy = perf.performance.renamed(&label);
    let mut benchmark = match self.benchmark {
      BenchmarkKind::EqualWeighted => Some(Series::from_parts(
        "EW".to_string(),
        perf.returns.index().to_vec(),
        perf.returns.row_mean(),
      )),
      BenchmarkKind::None => None,
    };

    if let Some(start) = start {
      strategy = strategy.truncate_from(start);
      benchmark = benchmark.map(|b| b.truncate_from(start));
    }

    let cumulative_strategy = strategy.cumulative_compound();
    let cumulative_benchmark = benchmark.as_ref().map(Series::cumulative_compound);

    Comparison {
      index: strategy.index().to_vec(),
      strategy_label: label,
      strategy: strategy.values().clone(),
      benchmark: benchmark.map(|b| b.values().clone()),
      cumulative_strategy: cumulative_strategy.values().clone(),
      cumulative_benchmark: cumulative_benchmark.map(|b| b.values().clone()),
    }
  }
}

/// Restrict candidate weights to selected assets and normalize per period.
///
/// Non-selected assets are NaN. A period whose selected weights sum to a
/// non-positive value gets NaN weights throughout.
fn normalize_selected(weights: &AssetFrame, selected: &Array2<bool>) -> AssetFrame {
  let (rows, cols) = weights.values().dim();
  let mut out = Array2::from_elem((rows, cols), f64::NAN);

  for t in 0..rows {
    let mut sum = 0.0;
    for i in 0..cols {
      let w = weights.values()[[t, i]];
      if selected[[t, i]] && !w.is_nan() {
        sum += w;
      }
    }

    if sum > 0.0 {
      for i in 0..cols {
        if selected[[t, i]] {
          out[[t, i]] = weights.values()[[t, i]] / sum;
        }
      }
    }
  }

  AssetFrame::from_parts(weights.index().to_vec(), weights.columns().to_vec(), out)
}

/// Per-period sum of lagged weight times realized return.
///
/// Missing terms contribute zero; a period where every term is missing is
/// undefined (min-count-1 semantics).
fn realized_returns(lagged_weights: &AssetFrame, returns: &AssetFrame) -> Array1<f64> {
  let (rows, cols) = returns.values().dim();
  let mut out = Array1::from_elem(rows, f64::NAN);

  for t in 0..rows {
    let mut sum = 0.0;
    let mut n = 0usize;
    for i in 0..cols {
      let term = lagged_weights.values()[[t, i]] * returns.values()[[t, i]];
      if !term.is_nan() {
        sum += term;
        n += 1;
      }
    }
    if n > 0 {
      out[t] = sum;
    }
  }

  out
}
