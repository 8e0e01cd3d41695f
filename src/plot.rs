//! # Plot
//!
//! $$
//! t \mapsto (C_t^{\text{strategy}}, C_t^{\text{benchmark}})
//! $$
//!
//! Rendering seam for comparison output. The model never draws anything
//! itself; callers hand a finished [`Comparison`] to a renderer.

use plotly::common::Mode;
use plotly::Layout;
use plotly::Plot;
use plotly::Scatter;

use crate::model::Comparison;

/// Display sink for a finished comparison table.
pub trait ComparisonRenderer {
  fn render(&self, comparison: &Comparison);
}

/// Plotly line chart of the two cumulative series.
#[derive(Clone, Copy, Debug, Default)]
pub struct CumulativePlot;

impl CumulativePlot {
  /// Build the chart without displaying it.
  pub fn build(comparison: &Comparison) -> Plot {
    let x: Vec<String> = comparison.index.iter().map(|d| d.to_string()).collect();

    let mut plot = Plot::new();
    plot.set_layout(Layout::new().title("Cumulative performances"));

    let label = comparison.cumulative_strategy_label();
    plot.add_trace(
      Scatter::new(x.clone(), comparison.cumulative_strategy.to_vec())
        .mode(Mode::Lines)
        .name(label.as_str()),
    );

    if let Some(bench) = &comparison.cumulative_benchmark {
      plot.add_trace(
        Scatter::new(x, bench.to_vec())
          .mode(Mode::Lines)
          .name("Cum. EW"),
      );
    }

    plot
  }
}

impl ComparisonRenderer for CumulativePlot {
  fn render(&self, comparison: &Comparison) {
    Self::build(comparison).show();
  }
}
