//! # Ranking
//!
//! $$
//! i \in S_t \iff \operatorname{rank}_t(i) \le N
//! $$
//!
//! Cross-sectional ordinal ranking of the classification variable and the
//! top-N selection mask derived from it.

use std::cmp::Ordering;

use ndarray::Array2;
use ndarray::Axis;

use crate::frame::AssetFrame;

/// Which end of the classification scale ranks first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RankDirection {
  /// Highest score gets rank 1.
  #[default]
  PreferHigh,
  /// Lowest score gets rank 1.
  PreferLow,
}

/// Per-period ordinal rank (1 = best) of each asset's score.
///
/// Tie policy: ordinal, ties broken by first appearance in column order, so
/// ranks within a period are always distinct. Missing scores get a NaN rank
/// and are never selected.
pub fn rank_rows(frame: &AssetFrame, direction: RankDirection) -> Array2<f64> {
  let (rows, cols) = frame.values().dim();
  let mut ranks = Array2::from_elem((rows, cols), f64::NAN);

  for (t, row) in frame.values().axis_iter(Axis(0)).enumerate() {
    let mut order: Vec<usize> = (0..cols).filter(|&i| !row[i].is_nan()).collect();
    // stable sort keeps column order on equal scores
    order.sort_by(|&a, &b| {
      let cmp = row[a].partial_cmp(&row[b]).unwrap_or(Ordering::Equal);
      match direction {
        RankDirection::PreferHigh => cmp.reverse(),
        RankDirection::PreferLow => cmp,
      }
    });

    for (r, &i) in order.iter().enumerate() {
      ranks[[t, i]] = (r + 1) as f64;
    }
  }

  ranks
}

/// Selection mask: true where the rank is defined and `<= n`.
pub fn select_top(ranks: &Array2<f64>, n: usize) -> Array2<bool> {
  ranks.mapv(|r| !r.is_nan() && r <= n as f64)
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn frame(rows: Vec<Vec<f64>>, names: &[&str]) -> AssetFrame {
    let index = (1..=rows.len() as u32)
      .map(|day| NaiveDate::from_ymd_opt(2021, 9, day).unwrap())
      .collect();
    AssetFrame::from_rows(index, names.iter().map(|s| s.to_string()).collect(), rows).unwrap()
  }

  #[test]
  fn prefer_high_ranks_largest_score_first() {
    let scores = frame(vec![vec![0.3, 0.9, 0.1]], &["AAA", "BBB", "CCC"]);
    let ranks = rank_rows(&scores, RankDirection::PreferHigh);

    assert_eq!(ranks[[0, 0]], 2.0);
    assert_eq!(ranks[[0, 1]], 1.0);
    assert_eq!(ranks[[0, 2]], 3.0);
  }

  #[test]
  fn prefer_low_ranks_smallest_score_first() {
    let scores = frame(vec![vec![0.3, 0.9, 0.1]], &["AAA", "BBB", "CCC"]);
    let ranks = rank_rows(&scores, RankDirection::PreferLow);

    assert_eq!(ranks[[0, 0]], 2.0);
    assert_eq!(ranks[[0, 1]], 3.0);
    assert_eq!(ranks[[0, 2]], 1.0);
  }

  #[test]
  fn ties_break_by_column_order() {
    let scores = frame(vec![vec![0.5, 0.5, 0.5]], &["AAA", "BBB", "CCC"]);
    let ranks = rank_rows(&scores, RankDirection::PreferHigh);

    assert_eq!(ranks[[0, 0]], 1.0);
    assert_eq!(ranks[[0, 1]], 2.0);
    assert_eq!(ranks[[0, 2]], 3.0);
  }

  #[test]
  fn missing_scores_get_nan_rank_and_no_selection() {
    let scores = frame(vec![vec![0.5, f64::NAN, 0.7]], &["AAA", "BBB", "CCC"]);
    let ranks = rank_rows(&scores, RankDirection::PreferHigh);

    assert_eq!(ranks[[0, 2]], 1.0);
    assert_eq!(ranks[[0, 0]], 2.0);
    assert!(ranks[[0, 1]].is_nan());

    let mask = select_top(&ranks, 2);
    assert!(mask[[0, 0]]);
    assert!(!mask[[0, 1]]);
    assert!(mask[[0, 2]]);
  }

  #[test]
  fn select_top_keeps_exactly_n_per_period() {
    let scores = frame(
      vec![vec![0.1, 0.2, 0.3], vec![0.9, 0.1, 0.5]],
      &["AAA", "BBB", "CCC"],
    );
    let mask = select_top(&rank_rows(&scores, RankDirection::PreferHigh), 2);

    for t in 0..2 {
      let n: usize = (0..3).filter(|&i| mask[[t, i]]).count();
      assert_eq!(n, 2);
    }
    assert!(!mask[[0, 0]]);
    assert!(!mask[[1, 1]]);
  }
}
