use anyhow::Result;
use backtest_rs::AssetFrame;
use backtest_rs::CompareOpts;
use backtest_rs::ComparisonRenderer;
use backtest_rs::CumulativePlot;
use backtest_rs::Model;
use chrono::Months;
use chrono::NaiveDate;

/// Demo: monthly 3-asset universe, top-2 selection on a momentum-like
/// score, prices supplied so returns are derived with a warning notice.
/// Pass `--plot` to open the cumulative chart in a browser.
fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let start = NaiveDate::from_ymd_opt(2021, 1, 31).unwrap();
  let index: Vec<NaiveDate> = (0..6).map(|m| start + Months::new(m)).collect();
  let assets = vec!["AAA".to_string(), "BBB".to_string(), "CCC".to_string()];

  let prices = AssetFrame::from_rows(
    index.clone(),
    assets.clone(),
    vec![
      vec![100.0, 50.0, 20.0],
      vec![104.0, 49.0, 21.0],
      vec![108.0, 51.0, 20.5],
      vec![106.0, 54.0, 22.0],
      vec![111.0, 57.0, 21.8],
      vec![115.0, 56.0, 23.0],
    ],
  )?;

  // toy momentum score: last observed monthly move, in percent
  let classif = AssetFrame::from_rows(
    index.clone(),
    assets.clone(),
    vec![
      vec![1.0, -0.5, 0.8],
      vec![4.0, -2.0, 5.0],
      vec![3.8, 4.1, -2.4],
      vec![-1.9, 5.9, 7.3],
      vec![4.7, 5.6, -0.9],
      vec![3.6, -1.8, 5.5],
    ],
  )?;

  let weights = AssetFrame::from_rows(index, assets, vec![vec![1.0, 1.0, 1.0]; 6])?;

  let model = Model {
    key: "demo".to_string(),
    name: "top2-momentum".to_string(),
    base_prices: Some(prices),
    classif_variable: Some(classif),
    base_weights: Some(weights),
    assets_n: 2,
    ..Model::default()
  };

  let perf = model.calculate_performance(true)?;
  let comparison = model.compare_cumulative(
    &perf,
    &CompareOpts {
      // skip the warm-up month with no lagged weights
      compare_starts: perf.performance.index().get(1).copied(),
      r_label: None,
    },
  );

  comparison.to_table().printstd();

  if std::env::args().any(|arg| arg == "--plot") {
    CumulativePlot.render(&comparison);
  }

  Ok(())
}
