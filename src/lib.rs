//! # backtest-rs
//!
//! $$
//! \text{perf}_t = \sum_i w_{t-1,i}\, R_{t,i}, \qquad
//! C_t = \exp\Big(\sum_{s \le t} \ln(1+r_s)\Big) - 1
//! $$
//!
//! Historical returns of rank-based selection strategies. Given aligned
//! matrices of asset returns (or prices), a classification variable and
//! candidate portfolio weights, [`Model`] selects the top-N assets each
//! period, applies their normalized weights one period later, and compares
//! the strategy's cumulative return against an equal-weighted benchmark.

pub mod error;
pub mod frame;
pub mod model;
pub mod plot;
pub mod ranking;
pub mod series;

pub use error::ModelError;
pub use frame::AssetFrame;
pub use model::BenchmarkKind;
pub use model::CompareOpts;
pub use model::Comparison;
pub use model::Model;
pub use model::Performance;
pub use plot::ComparisonRenderer;
pub use plot::CumulativePlot;
pub use ranking::rank_rows;
pub use ranking::select_top;
pub use ranking::RankDirection;
pub use series::Series;
