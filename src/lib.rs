//! Streaming windowed statistics
//!
//! This crate re-exports the workspace crates under one roof:
//!
//! - [`stream_core`]: errors, window sizes, bounded history and the [`Metric`] trait
//! - [`stream_median`]: sliding-window median over an order-statistic tree
//! - [`stream_minmax`]: sliding-window maximum and minimum
//! - [`stream_moment`]: shared power-sum core with moment-based metrics
//!
//! ```
//! use stream_stats::{AvlMedian, Max, Metric, Variance};
//!
//! let median = AvlMedian::new(3)?;
//! let max = Max::new(3)?;
//! let variance = Variance::new(3)?;
//!
//! for x in [1.0, 2.0, 3.0, 4.0, 8.0] {
//!     median.push(x)?;
//!     max.push(x)?;
//!     variance.push(x)?;
//! }
//!
//! assert_eq!(median.value()?, 4.0);
//! assert_eq!(max.value()?, 8.0);
//! assert!((variance.value()? - 7.0).abs() < 1e-12);
//! # Ok::<(), stream_stats::Error>(())
//! ```

pub use stream_core;
pub use stream_median;
pub use stream_minmax;
pub use stream_moment;

pub use stream_core::{Error, Metric, Result, Window};
pub use stream_median::AvlMedian;
pub use stream_minmax::{Max, Min};
pub use stream_moment::{
    CoreBuilder, Kurtosis, Mean, Moment, PowerSumCore, Skewness, Std, Sum, Variance,
};
