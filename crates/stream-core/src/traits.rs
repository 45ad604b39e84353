//! Core traits for streaming statistics
//!
//! Every metric in the stream-stats crates implements [`Metric`]. Metrics
//! use interior locking, so a single instance can be shared between threads
//! and pushed to or queried through `&self`.

use crate::Result;
use std::fmt;

/// A statistic maintained incrementally over a stream of samples
///
/// The `Display` implementation is the diagnostic label of the metric,
/// of the form `Type_{window:N}`.
pub trait Metric: fmt::Display + Send + Sync {
    /// Feed one sample into the metric
    ///
    /// A failed push leaves the metric exactly as it was.
    fn push(&self, x: f64) -> Result<()>;

    /// Current value of the statistic over the live window
    fn value(&self) -> Result<f64>;

    /// Reset to the freshly constructed state
    fn clear(&self);

    /// Push a batch of samples in order, stopping at the first failure
    fn push_all(&self, xs: &[f64]) -> Result<()> {
        xs.iter().try_for_each(|&x| self.push(x))
    }
}
