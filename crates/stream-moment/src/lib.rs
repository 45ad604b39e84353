//! Moment-based streaming metrics over a shared power-sum core
//!
//! All metrics in this crate are thin formula layers over a
//! [`PowerSumCore`], which maintains Σxⁱ for the exponents its subscribers
//! asked for, over one window. Metrics that should see the same stream can
//! share one core:
//!
//! 1. collect each metric's requirement record (`Metric::config(window)`)
//! 2. build the core with [`CoreBuilder`], which rejects window conflicts
//! 3. bind each metric to the core (`Metric::bind(&core)`)
//!
//! A push through any bound metric updates the core once, and every other
//! bound metric observes it. Each metric also offers `new(window)` for the
//! common case of a private core.
//!
//! # Metrics
//!
//! - [`Moment`]: kth Bessel-corrected central moment
//! - [`Variance`], [`Std`]
//! - [`Skewness`]: adjusted Fisher–Pearson
//! - [`Kurtosis`]: excess kurtosis
//! - [`Mean`], [`Sum`]

pub mod builder;
pub mod config;
pub mod core;
pub mod kurtosis;
pub mod mean;
pub mod moment;
pub mod skewness;
pub mod variance;

pub use builder::CoreBuilder;
pub use config::CoreConfig;
pub use core::{CoreSnapshot, PowerSumCore};
pub use kurtosis::Kurtosis;
pub use mean::{Mean, Sum};
pub use moment::{central_moment, Moment};
pub use skewness::Skewness;
pub use variance::{Std, Variance};
