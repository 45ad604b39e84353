//! Streaming minimum and maximum over a trailing window
//!
//! Both metrics share one engine, [`MonotonicExtremeTracker`], parameterised
//! by an [`Extremum`] ordering ([`Maximum`] or [`Minimum`]). Windowed pushes
//! run in amortized O(1); a window of zero keeps a plain running extreme.
//!
//! # Example
//!
//! ```rust
//! use stream_minmax::{Max, Min};
//! use stream_core::Metric;
//!
//! let values = [9.0, 4.0, 6.0, 1.0, 8.0, 2.0, 2.0, 5.0, 5.0, 3.0];
//!
//! let min = Min::new(5).unwrap();
//! let max = Max::new(5).unwrap();
//! min.push_all(&values).unwrap();
//! max.push_all(&values).unwrap();
//!
//! assert_eq!(min.value().unwrap(), 2.0);
//! assert_eq!(max.value().unwrap(), 5.0);
//! ```

pub mod extreme;
pub mod tracker;

pub use extreme::{Extreme, Max, Min};
pub use tracker::{Extremum, Maximum, Minimum, MonotonicExtremeTracker};
