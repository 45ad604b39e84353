//! Core traits and types for streaming statistics
//!
//! This crate provides the pieces shared by every windowed engine in the
//! stream-stats workspace:
//!
//! - [`Error`] / [`Result`]: the unified error type
//! - [`Window`]: validated window size, where zero means "global"
//! - [`BoundedHistory`]: FIFO of raw samples deciding what leaves the window
//! - [`Observation`] / [`IdSequence`]: samples stamped with an identity
//! - [`Metric`]: the push / value / clear contract all metrics implement
//!
//! # Example
//!
//! ```rust
//! use stream_core::{BoundedHistory, IdSequence, Window};
//!
//! let mut ids = IdSequence::new();
//! let mut history = BoundedHistory::new(Window::new(2).unwrap());
//!
//! history.push(ids.stamp(1.0)).unwrap();
//! history.push(ids.stamp(2.0)).unwrap();
//! let evicted = history.push(ids.stamp(3.0)).unwrap();
//!
//! assert_eq!(evicted.map(|o| o.value), Some(1.0));
//! assert_eq!(history.len(), 2);
//! ```

pub mod error;
pub mod history;
pub mod traits;
pub mod window;

// Re-export core types
pub use error::{Error, Result, ResultExt};
pub use history::{BoundedHistory, IdSequence, Observation};
pub use traits::Metric;
pub use window::Window;
