//! Streaming median over a trailing window
//!
//! The median is maintained by an [`OrderStatTree`]: an AVL tree whose nodes
//! carry subtree sizes, so the middle ranks are found in one O(log n)
//! descent. A [`BoundedHistory`](stream_core::BoundedHistory) tracks which
//! sample leaves the window next, and that exact sample instance is removed
//! from the tree on every push once the window is full.
//!
//! # Example
//!
//! ```rust
//! use stream_median::AvlMedian;
//! use stream_core::Metric;
//!
//! let median = AvlMedian::new(4).unwrap();
//! for i in 0..6 {
//!     median.push(i as f64).unwrap();
//! }
//!
//! // Window holds 2, 3, 4, 5
//! assert_eq!(median.value().unwrap(), 3.5);
//! ```

pub mod median;
pub mod tree;

pub use median::AvlMedian;
pub use tree::OrderStatTree;
