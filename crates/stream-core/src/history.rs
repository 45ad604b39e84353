//! Bounded FIFO storage for the raw samples of a window
//!
//! [`BoundedHistory`] is the single source of truth for which sample leaves
//! the window next. Every windowed engine keeps one next to its own indexed
//! state and evicts from that state whatever the history hands back.

use crate::{Error, Result, ResultExt, Window};
use std::collections::VecDeque;

/// Upper bound on the capacity reserved up front for very large windows
const MAX_PREALLOCATION: usize = 4096;

/// A sample stamped with the order in which it entered the stream
///
/// Two observations with equal values are still distinct samples; engines
/// compare `id`s when they need to know which instance expired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation<T> {
    pub id: u64,
    pub value: T,
}

impl<T> Observation<T> {
    pub fn new(id: u64, value: T) -> Self {
        Self { id, value }
    }

    /// True if both refer to the same sample instance
    pub fn same_sample(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Hands out monotonically increasing sample ids
#[derive(Debug, Clone, Default)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a value with the next id
    pub fn stamp<T>(&mut self, value: T) -> Observation<T> {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        Observation::new(id, value)
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}

/// Fixed-capacity FIFO of samples, oldest first
///
/// With a global window the history never reports itself full and never
/// evicts. After [`dispose`](Self::dispose) every operation fails until the
/// history is [`reset`](Self::reset).
#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    window: Window,
    items: VecDeque<T>,
    disposed: bool,
}

impl<T> BoundedHistory<T> {
    /// Create an empty history for the given window
    pub fn new(window: Window) -> Self {
        Self {
            window,
            items: VecDeque::with_capacity(window.size().min(MAX_PREALLOCATION)),
            disposed: false,
        }
    }

    /// Create an empty history from a signed window size
    pub fn with_window(size: i64) -> Result<Self> {
        Ok(Self::new(Window::new(size)?))
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True if the next push will evict
    pub fn is_full(&self) -> bool {
        !self.window.is_global() && self.items.len() >= self.window.size()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Remove and return the oldest sample, if any
    pub fn pop_oldest(&mut self) -> Result<Option<T>> {
        self.ensure_live()?;
        Ok(self.items.pop_front())
    }

    /// Append a sample without evicting
    ///
    /// Fails if the history is disposed or already holds a full window.
    pub fn put(&mut self, item: T) -> Result<()> {
        self.ensure_live()?;
        if self.is_full() {
            return Err(Error::HistoryFull(self.window.size()));
        }
        self.items.push_back(item);
        Ok(())
    }

    /// Append a sample, evicting and returning the oldest one if full
    pub fn push(&mut self, item: T) -> Result<Option<T>> {
        self.ensure_live()?;
        let evicted = if self.is_full() {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        Ok(evicted)
    }

    /// [`push`](Self::push) with a failure wrapped in the step that failed
    ///
    /// A full history reports the eviction, otherwise the append of `x`.
    /// Either way nothing is evicted or appended.
    pub fn admit(&mut self, item: T, x: f64) -> Result<Option<T>> {
        let evicting = self.is_full();
        self.push(item).with_context(|| {
            if evicting {
                "error popping item from queue".to_string()
            } else {
                format!("error pushing {x:.6} to queue")
            }
        })
    }

    /// Oldest sample still in the window
    pub fn oldest(&self) -> Option<&T> {
        self.items.front()
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Refuse every further operation until [`reset`](Self::reset)
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    /// Return to the freshly constructed state
    pub fn reset(&mut self) {
        self.items = VecDeque::with_capacity(self.window.size().min(MAX_PREALLOCATION));
        self.disposed = false;
    }

    fn ensure_live(&self) -> Result<()> {
        if self.disposed {
            return Err(Error::Disposed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_push_evicts_oldest_when_full() {
        let mut history = BoundedHistory::new(Window::bounded(3));
        assert_eq!(history.push(1).unwrap(), None);
        assert_eq!(history.push(2).unwrap(), None);
        assert_eq!(history.push(3).unwrap(), None);
        assert!(history.is_full());

        assert_eq!(history.push(4).unwrap(), Some(1));
        assert_eq!(history.len(), 3);
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn test_global_window_never_evicts() {
        let mut history = BoundedHistory::new(Window::GLOBAL);
        for i in 0..100 {
            assert_eq!(history.push(i).unwrap(), None);
        }
        assert!(!history.is_full());
        assert_eq!(history.len(), 100);
    }

    #[test]
    fn test_negative_window() {
        let err = BoundedHistory::<f64>::with_window(-4).unwrap_err();
        assert_eq!(err.to_string(), "-4 is a negative window");
    }

    #[test]
    fn test_put_rejects_overflow() {
        let mut history = BoundedHistory::new(Window::bounded(1));
        history.put(1.0).unwrap();
        let err = history.put(2.0).unwrap_err();
        assert!(matches!(err, Error::HistoryFull(1)));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_dispose_and_reset() {
        let mut history = BoundedHistory::new(Window::bounded(2));
        history.push(1.0).unwrap();
        history.dispose();

        assert!(matches!(history.push(2.0), Err(Error::Disposed)));
        assert!(matches!(history.pop_oldest(), Err(Error::Disposed)));
        assert!(matches!(history.put(2.0), Err(Error::Disposed)));
        assert_eq!(history.len(), 1);

        history.reset();
        assert!(!history.is_disposed());
        assert_eq!(history.push(2.0).unwrap(), None);
    }

    #[test]
    fn test_admit_wraps_the_failed_step() {
        let mut history = BoundedHistory::new(Window::bounded(2));
        history.admit(1.0, 1.0).unwrap();
        history.dispose();
        let err = history.admit(2.0, 2.0).unwrap_err();
        assert_eq!(err.to_string(), "error pushing 2.000000 to queue: queue: disposed");

        history.reset();
        history.admit(1.0, 1.0).unwrap();
        history.admit(2.0, 2.0).unwrap();
        history.dispose();
        let err = history.admit(3.0, 3.0).unwrap_err();
        assert_eq!(err.to_string(), "error popping item from queue: queue: disposed");
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![1.0, 2.0]);

        history.reset();
        history.admit(1.0, 1.0).unwrap();
        history.admit(2.0, 2.0).unwrap();
        assert_eq!(history.admit(3.0, 3.0).unwrap(), Some(1.0));
    }

    #[test]
    fn test_id_sequence() {
        let mut ids = IdSequence::new();
        let a = ids.stamp(1.0);
        let b = ids.stamp(1.0);
        assert_eq!(a.value, b.value);
        assert!(!a.same_sample(&b));
        assert!(a.same_sample(&a));
        assert_eq!(b.id, 1);

        ids.reset();
        assert_eq!(ids.stamp(0.0).id, 0);
    }

    proptest! {
        #[test]
        fn prop_history_keeps_last_window(
            window in 1usize..20,
            values in prop::collection::vec(-1e6f64..1e6, 0..100)
        ) {
            let mut history = BoundedHistory::new(Window::bounded(window));
            for &v in &values {
                history.push(v).unwrap();
                prop_assert!(history.len() <= window);
            }
            let start = values.len().saturating_sub(window);
            let kept: Vec<f64> = history.iter().copied().collect();
            prop_assert_eq!(kept, values[start..].to_vec());
        }
    }
}
