//! Windowed median metric

use crate::tree::OrderStatTree;
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use stream_core::{
    BoundedHistory, Error, IdSequence, Metric, Observation, Result, Window,
};
use tracing::{debug, trace, warn};

/// Median over a trailing window, backed by an [`OrderStatTree`]
///
/// Pushes cost O(log n): the expired sample is located in the tree by its
/// identity and removed, then the new sample is inserted. With a window of
/// zero the tree keeps every sample ever pushed.
#[derive(Debug)]
pub struct AvlMedian {
    window: Window,
    state: Mutex<MedianState>,
}

#[derive(Debug)]
struct MedianState {
    tree: OrderStatTree<f64>,
    history: BoundedHistory<Observation<f64>>,
    ids: IdSequence,
}

impl MedianState {
    fn new(window: Window) -> Self {
        Self {
            tree: OrderStatTree::new(),
            history: BoundedHistory::new(window),
            ids: IdSequence::new(),
        }
    }

    fn push(&mut self, x: f64) -> Result<()> {
        if self.history.window().is_global() {
            let sample = self.ids.stamp(x);
            self.tree.insert(sample.value, sample.id);
            return Ok(());
        }

        let sample = self.ids.stamp(x);
        let expired = self.history.admit(sample, x)?;

        if let Some(expired) = expired {
            trace!(value = expired.value, id = expired.id, "evicting sample from median tree");
            self.tree.remove(expired.value, expired.id);
        }
        self.tree.insert(sample.value, sample.id);
        Ok(())
    }

    fn reset(&mut self) {
        self.tree.clear();
        self.history.reset();
        self.ids.reset();
    }
}

impl AvlMedian {
    /// Create a median over the last `window` samples (0 for global)
    pub fn new(window: i64) -> Result<Self> {
        let window = Window::new(window)?;
        debug!(%window, "creating AVL median");
        Ok(Self {
            window,
            state: Mutex::new(MedianState::new(window)),
        })
    }

    pub fn window(&self) -> Window {
        self.window
    }

    /// Number of samples currently in the window
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.tree.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.tree.is_empty())
    }

    /// Diagnostic rendering of the backing tree
    pub fn render_tree(&self) -> Result<String> {
        Ok(self.lock()?.tree.to_string())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MedianState>> {
        self.state.lock().map_err(|_| Error::poisoned("median state"))
    }
}

impl Metric for AvlMedian {
    fn push(&self, x: f64) -> Result<()> {
        self.lock()?.push(x)
    }

    fn value(&self) -> Result<f64> {
        self.lock()?.tree.median().ok_or(Error::NoValues)
    }

    fn clear(&self) {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| {
            warn!("median state lock poisoned, resetting anyway");
            poisoned.into_inner()
        });
        state.reset();
    }
}

impl fmt::Display for AvlMedian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AvlMedian_{{window:{}}}", self.window)
    }
}
