//! Minimum and maximum metrics

use crate::tracker::{Extremum, Maximum, Minimum, MonotonicExtremeTracker};
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use stream_core::{Error, Metric, Result, Window};
use tracing::{debug, warn};

/// Windowed extreme of a stream, serialised behind one lock
#[derive(Debug)]
pub struct Extreme<O: Extremum> {
    window: Window,
    tracker: Mutex<MonotonicExtremeTracker<f64, O>>,
}

/// Maximum over a trailing window
pub type Max = Extreme<Maximum>;

/// Minimum over a trailing window
pub type Min = Extreme<Minimum>;

impl<O: Extremum> Extreme<O> {
    /// Create a metric over the last `window` samples (0 for global)
    pub fn new(window: i64) -> Result<Self> {
        let window = Window::new(window)?;
        debug!(%window, kind = O::NAME, "creating extreme tracker");
        Ok(Self {
            window,
            tracker: Mutex::new(MonotonicExtremeTracker::new(window)),
        })
    }

    pub fn window(&self) -> Window {
        self.window
    }

    /// Number of samples currently in the window
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MonotonicExtremeTracker<f64, O>>> {
        self.tracker
            .lock()
            .map_err(|_| Error::poisoned("extreme tracker"))
    }
}

impl<O: Extremum> Metric for Extreme<O> {
    fn push(&self, x: f64) -> Result<()> {
        self.lock()?.push(x)
    }

    fn value(&self) -> Result<f64> {
        self.lock()?.value().ok_or(Error::NoValues)
    }

    fn clear(&self) {
        let mut tracker = self.tracker.lock().unwrap_or_else(|poisoned| {
            warn!(kind = O::NAME, "tracker lock poisoned, resetting anyway");
            poisoned.into_inner()
        });
        tracker.clear();
    }
}

impl<O: Extremum> fmt::Display for Extreme<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{{window:{}}}", O::NAME, self.window)
    }
}
