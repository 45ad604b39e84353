//! Shared incremental power-sum aggregator
//!
//! A [`PowerSumCore`] keeps Σxⁱ for a negotiated set of exponents over one
//! window. Several metrics read the same sums; each observation is pushed to
//! the core exactly once, whichever subscriber it arrives through.
//!
//! Evicting a sample subtracts its own xⁱ from every sum, so the raw values
//! of the window are retained in a [`BoundedHistory`] next to the sums.

use crate::config::CoreConfig;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use stream_core::{BoundedHistory, Error, Result, Window};
use tracing::{trace, warn};

/// Power sums over a window, shared by the metrics bound to it
///
/// Reads take a shared lock and may run in parallel; pushes and clears are
/// exclusive.
#[derive(Debug)]
pub struct PowerSumCore {
    config: CoreConfig,
    state: RwLock<CoreState>,
}

#[derive(Debug)]
struct CoreState {
    sums: BTreeMap<u32, f64>,
    count: usize,
    history: BoundedHistory<f64>,
}

impl CoreState {
    fn new(config: &CoreConfig) -> Self {
        Self {
            sums: config.sums.iter().map(|&i| (i, 0.0)).collect(),
            count: 0,
            history: BoundedHistory::new(config.effective_window()),
        }
    }

    fn push(&mut self, x: f64) -> Result<()> {
        let expired = if self.history.window().is_global() {
            None
        } else {
            self.history.admit(x, x)?
        };

        for (&i, sum) in self.sums.iter_mut() {
            *sum += power(x, i);
            if let Some(old) = expired {
                *sum -= power(old, i);
            }
        }

        match expired {
            Some(old) => trace!(value = old, "evicted sample from power sums"),
            None => self.count += 1,
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.sums.values_mut().for_each(|sum| *sum = 0.0);
        self.count = 0;
        self.history.reset();
    }
}

fn power(x: f64, exponent: u32) -> f64 {
    match i32::try_from(exponent) {
        Ok(e) => x.powi(e),
        Err(_) => x.powf(f64::from(exponent)),
    }
}

impl PowerSumCore {
    /// Allocate a core for an already merged configuration
    ///
    /// Metric groups normally go through [`CoreBuilder`](crate::CoreBuilder),
    /// which merges the requirements of every subscriber first.
    pub fn new(config: CoreConfig) -> Self {
        let state = CoreState::new(&config);
        Self {
            config,
            state: RwLock::new(state),
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn window(&self) -> Window {
        self.config.effective_window()
    }

    /// True if Σxⁱ is maintained for `exponent`
    pub fn tracks(&self, exponent: u32) -> bool {
        self.config.tracks(exponent)
    }

    /// Check that every exponent in `required` is maintained
    pub fn ensure_tracks(&self, required: impl IntoIterator<Item = u32>) -> Result<()> {
        let missing: Vec<u32> = required.into_iter().filter(|&i| !self.tracks(i)).collect();
        if missing.is_empty() {
            return Ok(());
        }
        Err(Error::UnsatisfiedRequirement(format!(
            "core does not track power sums {missing:?}"
        )))
    }

    /// Add one sample to every tracked sum
    ///
    /// A failed push leaves sums, count and window unchanged.
    pub fn push(&self, x: f64) -> Result<()> {
        self.write()?.push(x)
    }

    /// Zero all sums and empty the window
    pub fn clear(&self) {
        let mut state = self.state.write().unwrap_or_else(|poisoned| {
            warn!("power sum lock poisoned, resetting anyway");
            poisoned.into_inner()
        });
        state.reset();
    }

    /// Consistent read-only view of count and sums
    ///
    /// Holding the snapshot blocks pushes, so derived statistics that read
    /// several sums see one state of the window.
    pub fn read(&self) -> Result<CoreSnapshot<'_>> {
        let state = self
            .state
            .read()
            .map_err(|_| Error::poisoned("power sums"))?;
        Ok(CoreSnapshot { state })
    }

    /// Number of live samples
    pub fn count(&self) -> Result<usize> {
        Ok(self.read()?.count())
    }

    /// Σxⁱ over the live window
    pub fn sum(&self, exponent: u32) -> Result<f64> {
        self.read()?.sum(exponent)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, CoreState>> {
        self.state
            .write()
            .map_err(|_| Error::poisoned("power sums"))
    }

    #[cfg(test)]
    pub(crate) fn dispose_history(&self) {
        if let Ok(mut state) = self.state.write() {
            state.history.dispose();
        }
    }
}

impl fmt::Display for PowerSumCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PowerSumCore_{{window:{}}}", self.window())
    }
}

/// Read guard over a core's sums
pub struct CoreSnapshot<'a> {
    state: RwLockReadGuard<'a, CoreState>,
}

impl CoreSnapshot<'_> {
    pub fn count(&self) -> usize {
        self.state.count
    }

    /// Σxⁱ, or [`Error::ExponentNotTracked`] if `i` was never requested
    pub fn sum(&self, exponent: u32) -> Result<f64> {
        self.state
            .sums
            .get(&exponent)
            .copied()
            .ok_or(Error::ExponentNotTracked(exponent))
    }
}
