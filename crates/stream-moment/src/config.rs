//! Requirement records negotiated by the metrics sharing a core

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use stream_core::{Error, Result, Window};

/// What one subscriber needs from a [`PowerSumCore`](crate::PowerSumCore)
///
/// `sums` lists the exponents i for which Σxⁱ must be maintained. `window`
/// is the window the subscriber expects; `None` accepts whatever the other
/// subscribers agree on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub sums: BTreeSet<u32>,
    pub window: Option<Window>,
}

impl CoreConfig {
    /// Requirement for the given exponents over a signed window size
    pub fn new(window: i64, sums: impl IntoIterator<Item = u32>) -> Result<Self> {
        Ok(Self {
            sums: sums.into_iter().collect(),
            window: Some(Window::new(window)?),
        })
    }

    /// Requirement that only asks for exponents
    pub fn with_sums(sums: impl IntoIterator<Item = u32>) -> Self {
        Self {
            sums: sums.into_iter().collect(),
            window: None,
        }
    }

    /// Fold another subscriber's requirement into this one
    ///
    /// Exponents are unioned. Windows must agree; on conflict `self` is left
    /// untouched.
    pub fn merge(&mut self, other: &CoreConfig) -> Result<()> {
        match (self.window, other.window) {
            (Some(existing), Some(requested)) if existing != requested => {
                return Err(Error::IncompatibleWindow {
                    existing: existing.size(),
                    requested: requested.size(),
                });
            }
            (None, Some(requested)) => self.window = Some(requested),
            _ => {}
        }
        self.sums.extend(other.sums.iter().copied());
        Ok(())
    }

    /// The agreed window, global if nobody asked for one
    pub fn effective_window(&self) -> Window {
        self.window.unwrap_or(Window::GLOBAL)
    }

    pub fn tracks(&self, exponent: u32) -> bool {
        self.sums.contains(&exponent)
    }
}
