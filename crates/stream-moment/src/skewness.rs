//! Adjusted Fisher–Pearson sample skewness

use crate::builder::CoreBuilder;
use crate::config::CoreConfig;
use crate::core::PowerSumCore;
use crate::moment::biased_moment;
use std::fmt;
use std::sync::Arc;
use stream_core::{Error, Metric, Result, ResultExt};

const SUMS: [u32; 4] = [0, 1, 2, 3];

/// Adjusted Fisher–Pearson skewness over a window
///
/// `G1 = g1 * sqrt(n(n-1)) / (n-2)` with `g1 = m3 / m2^1.5` computed from
/// the biased central moments. Fewer than three samples make the correction
/// singular; the result is then not finite and it is up to the caller to
/// wait for enough samples.
#[derive(Debug, Clone)]
pub struct Skewness {
    core: Arc<PowerSumCore>,
}

impl Skewness {
    pub fn config(window: i64) -> Result<CoreConfig> {
        CoreConfig::new(window, SUMS)
    }

    pub fn bind(core: &Arc<PowerSumCore>) -> Result<Self> {
        core.ensure_tracks(SUMS)?;
        Ok(Self {
            core: Arc::clone(core),
        })
    }

    pub fn new(window: i64) -> Result<Self> {
        let core = CoreBuilder::new().subscribe(Self::config(window)?).build()?;
        Self::bind(&core)
    }
}

impl Metric for Skewness {
    fn push(&self, x: f64) -> Result<()> {
        self.core.push(x).context("error pushing to core")
    }

    fn value(&self) -> Result<f64> {
        let snapshot = self.core.read()?;
        let count = snapshot.count();
        if count == 0 {
            return Err(Error::NoValues);
        }

        let variance = biased_moment(&snapshot, 2).context("error retrieving 2nd moment")?;
        let moment = biased_moment(&snapshot, 3).context("error retrieving 3rd moment")?;

        let n = count as f64;
        let adjust = (n * (n - 1.0)).sqrt() / (n - 2.0);
        Ok(adjust * moment / variance.powf(1.5))
    }

    fn clear(&self) {
        self.core.clear();
    }
}

impl fmt::Display for Skewness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Skewness_{{window:{}}}", self.core.window())
    }
}
