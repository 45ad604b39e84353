//! Excess kurtosis

use crate::builder::CoreBuilder;
use crate::config::CoreConfig;
use crate::core::PowerSumCore;
use crate::moment::biased_moment;
use std::fmt;
use std::sync::Arc;
use stream_core::{Error, Metric, Result, ResultExt};

const SUMS: [u32; 5] = [0, 1, 2, 3, 4];

/// Excess kurtosis `m4 / m2² - 3` over a window, from biased moments
#[derive(Debug, Clone)]
pub struct Kurtosis {
    core: Arc<PowerSumCore>,
}

impl Kurtosis {
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

impl Metric for Kurtosis {
    fn push(&self, x: f64) -> Result<()> {
        self.core.push(x).context("error pushing to core")
    }

    fn value(&self) -> Result<f64> {
        let snapshot = self.core.read()?;
        if snapshot.count() == 0 {
            return Err(Error::NoValues);
        }

        let variance = biased_moment(&snapshot, 2).context("error retrieving 2nd moment")?;
        let moment = biased_moment(&snapshot, 4).context("error retrieving 4th moment")?;
        Ok(moment / variance.powi(2) - 3.0)
    }

    fn clear(&self) {
        self.core.clear();
    }
}

impl fmt::Display for Kurtosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kurtosis_{{window:{}}}", self.core.window())
    }
}
