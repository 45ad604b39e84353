//! Closed-form metrics over the first power sum

use crate::builder::CoreBuilder;
use crate::config::CoreConfig;
use crate::core::PowerSumCore;
use std::fmt;
use std::sync::Arc;
use stream_core::{Error, Metric, Result, ResultExt};

/// Arithmetic mean over a window
#[derive(Debug, Clone)]
pub struct Mean {
    core: Arc<PowerSumCore>,
}

impl Mean {
    pub fn config(window: i64) -> Result<CoreConfig> {
        CoreConfig::new(window, [1])
    }

    pub fn bind(core: &Arc<PowerSumCore>) -> Result<Self> {
        core.ensure_tracks([1])?;
        Ok(Self {
            core: Arc::clone(core),
        })
    }

    pub fn new(window: i64) -> Result<Self> {
        let core = CoreBuilder::new().subscribe(Self::config(window)?).build()?;
        Self::bind(&core)
    }
}

impl Metric for Mean {
    fn push(&self, x: f64) -> Result<()> {
        self.core.push(x).context("error pushing to core")
    }

    fn value(&self) -> Result<f64> {
        let snapshot = self.core.read()?;
        let count = snapshot.count();
        if count == 0 {
            return Err(Error::NoValues);
        }
        Ok(snapshot.sum(1)? / count as f64)
    }

    fn clear(&self) {
        self.core.clear();
    }
}

impl fmt::Display for Mean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mean_{{window:{}}}", self.core.window())
    }
}

/// Plain sum of the samples in a window
#[derive(Debug, Clone)]
pub struct Sum {
    core: Arc<PowerSumCore>,
}

impl Sum {
    pub fn config(window: i64) -> Result<CoreConfig> {
        CoreConfig::new(window, [1])
    }

    pub fn bind(core: &Arc<PowerSumCore>) -> Result<Self> {
        core.ensure_tracks([1])?;
        Ok(Self {
            core: Arc::clone(core),
        })
    }

    pub fn new(window: i64) -> Result<Self> {
        let core = CoreBuilder::new().subscribe(Self::config(window)?).build()?;
        Self::bind(&core)
    }
}

impl Metric for Sum {
    fn push(&self, x: f64) -> Result<()> {
        self.core.push(x).context("error pushing to core")
    }

    fn value(&self) -> Result<f64> {
        let snapshot = self.core.read()?;
        if snapshot.count() == 0 {
            return Err(Error::NoValues);
        }
        snapshot.sum(1)
    }

    fn clear(&self) {
        self.core.clear();
    }
}

impl fmt::Display for Sum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sum_{{window:{}}}", self.core.window())
    }
}
