//! Central moments from raw power sums
//!
//! The kth sample central moment is expanded binomially in terms of the
//! maintained power sums:
//!
//! ```text
//! m_k = 1/(n-1) * Σ_{i=0..k} C(k,i) (-1)^(k-i) mean^(k-i) Σxⁱ
//! ```
//!
//! so a query costs O(k) regardless of the window size. The expansion loses
//! precision for high orders on data far from zero.

use crate::builder::CoreBuilder;
use crate::config::CoreConfig;
use crate::core::{CoreSnapshot, PowerSumCore};
use std::fmt;
use std::sync::Arc;
use stream_core::{Error, Metric, Result, ResultExt};

/// Binomial coefficient C(n, k) as a float
pub(crate) fn binomial(n: u32, k: u32) -> f64 {
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * f64::from(n - i) / f64::from(i + 1))
}

/// Bessel-corrected kth central moment of the window behind `snapshot`
///
/// The 0th moment is always 1 and the 1st always 0; neither reads a sum.
pub fn central_moment(snapshot: &CoreSnapshot<'_>, k: u32) -> Result<f64> {
    let count = snapshot.count();
    if count == 0 {
        return Err(Error::NoValues);
    }

    match k {
        0 => return Ok(1.0),
        1 => return Ok(0.0),
        _ => {}
    }

    let n = count as f64;
    let mean = snapshot
        .sum(1)
        .context("error retrieving 1-power sum")?
        / n;

    let mut moment = 0.0;
    for i in 0..=k {
        let sum = snapshot
            .sum(i)
            .with_context(|| format!("error retrieving {i}-power sum"))?;
        let sign = if (k - i) % 2 == 0 { 1.0 } else { -1.0 };
        moment += binomial(k, i) * sign * mean.powi((k - i) as i32) * sum;
    }

    Ok(moment / (n - 1.0))
}

/// Biased (population-normalised) kth central moment
pub(crate) fn biased_moment(snapshot: &CoreSnapshot<'_>, k: u32) -> Result<f64> {
    let n = snapshot.count() as f64;
    Ok(central_moment(snapshot, k)? * (n - 1.0) / n)
}

/// The kth sample central moment over a window
#[derive(Debug, Clone)]
pub struct Moment {
    k: u32,
    core: Arc<PowerSumCore>,
}

impl Moment {
    /// Requirement record: power sums 0 through k over `window`
    pub fn config(k: i64, window: i64) -> Result<CoreConfig> {
        let k = Self::validate_order(k)?;
        CoreConfig::new(window, 0..=k)
    }

    /// Bind a kth moment to an existing core
    pub fn bind(k: i64, core: &Arc<PowerSumCore>) -> Result<Self> {
        let k = Self::validate_order(k)?;
        core.ensure_tracks(0..=k)?;
        Ok(Self {
            k,
            core: Arc::clone(core),
        })
    }

    /// kth moment with its own private core
    pub fn new(k: i64, window: i64) -> Result<Self> {
        let core = CoreBuilder::new()
            .subscribe(Self::config(k, window)?)
            .build()?;
        Self::bind(k, &core)
    }

    pub fn order(&self) -> u32 {
        self.k
    }

    pub fn core(&self) -> &Arc<PowerSumCore> {
        &self.core
    }

    fn validate_order(k: i64) -> Result<u32> {
        if k < 0 {
            return Err(Error::NegativeMoment(k));
        }
        u32::try_from(k)
            .ok()
            .filter(|&k| i32::try_from(k).is_ok())
            .ok_or_else(|| Error::UnsatisfiedRequirement(format!("moment order {k} is too large")))
    }
}

impl Metric for Moment {
    fn push(&self, x: f64) -> Result<()> {
        self.core.push(x).context("error pushing to core")
    }

    fn value(&self) -> Result<f64> {
        let snapshot = self.core.read()?;
        central_moment(&snapshot, self.k)
    }

    fn clear(&self) {
        self.core.clear();
    }
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Moment_{{k:{},window:{}}}", self.k, self.core.window())
    }
}
