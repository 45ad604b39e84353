//! Variance and standard deviation

use crate::builder::CoreBuilder;
use crate::config::CoreConfig;
use crate::core::PowerSumCore;
use crate::moment::central_moment;
use std::fmt;
use std::sync::Arc;
use stream_core::{Metric, Result, ResultExt};

const SUMS: [u32; 3] = [0, 1, 2];

/// Bessel-corrected sample variance over a window
#[derive(Debug, Clone)]
pub struct Variance {
    core: Arc<PowerSumCore>,
}

impl Variance {
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

    pub fn core(&self) -> &Arc<PowerSumCore> {
        &self.core
    }
}

impl Metric for Variance {
    fn push(&self, x: f64) -> Result<()> {
        self.core.push(x).context("error pushing to core")
    }

    fn value(&self) -> Result<f64> {
        let snapshot = self.core.read()?;
        central_moment(&snapshot, 2)
    }

    fn clear(&self) {
        self.core.clear();
    }
}

impl fmt::Display for Variance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Variance_{{window:{}}}", self.core.window())
    }
}

/// Sample standard deviation, the square root of [`Variance`]
#[derive(Debug, Clone)]
pub struct Std {
    variance: Variance,
}

impl Std {
    pub fn config(window: i64) -> Result<CoreConfig> {
        Variance::config(window)
    }

    pub fn bind(core: &Arc<PowerSumCore>) -> Result<Self> {
        Ok(Self {
            variance: Variance::bind(core)?,
        })
    }

    pub fn new(window: i64) -> Result<Self> {
        Ok(Self {
            variance: Variance::new(window)?,
        })
    }
}

impl Metric for Std {
    fn push(&self, x: f64) -> Result<()> {
        self.variance.push(x)
    }

    fn value(&self) -> Result<f64> {
        Ok(self.variance.value()?.sqrt())
    }

    fn clear(&self) {
        self.variance.clear();
    }
}

impl fmt::Display for Std {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Std_{{window:{}}}", self.variance.core.window())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_variance() {
        let variance = Variance::new(3).unwrap();
        variance.push_all(&[1.0, 2.0, 3.0, 4.0, 8.0]).unwrap();
        assert_relative_eq!(variance.value().unwrap(), 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_std() {
        let std = Std::new(0).unwrap();
        std.push_all(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        // Sample variance of this classic set is 32/7
        assert_relative_eq!(std.value().unwrap(), (32.0f64 / 7.0).sqrt(), epsilon = 1e-12);
        assert_eq!(std.to_string(), "Std_{window:0}");
    }

    #[test]
    fn test_clear_then_replay() {
        let variance = Variance::new(4).unwrap();
        variance.push_all(&[10.0, -3.0, 7.5, 2.0, 6.0]).unwrap();
        let before = variance.value().unwrap();

        variance.clear();
        assert!(variance.value().is_err());
        variance.push_all(&[10.0, -3.0, 7.5, 2.0, 6.0]).unwrap();
        assert_eq!(variance.value().unwrap(), before);
    }
}
