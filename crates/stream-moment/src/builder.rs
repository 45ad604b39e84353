//! Two-phase construction of a shared power-sum core
//!
//! Metrics first hand over their requirement records, the builder validates
//! that all of them agree on one window and allocates a single core tracking
//! the union of the requested exponents. Each metric is then bound to that
//! core, which checks the core can actually serve it.
//!
//! ```rust
//! use stream_core::Metric;
//! use stream_moment::{CoreBuilder, Skewness, Variance};
//!
//! let core = CoreBuilder::new()
//!     .subscribe(Variance::config(3).unwrap())
//!     .subscribe(Skewness::config(3).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let variance = Variance::bind(&core).unwrap();
//! let skewness = Skewness::bind(&core).unwrap();
//!
//! // One push feeds both metrics
//! variance.push_all(&[1.0, 2.0, 3.0, 4.0, 8.0]).unwrap();
//! assert_eq!(variance.value().unwrap(), 7.0);
//! assert!(skewness.value().unwrap() > 0.0);
//! ```

use crate::config::CoreConfig;
use crate::core::PowerSumCore;
use std::sync::Arc;
use stream_core::Result;
use tracing::{debug, instrument};

/// Collects subscriber requirements and allocates one [`PowerSumCore`]
#[derive(Debug, Clone, Default)]
pub struct CoreBuilder {
    requirements: Vec<CoreConfig>,
}

impl CoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one subscriber's requirement record
    pub fn subscribe(mut self, config: CoreConfig) -> Self {
        self.requirements.push(config);
        self
    }

    /// Number of registered subscribers
    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// Merge every requirement and allocate the core
    ///
    /// Fails without allocating anything if two subscribers ask for
    /// different windows.
    #[instrument(skip(self), fields(subscribers = self.requirements.len()))]
    pub fn build(self) -> Result<Arc<PowerSumCore>> {
        let mut merged = CoreConfig::default();
        for requirement in &self.requirements {
            merged.merge(requirement)?;
        }

        debug!(
            window = %merged.effective_window(),
            sums = ?merged.sums,
            "allocating shared power-sum core"
        );
        Ok(Arc::new(PowerSumCore::new(merged)))
    }
}
