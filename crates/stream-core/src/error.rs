//! Error types for streaming statistics
//!
//! Provides a unified error type for all stream-stats crates.

use thiserror::Error;

/// Core error type for streaming statistical operations
#[derive(Error, Debug)]
pub enum Error {
    /// A window size below zero was requested
    #[error("{0} is a negative window")]
    NegativeWindow(i64),

    /// A moment order below zero was requested
    #[error("{0} is a negative moment")]
    NegativeMoment(i64),

    /// The metric was queried before any sample was pushed
    #[error("no values seen yet")]
    NoValues,

    /// A power sum was requested that the aggregator never tracked
    #[error("exponent {0} not tracked")]
    ExponentNotTracked(u32),

    /// Subscribers of one aggregator asked for different windows
    #[error("incompatible window sizes: {existing} and {requested}")]
    IncompatibleWindow { existing: usize, requested: usize },

    /// A metric was bound to an aggregator that cannot serve it
    #[error("unsatisfied requirement: {0}")]
    UnsatisfiedRequirement(String),

    /// The window storage was disposed out of band
    #[error("queue: disposed")]
    Disposed,

    /// A sample was appended to a history already holding a full window
    #[error("queue: full at capacity {0}")]
    HistoryFull(usize),

    /// Threading or lock error
    #[error("Execution error: {0}")]
    Execution(String),

    /// An error wrapped with the operation that produced it
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Wrap this error with a description of the failed operation
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create an error for a poisoned lock
    pub fn poisoned(what: &str) -> Self {
        Self::Execution(format!("Failed to lock {what}: lock poisoned"))
    }

    /// The innermost error, with all context layers stripped
    pub fn root_cause(&self) -> &Error {
        match self {
            Self::Context { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Attach operation context to fallible results
pub trait ResultExt<T> {
    /// Wrap the error with a fixed context message
    fn context(self, context: &str) -> Result<T>;

    /// Wrap the error with a lazily built context message
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: &str) -> Result<T> {
        self.map_err(|e| e.context(context))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| e.context(f()))
    }
}
