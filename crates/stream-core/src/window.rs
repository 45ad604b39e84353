//! Window size configuration

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of most recent samples a statistic is computed over
///
/// A window of zero selects global mode: nothing is ever evicted and the
/// statistic covers the full history of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Window(usize);

impl Window {
    /// Global (unbounded) mode
    pub const GLOBAL: Window = Window(0);

    /// Validate a signed window size
    pub fn new(size: i64) -> Result<Self> {
        usize::try_from(size)
            .map(Window)
            .map_err(|_| Error::NegativeWindow(size))
    }

    /// Window of exactly `size` samples
    pub fn bounded(size: usize) -> Self {
        Window(size)
    }

    pub fn size(&self) -> usize {
        self.0
    }

    /// True if the window never evicts
    pub fn is_global(&self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<i64> for Window {
    type Error = Error;

    fn try_from(size: i64) -> Result<Self> {
        Window::new(size)
    }
}

impl From<Window> for i64 {
    fn from(window: Window) -> i64 {
        i64::try_from(window.0).unwrap_or(i64::MAX)
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonnegative_window_is_valid() {
        assert_eq!(Window::new(0).unwrap(), Window::GLOBAL);
        assert!(Window::new(0).unwrap().is_global());

        let window = Window::new(5).unwrap();
        assert_eq!(window.size(), 5);
        assert!(!window.is_global());
    }

    #[test]
    fn test_negative_window_is_invalid() {
        let err = Window::new(-1).unwrap_err();
        assert_eq!(err.to_string(), "-1 is a negative window");
    }

    #[test]
    fn test_window_serde() {
        let window: Window = serde_json::from_str("7").unwrap();
        assert_eq!(window.size(), 7);
        assert_eq!(serde_json::to_string(&window).unwrap(), "7");

        let err = serde_json::from_str::<Window>("-2").unwrap_err();
        assert!(err.to_string().contains("-2 is a negative window"));
    }

    #[test]
    fn test_oversized_window_saturates() {
        let window = Window::bounded(usize::MAX);
        assert_eq!(i64::from(window), i64::MAX);

        let json = serde_json::to_string(&window).unwrap();
        assert_eq!(json, i64::MAX.to_string());
        let restored: Window = serde_json::from_str(&json).unwrap();
        assert!(!restored.is_global());
        assert_eq!(restored.size() as u64, i64::MAX as u64);
    }
}
