use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::combinators::{gap_retry, retry};
use crate::error::{Error, Result};
use crate::timer::Timer;

// ---------------------------------------------------------------------------
// RetryLimit
// ---------------------------------------------------------------------------

/// How many times a failed action may be re-fired after its first attempt.
///
/// Serialized as an integer: a non-negative count, or `-1` for unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum RetryLimit {
    Limited(u32),
    Unlimited,
}

impl RetryLimit {
    /// The budget left after spending one retry, or `None` when exhausted.
    pub fn decrement(self) -> Option<RetryLimit> {
        match self {
            RetryLimit::Limited(0) => None,
            RetryLimit::Limited(n) => Some(RetryLimit::Limited(n - 1)),
            RetryLimit::Unlimited => Some(RetryLimit::Unlimited),
        }
    }
}

impl From<u32> for RetryLimit {
    fn from(n: u32) -> Self {
        RetryLimit::Limited(n)
    }
}

impl TryFrom<i64> for RetryLimit {
    type Error = Error;

    fn try_from(n: i64) -> Result<Self> {
        match n {
            -1 => Ok(RetryLimit::Unlimited),
            n => u32::try_from(n)
                .map(RetryLimit::Limited)
                .map_err(|_| Error::InvalidRetryLimit(n)),
        }
    }
}

impl From<RetryLimit> for i64 {
    fn from(limit: RetryLimit) -> Self {
        match limit {
            RetryLimit::Limited(n) => i64::from(n),
            RetryLimit::Unlimited => -1,
        }
    }
}

impl fmt::Display for RetryLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryLimit::Limited(n) => write!(f, "{n}"),
            RetryLimit::Unlimited => f.write_str("unlimited"),
        }
    }
}

// ---------------------------------------------------------------------------
// RetryPolicy
// ---------------------------------------------------------------------------

/// Retry settings as they appear in a YAML config file.
///
/// ```yaml
/// limit: 3
/// interval_ms: 250
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    #[serde(default = "default_limit")]
    pub limit: RetryLimit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<u64>,
}

fn default_limit() -> RetryLimit {
    RetryLimit::Limited(3)
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            interval_ms: None,
        }
    }
}

impl RetryPolicy {
    pub fn from_yaml(data: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(data)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_yaml(&data)
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval_ms.map(Duration::from_millis)
    }

    /// Wrap `action` in the retry combinator this policy describes: a
    /// `gap_retry` on `timer` when an interval is configured, a plain
    /// `retry` otherwise.
    pub fn apply<T: Send + 'static>(
        &self,
        action: Action<T>,
        timer: Option<Arc<dyn Timer>>,
    ) -> Action<T> {
        match (self.interval(), timer) {
            (Some(interval), Some(timer)) => gap_retry(self.limit, interval, action, timer),
            (Some(interval), None) => {
                tracing::warn!(
                    interval_ms = interval.as_millis() as u64,
                    "retry interval configured but no timer supplied; retrying immediately"
                );
                retry(self.limit, action)
            }
            (None, _) => retry(self.limit, action),
        }
    }
}
