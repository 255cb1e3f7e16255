use std::sync::Arc;

use thiserror::Error;

// ─── Failure ──────────────────────────────────────────────────────────────

/// The failure value that travels through an action's single result channel.
///
/// A failure is ordinary data: it is delivered to continuations exactly like
/// a success value, wrapped in the `Err` side of an [`Outcome`]. `next` steps
/// skip it, `guard` steps consume it.
#[derive(Debug, Clone, Error)]
pub enum Failure {
    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Source(Arc<dyn std::error::Error + Send + Sync>),

    #[error("no actions given")]
    NoActions,

    #[error("all actions failed ({} failures)", .failures.len())]
    AllFailed { failures: Vec<Failure> },

    #[error("retry limit reached after {attempts} attempts: {last}")]
    RetryLimitReached { attempts: u32, last: Box<Failure> },

    #[error("try limit reached after {attempts} inputs: {last}")]
    TryLimitReached { attempts: usize, last: Box<Failure> },

    #[error("no arguments to try")]
    NoArguments,

    #[error("continuation dropped without a result")]
    Abandoned,
}

impl Failure {
    pub fn msg(message: impl Into<String>) -> Self {
        Failure::Message(message.into())
    }

    /// Wrap any error type as a failure value.
    pub fn from_error<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Failure::Source(Arc::new(err))
    }

    /// Follow `RetryLimitReached` / `TryLimitReached` wrappers down to the
    /// failure that started it.
    pub fn root_cause(&self) -> &Failure {
        match self {
            Failure::RetryLimitReached { last, .. } | Failure::TryLimitReached { last, .. } => {
                last.root_cause()
            }
            other => other,
        }
    }
}

/// The value a continuation receives: an ordinary value or a [`Failure`].
pub type Outcome<T> = std::result::Result<T, Failure>;

// ─── Error ────────────────────────────────────────────────────────────────

/// Errors from crate operations that sit outside the action protocol.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid retry limit {0}: use -1 for unlimited or a non-negative count")]
    InvalidRetryLimit(i64),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("disk on fire")]
    struct DiskError;

    #[test]
    fn source_failure_displays_inner_error() {
        let f = Failure::from_error(DiskError);
        assert_eq!(f.to_string(), "disk on fire");
    }

    #[test]
    fn root_cause_unwraps_nested_limits() {
        let f = Failure::TryLimitReached {
            attempts: 2,
            last: Box::new(Failure::RetryLimitReached {
                attempts: 3,
                last: Box::new(Failure::msg("boom")),
            }),
        };
        assert!(matches!(f.root_cause(), Failure::Message(m) if m == "boom"));
        assert!(f.to_string().contains("boom"));
    }

    #[test]
    fn all_failed_reports_count() {
        let f = Failure::AllFailed {
            failures: vec![Failure::msg("a"), Failure::msg("b")],
        };
        assert_eq!(f.to_string(), "all actions failed (2 failures)");
    }
}
