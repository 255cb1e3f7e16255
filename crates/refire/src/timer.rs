use std::time::Duration;

use crate::action::Action;

/// The delay primitive `gap_retry` waits on between attempts.
///
/// This crate owns no scheduler; a timer is supplied by the host. Any
/// `Fn(Duration) -> Action<()>` closure is a timer.
pub trait Timer: Send + Sync {
    /// An action that succeeds with `()` once `interval` has elapsed.
    fn delay(&self, interval: Duration) -> Action<()>;
}

impl<F> Timer for F
where
    F: Fn(Duration) -> Action<()> + Send + Sync,
{
    fn delay(&self, interval: Duration) -> Action<()> {
        self(interval)
    }
}

/// Timer backed by `tokio::time::sleep`. Firing its delays requires an
/// active Tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

impl Timer for TokioTimer {
    fn delay(&self, interval: Duration) -> Action<()> {
        Action::from_future(move || async move {
            tokio::time::sleep(interval).await;
            Ok(())
        })
    }
}
