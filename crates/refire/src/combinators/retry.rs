use std::sync::Arc;
use std::time::Duration;

use crate::action::Action;
use crate::combinators::latch::{fire_inline, Latch};
use crate::error::{Failure, Outcome};
use crate::policy::RetryLimit;
use crate::timer::Timer;

#[derive(Clone)]
struct Gap {
    interval: Duration,
    timer: Arc<dyn Timer>,
}

/// Re-fire `action` on failure, up to `limit` times after the first attempt.
///
/// `RetryLimit::Limited(0)` makes exactly one attempt. Once the budget is
/// spent the result is [`Failure::RetryLimitReached`] wrapping the last
/// failure. The budget is counted per firing of the returned action.
///
/// Attempts that complete synchronously are run in a loop, so a large or
/// unlimited budget does not grow the stack.
pub fn retry<T: Send + 'static>(limit: RetryLimit, action: Action<T>) -> Action<T> {
    retrying(action, limit, None)
}

/// [`retry`], waiting `interval` on `timer` before each re-fire.
///
/// If the timer's delay action itself fails, retrying stops and that
/// failure is forwarded unchanged. It is not counted against the budget
/// and is not wrapped in [`Failure::RetryLimitReached`].
pub fn gap_retry<T: Send + 'static>(
    limit: RetryLimit,
    interval: Duration,
    action: Action<T>,
    timer: Arc<dyn Timer>,
) -> Action<T> {
    retrying(action, limit, Some(Gap { interval, timer }))
}

fn retrying<T: Send + 'static>(
    action: Action<T>,
    limit: RetryLimit,
    gap: Option<Gap>,
) -> Action<T> {
    Action::new(move |k| {
        Attempts {
            action: action.clone(),
            gap: gap.clone(),
            remaining: limit,
            attempts: 1,
            k: Latch::new(k),
        }
        .drive(Stage::Fire)
    })
}

enum Stage<T> {
    Fire,
    Attempted(Outcome<T>),
    Waited(Outcome<()>),
}

/// The retry loop for one firing.
struct Attempts<T> {
    action: Action<T>,
    gap: Option<Gap>,
    remaining: RetryLimit,
    attempts: u32,
    k: Latch<T>,
}

impl<T> Clone for Attempts<T> {
    fn clone(&self) -> Self {
        Self {
            action: self.action.clone(),
            gap: self.gap.clone(),
            remaining: self.remaining,
            attempts: self.attempts,
            k: self.k.clone(),
        }
    }
}

impl<T: Send + 'static> Attempts<T> {
    fn drive(mut self, mut stage: Stage<T>) {
        loop {
            stage = match stage {
                Stage::Fire => {
                    let this = self.clone();
                    match fire_inline(&self.action, move |o| this.drive(Stage::Attempted(o))) {
                        Some(outcome) => Stage::Attempted(outcome),
                        None => return,
                    }
                }
                Stage::Attempted(Ok(value)) => {
                    self.k.offer(Ok(value));
                    return;
                }
                Stage::Attempted(Err(failure)) => {
                    let Some(left) = self.remaining.decrement() else {
                        tracing::warn!(
                            attempts = self.attempts,
                            failure = %failure,
                            "retry limit reached"
                        );
                        self.k.offer(Err(Failure::RetryLimitReached {
                            attempts: self.attempts,
                            last: Box::new(failure),
                        }));
                        return;
                    };
                    self.remaining = left;
                    self.attempts = self.attempts.saturating_add(1);
                    tracing::debug!(
                        attempt = self.attempts,
                        remaining = %left,
                        failure = %failure,
                        "retrying action"
                    );
                    match &self.gap {
                        None => Stage::Fire,
                        Some(gap) => {
                            let this = self.clone();
                            let wait = gap.timer.delay(gap.interval);
                            match fire_inline(&wait, move |o| this.drive(Stage::Waited(o))) {
                                Some(outcome) => Stage::Waited(outcome),
                                None => return,
                            }
                        }
                    }
                }
                Stage::Waited(Ok(())) => Stage::Fire,
                Stage::Waited(Err(failure)) => {
                    tracing::warn!(
                        attempts = self.attempts,
                        failure = %failure,
                        "retry timer failed"
                    );
                    self.k.offer(Err(failure));
                    return;
                }
            };
        }
    }
}
