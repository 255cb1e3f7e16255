use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::action::{Action, Continuation};
use crate::error::Outcome;

/// Lock combinator state, ignoring poisoning. State is only ever mutated
/// in small non-panicking sections, so a poisoned lock still holds
/// consistent data.
pub(crate) fn lock<S>(state: &Mutex<S>) -> MutexGuard<'_, S> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A continuation plus the outcome it should receive, ready to be invoked
/// once the combinator's lock has been released.
pub(crate) type Delivery<T> = (Continuation<T>, Outcome<T>);

pub(crate) fn deliver<T>(delivery: Option<Delivery<T>>) {
    if let Some((k, outcome)) = delivery {
        k(outcome);
    }
}

/// One-shot gate around a continuation: the first outcome offered goes
/// through, the rest are dropped.
pub(crate) struct Latch<T> {
    slot: Arc<Mutex<Option<Continuation<T>>>>,
}

impl<T> Clone for Latch<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Latch<T> {
    pub(crate) fn new(k: Continuation<T>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(k))),
        }
    }

    /// Returns `true` if this outcome was the one forwarded.
    pub(crate) fn offer(&self, outcome: Outcome<T>) -> bool {
        let k = lock(&self.slot).take();
        match k {
            Some(k) => {
                k(outcome);
                true
            }
            None => {
                tracing::trace!("latch already released; discarding late outcome");
                false
            }
        }
    }
}

enum Hop<X> {
    Running,
    Arrived(Outcome<X>),
    Parked(Continuation<X>),
    Spent,
}

/// Fire `action` and return its outcome if it arrives before `fire`
/// returns. Otherwise return `None`; the outcome goes to `later` whenever
/// it does arrive.
///
/// Loops built on this stay flat for synchronous executors and only
/// resume through a continuation when an attempt is truly deferred.
pub(crate) fn fire_inline<X, L>(action: &Action<X>, later: L) -> Option<Outcome<X>>
where
    X: Send + 'static,
    L: FnOnce(Outcome<X>) + Send + 'static,
{
    let hop = Arc::new(Mutex::new(Hop::Running));
    let landing = Arc::clone(&hop);
    action.fire(move |outcome| {
        let parked = {
            let mut state = lock(&landing);
            match std::mem::replace(&mut *state, Hop::Spent) {
                Hop::Parked(k) => Some((k, outcome)),
                _ => {
                    *state = Hop::Arrived(outcome);
                    None
                }
            }
        };
        deliver(parked);
    });

    let mut state = lock(&hop);
    match std::mem::replace(&mut *state, Hop::Spent) {
        Hop::Arrived(outcome) => Some(outcome),
        _ => {
            *state = Hop::Parked(Box::new(later));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Failure;
    use crate::testutil::Manual;

    #[test]
    fn only_first_offer_is_forwarded() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let latch: Latch<i32> = Latch::new(Box::new(move |o| sink.lock().unwrap().push(o)));

        assert!(latch.clone().offer(Ok(1)));
        assert!(!latch.offer(Err(Failure::msg("late"))));
        assert!(!latch.offer(Ok(3)));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(matches!(seen[0], Ok(1)));
    }

    #[test]
    fn continuation_may_reenter_the_latch() {
        let latch: Arc<Mutex<Option<Latch<i32>>>> = Arc::new(Mutex::new(None));
        let inner = Arc::clone(&latch);
        let l = Latch::new(Box::new(move |_| {
            // The lock is released before the continuation runs.
            let again = inner.lock().unwrap().clone();
            assert!(!again.unwrap().offer(Ok(2)));
        }));
        *latch.lock().unwrap() = Some(l.clone());
        assert!(l.offer(Ok(1)));
    }

    #[test]
    fn fire_inline_returns_synchronous_outcomes() {
        let later_ran = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&later_ran);
        let got = fire_inline(&Action::ok(4), move |_| *flag.lock().unwrap() = true);
        assert!(matches!(got, Some(Ok(4))));
        assert!(!*later_ran.lock().unwrap());
    }

    #[test]
    fn fire_inline_parks_deferred_outcomes() {
        let manual = Manual::<i32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let got = fire_inline(&manual.action(), move |o| sink.lock().unwrap().push(o));
        assert!(got.is_none());
        assert!(seen.lock().unwrap().is_empty());

        manual.complete(Err(Failure::msg("late")));
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].as_ref().unwrap_err().to_string(), "late");
    }
}
