use std::sync::{Arc, Mutex};

use crate::action::{Action, Continuation};
use crate::combinators::latch::{deliver, lock, Delivery, Latch};
use crate::error::{Failure, Outcome};

/// Fire every action at once and forward whichever outcome arrives first,
/// success or failure.
///
/// Losers are not cancelled: they run to completion and their outcomes are
/// discarded. With no actions the continuation is never invoked.
pub fn any<T: Send + 'static>(actions: Vec<Action<T>>) -> Action<T> {
    Action::new(move |k| {
        let latch = Latch::new(k);
        for action in &actions {
            let latch = latch.clone();
            action.fire(move |outcome| {
                latch.offer(outcome);
            });
        }
    })
}

// ─── any_success ──────────────────────────────────────────────────────────

struct Race<T> {
    k: Option<Continuation<T>>,
    remaining: usize,
    failures: Vec<Failure>,
}

impl<T> Race<T> {
    fn settle(&mut self, outcome: Outcome<T>) -> Option<Delivery<T>> {
        if self.k.is_none() {
            tracing::trace!("race already settled; discarding late outcome");
            return None;
        }
        match outcome {
            Ok(value) => self.k.take().map(|k| (k, Ok(value))),
            Err(failure) => {
                self.remaining -= 1;
                self.failures.push(failure);
                if self.remaining > 0 {
                    return None;
                }
                let failures = std::mem::take(&mut self.failures);
                self.k
                    .take()
                    .map(|k| (k, Err(Failure::AllFailed { failures })))
            }
        }
    }
}

/// Fire every action at once and forward the first success.
///
/// Failures only count down. When every action has failed the result is
/// [`Failure::AllFailed`], carrying the failures in arrival order.
///
/// With no actions the countdown starts at zero and the continuation is
/// never invoked; callers that may pass an empty list must check first.
pub fn any_success<T: Send + 'static>(actions: Vec<Action<T>>) -> Action<T> {
    Action::new(move |k| {
        let race = Arc::new(Mutex::new(Race {
            k: Some(k),
            remaining: actions.len(),
            failures: Vec::new(),
        }));
        for action in &actions {
            let race = Arc::clone(&race);
            action.fire(move |outcome| {
                let delivery = lock(&race).settle(outcome);
                deliver(delivery);
            });
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{Manual, Sink};

    // ---------------------------------------------------------------------------
    // any
    // ---------------------------------------------------------------------------

    #[test]
    fn any_forwards_first_completion() {
        let slow = Manual::new();
        let fast = Manual::new();
        let sink = Sink::new();
        sink.attach(&any(vec![slow.action(), fast.action()]));

        fast.complete(Ok("fast"));
        slow.complete(Ok("slow"));

        let seen = sink.take();
        assert_eq!(seen.len(), 1);
        assert_eq!(*seen[0].as_ref().unwrap(), "fast");
    }

    #[test]
    fn any_lets_a_failure_win() {
        let a = Manual::<i32>::new();
        let b = Manual::new();
        let sink = Sink::new();
        sink.attach(&any(vec![a.action(), b.action()]));

        a.complete(Err(Failure::msg("first and failed")));
        b.complete(Ok(2));

        let seen = sink.take();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].is_err());
    }

    #[test]
    fn any_fires_every_action() {
        let a = Manual::<i32>::new();
        let b = Manual::new();
        let c = Manual::new();
        let sink = Sink::new();
        sink.attach(&any(vec![a.action(), b.action(), c.action()]));
        assert_eq!(a.pending() + b.pending() + c.pending(), 3);
    }

    #[test]
    fn any_with_no_actions_never_completes() {
        let sink = Sink::<i32>::new();
        sink.attach(&any(Vec::new()));
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn any_refires_with_a_fresh_latch() {
        let action = any(vec![Action::ok(1), Action::ok(2)]);
        let sink = Sink::new();
        sink.attach(&action);
        sink.attach(&action);
        let seen = sink.take();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|o| matches!(o, Ok(1))));
    }

    // ---------------------------------------------------------------------------
    // any_success
    // ---------------------------------------------------------------------------

    #[test]
    fn any_success_skips_failures() {
        let a = Manual::new();
        let b = Manual::new();
        let c = Manual::new();
        let sink = Sink::new();
        sink.attach(&any_success(vec![a.action(), b.action(), c.action()]));

        a.complete(Err(Failure::msg("a down")));
        assert_eq!(sink.count(), 0);
        b.complete(Ok(20));
        c.complete(Err(Failure::msg("c down")));

        let seen = sink.take();
        assert_eq!(seen.len(), 1);
        assert!(matches!(seen[0], Ok(20)));
    }

    #[test]
    fn any_success_reports_all_failed() {
        let a = Manual::<i32>::new();
        let b = Manual::new();
        let sink = Sink::new();
        sink.attach(&any_success(vec![a.action(), b.action()]));

        b.complete(Err(Failure::msg("b")));
        a.complete(Err(Failure::msg("a")));

        let seen = sink.take();
        assert_eq!(seen.len(), 1);
        match &seen[0] {
            Err(Failure::AllFailed { failures }) => {
                let order: Vec<String> = failures.iter().map(|f| f.to_string()).collect();
                assert_eq!(order, vec!["b", "a"]);
            }
            other => panic!("expected AllFailed, got {other:?}"),
        }
    }

    #[test]
    fn any_success_with_no_actions_never_completes() {
        let sink = Sink::<i32>::new();
        sink.attach(&any_success(Vec::new()));
        assert_eq!(sink.count(), 0);
    }
}
