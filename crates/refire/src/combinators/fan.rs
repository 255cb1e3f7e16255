use std::sync::{Arc, Mutex};

use crate::action::{Action, Continuation};
use crate::combinators::latch::{deliver, lock, Delivery};
use crate::error::{Failure, Outcome};

/// Result slots for one firing of a fan-out. Each inner action writes to
/// the slot matching its position in the input, whatever order they finish.
struct FanIn<S> {
    k: Option<Continuation<Vec<S>>>,
    slots: Vec<Option<S>>,
    remaining: usize,
}

impl<S> FanIn<S> {
    fn new(k: Continuation<Vec<S>>, len: usize) -> Self {
        Self {
            k: Some(k),
            slots: (0..len).map(|_| None).collect(),
            remaining: len,
        }
    }

    fn fill(&mut self, index: usize, value: S) -> Option<Delivery<Vec<S>>> {
        if self.k.is_none() {
            tracing::trace!(index, "fan-in already settled; discarding late outcome");
            return None;
        }
        self.slots[index] = Some(value);
        self.remaining -= 1;
        if self.remaining > 0 {
            return None;
        }
        let values = self.slots.drain(..).flatten().collect();
        self.k.take().map(|k| (k, Ok(values)))
    }

    fn abort(&mut self, index: usize, failure: Failure) -> Option<Delivery<Vec<S>>> {
        match self.k.take() {
            Some(k) => {
                tracing::debug!(index, failure = %failure, "fan-in failing fast");
                Some((k, Err(failure)))
            }
            None => {
                tracing::trace!(index, "fan-in already settled; discarding late failure");
                None
            }
        }
    }
}

fn fan_out<T, S, F>(actions: &[Action<T>], k: Continuation<Vec<S>>, on_outcome: F)
where
    T: Send + 'static,
    S: Send + 'static,
    F: Fn(&mut FanIn<S>, usize, Outcome<T>) -> Option<Delivery<Vec<S>>>
        + Send
        + Sync
        + Copy
        + 'static,
{
    if actions.is_empty() {
        k(Ok(Vec::new()));
        return;
    }
    let fan = Arc::new(Mutex::new(FanIn::new(k, actions.len())));
    for (index, action) in actions.iter().enumerate() {
        let fan = Arc::clone(&fan);
        action.fire(move |outcome| {
            let delivery = {
                let mut fan = lock(&fan);
                on_outcome(&mut *fan, index, outcome)
            };
            deliver(delivery);
        });
    }
}

/// Fire every action at once and collect their values in input order.
///
/// The first failure is forwarded immediately and every later outcome is
/// ignored. An empty list yields an empty `Vec`.
pub fn all<T: Send + 'static>(actions: Vec<Action<T>>) -> Action<Vec<T>> {
    Action::new(move |k| {
        fan_out(&actions, k, |fan, index, outcome| match outcome {
            Ok(value) => fan.fill(index, value),
            Err(failure) => fan.abort(index, failure),
        })
    })
}

/// Fire every action at once and collect every outcome, success or
/// failure, in input order. Never fails fast: the aggregate completes once
/// every action has delivered.
pub fn all_success<T: Send + 'static>(actions: Vec<Action<T>>) -> Action<Vec<Outcome<T>>> {
    Action::new(move |k| fan_out(&actions, k, |fan, index, outcome| fan.fill(index, outcome)))
}
