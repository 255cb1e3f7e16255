//! Helpers shared by the unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::action::{Action, Continuation};
use crate::error::Outcome;

/// Fire an action whose executor completes synchronously and return its
/// outcome. Panics if the action did not complete before returning.
pub(crate) fn fire_sync<T: Send + 'static>(action: &Action<T>) -> Outcome<T> {
    let slot = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&slot);
    action.fire(move |outcome| *sink.lock().unwrap() = Some(outcome));
    let outcome = slot.lock().unwrap().take();
    outcome.expect("action did not complete synchronously")
}

/// An action source whose firings park their continuations until the test
/// completes them by hand, in FIFO order.
pub(crate) struct Manual<T> {
    parked: Arc<Mutex<VecDeque<Continuation<T>>>>,
}

impl<T: Send + 'static> Manual<T> {
    pub(crate) fn new() -> Self {
        Self {
            parked: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    pub(crate) fn action(&self) -> Action<T> {
        let parked = Arc::clone(&self.parked);
        Action::new(move |k| parked.lock().unwrap().push_back(k))
    }

    pub(crate) fn pending(&self) -> usize {
        self.parked.lock().unwrap().len()
    }

    /// Complete the oldest parked firing.
    pub(crate) fn complete(&self, outcome: Outcome<T>) {
        let k = self.parked.lock().unwrap().pop_front();
        k.expect("no parked firing to complete")(outcome);
    }
}

/// Records what a fired action delivered, and how many times.
pub(crate) struct Sink<T> {
    seen: Arc<Mutex<Vec<Outcome<T>>>>,
}

impl<T: Send + 'static> Sink<T> {
    pub(crate) fn new() -> Self {
        Self {
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn attach(&self, action: &Action<T>) {
        let seen = Arc::clone(&self.seen);
        action.fire(move |outcome| seen.lock().unwrap().push(outcome));
    }

    pub(crate) fn count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub(crate) fn take(&self) -> Vec<Outcome<T>> {
        std::mem::take(&mut *self.seen.lock().unwrap())
    }
}
