use std::fmt;
use std::sync::Arc;

use crate::error::{Failure, Outcome};
use crate::step::Step;

/// The one-shot callback an executor hands its result to.
///
/// It is `FnOnce`, so an executor can deliver at most one outcome per firing.
pub type Continuation<T> = Box<dyn FnOnce(Outcome<T>) + Send + 'static>;

type Executor<T> = dyn Fn(Continuation<T>) + Send + Sync + 'static;

// ─── Action ───────────────────────────────────────────────────────────────

/// A reusable reference to a deferred computation.
///
/// Building an action runs nothing. Every call to [`fire`](Action::fire),
/// [`go`](Action::go) or [`go_detached`](Action::go_detached) runs the
/// executor again from scratch; there is no cached result and no "settled"
/// state. Cloning is cheap and clones share the same executor.
///
/// ```rust
/// use refire::{Action, Failure, Step};
///
/// let parsed = Action::ok("41".to_string())
///     .next(|s: String| Step::from(s.parse::<i32>().map_err(Failure::from_error)))
///     .map(|n| n + 1);
///
/// parsed.go(|n| assert_eq!(n, 42));
/// ```
pub struct Action<T> {
    executor: Arc<Executor<T>>,
}

impl<T> Clone for Action<T> {
    fn clone(&self) -> Self {
        Action {
            executor: Arc::clone(&self.executor),
        }
    }
}

impl<T> fmt::Debug for Action<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Action<T> {
    /// Wrap an executor. The executor must eventually hand exactly one
    /// outcome to the continuation it is given, synchronously or later.
    pub fn new<F>(executor: F) -> Self
    where
        F: Fn(Continuation<T>) + Send + Sync + 'static,
    {
        Action {
            executor: Arc::new(executor),
        }
    }

    /// An action that yields a clone of `value` every time it fires.
    pub fn ok(value: T) -> Self
    where
        T: Clone + Sync,
    {
        Action::new(move |k| k(Ok(value.clone())))
    }

    /// An action that yields `failure` every time it fires.
    pub fn fail(failure: Failure) -> Self {
        Action::new(move |k| k(Err(failure.clone())))
    }

    /// Synchronous executor: `f` is called once per firing.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> Outcome<T> + Send + Sync + 'static,
    {
        Action::new(move |k| k(f()))
    }

    /// Build the real action at firing time instead of up front.
    pub fn defer<F>(build: F) -> Self
    where
        F: Fn() -> Action<T> + Send + Sync + 'static,
    {
        Action::new(move |k| build().run(k))
    }

    // ── Firing ──

    /// Fire the action and hand the raw outcome, success or failure, to `cb`.
    pub fn fire<F>(&self, cb: F)
    where
        F: FnOnce(Outcome<T>) + Send + 'static,
    {
        self.run(Box::new(cb));
    }

    /// Fire the action and hand a successful value to `cb`.
    ///
    /// # Panics
    ///
    /// A terminal failure is never passed to `cb`. It is logged and then
    /// raised as a panic inside the continuation, on whichever thread or
    /// task delivered it. Put a [`guard`](Action::guard) in front, or use
    /// [`fire`](Action::fire), to handle failures.
    pub fn go<F>(&self, cb: F)
    where
        F: FnOnce(T) + Send + 'static,
    {
        self.fire(move |outcome| match outcome {
            Ok(value) => cb(value),
            Err(failure) => raise_unhandled(failure),
        });
    }

    /// Like [`go`](Action::go) without a callback: values are discarded,
    /// failures still panic.
    pub fn go_detached(&self) {
        self.fire(|outcome| {
            if let Err(failure) = outcome {
                raise_unhandled(failure);
            }
        });
    }

    pub(crate) fn run(&self, k: Continuation<T>) {
        (self.executor)(k)
    }

    // ── Chaining ──

    /// Feed every outcome of `self` into `cb`, failures included, and
    /// flatten whatever `cb` returns into the new action's result.
    pub fn chain<U, F>(&self, cb: F) -> Action<U>
    where
        U: Send + 'static,
        F: Fn(Outcome<T>) -> Step<U> + Send + Sync + 'static,
    {
        let upstream = self.clone();
        let cb = Arc::new(cb);
        Action::new(move |k: Continuation<U>| {
            let cb = Arc::clone(&cb);
            upstream.fire(move |data| forward(cb(data), k));
        })
    }

    /// Run `cb` on success. A failure skips `cb` and flows straight through.
    pub fn next<U, F>(&self, cb: F) -> Action<U>
    where
        U: Send + 'static,
        F: Fn(T) -> Step<U> + Send + Sync + 'static,
    {
        self.chain(move |data| match data {
            Ok(value) => cb(value),
            Err(failure) => Step::Failure(failure),
        })
    }

    /// Run `cb` on failure. A success skips `cb` and flows straight through.
    ///
    /// `cb` may recover with a value, retry with a nested action, or
    /// re-raise by returning another failure.
    pub fn guard<F>(&self, cb: F) -> Action<T>
    where
        F: Fn(Failure) -> Step<T> + Send + Sync + 'static,
    {
        self.chain(move |data| match data {
            Ok(value) => Step::Value(value),
            Err(failure) => cb(failure),
        })
    }

    pub fn map<U, F>(&self, f: F) -> Action<U>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        self.next(move |value| Step::Value(f(value)))
    }

    /// `next` whose callback always continues with another action.
    pub fn then<U, F>(&self, f: F) -> Action<U>
    where
        U: Send + 'static,
        F: Fn(T) -> Action<U> + Send + Sync + 'static,
    {
        self.next(move |value| Step::Pending(f(value)))
    }

    /// `guard` whose callback always recovers with a plain value.
    pub fn recover<F>(&self, f: F) -> Action<T>
    where
        F: Fn(Failure) -> T + Send + Sync + 'static,
    {
        self.guard(move |failure| Step::Value(f(failure)))
    }
}

fn forward<U: Send + 'static>(step: Step<U>, k: Continuation<U>) {
    match step {
        Step::Value(value) => k(Ok(value)),
        Step::Failure(failure) => k(Err(failure)),
        Step::Pending(nested) => nested.run(k),
    }
}

fn raise_unhandled(failure: Failure) -> ! {
    tracing::error!(failure = %failure, "action ended in a failure nothing guarded");
    panic!("unhandled action failure: {failure}");
}

// ─── Tests ────────────────────────────────────────────────────────────────
