//! `refire`: replayable continuation-passing actions.
//!
//! An [`Action`] is a reusable reference to a deferred computation. Nothing
//! runs when it is built; every firing runs it again. Failures travel as
//! ordinary values on the same channel as successes and are only consumed
//! by `guard` steps.
//!
//! ```text
//! Action::new(executor)        ← wraps any callback-style async source
//!     │
//!     ├── .next(cb)            ← runs on success, skipped on failure
//!     ├── .guard(cb)           ← runs on failure, skipped on success
//!     │
//!     ├── .go(cb)              ← fire; unguarded failure panics
//!     └── .fire(cb)            ← fire; raw Outcome, never panics
//! ```
//!
//! The [`combinators`] module builds racing, fan-out/fan-in, sequencing and
//! retry on top of that contract. The crate owns no scheduler: executors
//! decide where work runs, and [`Timer`] is the only delay primitive it
//! consumes. [`TokioTimer`] and [`Action::from_future`] plug into a Tokio
//! runtime; any action can be awaited through `IntoFuture`.
//!
//! # Quick start
//!
//! ```rust
//! use refire::combinators::{all, retry};
//! use refire::{Action, Failure, RetryLimit, Step};
//!
//! let fetch = |n: u32| Action::from_fn(move || Ok(n * 10));
//! let total = all(vec![fetch(1), fetch(2), fetch(3)])
//!     .map(|parts| parts.into_iter().sum::<u32>())
//!     .next(|sum| if sum > 0 { Step::Value(sum) } else { Step::fail("empty") });
//!
//! let guarded = retry(RetryLimit::Limited(2), total).recover(|_: Failure| 0);
//! guarded.go(|sum| assert_eq!(sum, 60));
//! ```

pub mod action;
mod bridge;
pub mod combinators;
pub mod error;
pub mod policy;
pub mod step;
pub mod timer;

#[cfg(test)]
mod testutil;

pub use action::{Action, Continuation};
pub use error::{Error, Failure, Outcome, Result};
pub use policy::{RetryLimit, RetryPolicy};
pub use step::Step;
pub use timer::{Timer, TokioTimer};
