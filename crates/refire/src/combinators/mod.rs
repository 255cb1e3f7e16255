//! Factories that assemble new actions out of existing ones.
//!
//! Every combinator is built on the public firing contract only
//! ([`Action::fire`](crate::Action::fire), `next`, `guard`, `Action::new`).
//! Shared state for a fan-out (latches, countdowns, result slots) is created
//! per firing and is never shared between firings.

mod fan;
pub(crate) mod latch;
mod race;
mod retry;
mod sequence;
mod sequence_try;

pub use fan::{all, all_success};
pub use race::{any, any_success};
pub use retry::{gap_retry, retry};
pub use sequence::{factory, sequence, Factory};
pub use sequence_try::sequence_try;
