use std::sync::Arc;

use crate::action::Action;
use crate::combinators::latch::{fire_inline, Latch};
use crate::error::{Failure, Outcome};

/// Try `factory` on each input in order until one succeeds.
///
/// The first successful value is forwarded. If every input fails the result
/// is [`Failure::TryLimitReached`] wrapping the last failure. An empty
/// `inputs` fails with [`Failure::NoArguments`] without calling `factory`.
pub fn sequence_try<I, T, F>(inputs: Vec<I>, factory: F) -> Action<T>
where
    I: Clone + Send + Sync + 'static,
    T: Send + 'static,
    F: Fn(I) -> Action<T> + Send + Sync + 'static,
{
    if inputs.is_empty() {
        return Action::fail(Failure::NoArguments);
    }
    let inputs: Arc<[I]> = inputs.into();
    let factory = Arc::new(factory);
    Action::new(move |k| {
        Trial {
            inputs: Arc::clone(&inputs),
            index: 0,
            factory: Arc::clone(&factory),
            k: Latch::new(k),
        }
        .drive(None)
    })
}

/// Walks the inputs for one firing. Synchronous failures advance in a loop.
struct Trial<I, T, F> {
    inputs: Arc<[I]>,
    index: usize,
    factory: Arc<F>,
    k: Latch<T>,
}

impl<I, T, F> Clone for Trial<I, T, F> {
    fn clone(&self) -> Self {
        Self {
            inputs: Arc::clone(&self.inputs),
            index: self.index,
            factory: Arc::clone(&self.factory),
            k: self.k.clone(),
        }
    }
}

impl<I, T, F> Trial<I, T, F>
where
    I: Clone + Send + Sync + 'static,
    T: Send + 'static,
    F: Fn(I) -> Action<T> + Send + Sync + 'static,
{
    fn drive(mut self, mut arrived: Option<Outcome<T>>) {
        loop {
            let outcome = match arrived.take() {
                Some(outcome) => outcome,
                None => {
                    let action = (self.factory)(self.inputs[self.index].clone());
                    let this = self.clone();
                    match fire_inline(&action, move |o| this.drive(Some(o))) {
                        Some(outcome) => outcome,
                        None => return,
                    }
                }
            };

            let failure = match outcome {
                Ok(value) => {
                    self.k.offer(Ok(value));
                    return;
                }
                Err(failure) => failure,
            };

            self.index += 1;
            if self.index >= self.inputs.len() {
                tracing::warn!(
                    attempts = self.inputs.len(),
                    failure = %failure,
                    "every input failed"
                );
                self.k.offer(Err(Failure::TryLimitReached {
                    attempts: self.inputs.len(),
                    last: Box::new(failure),
                }));
                return;
            }
            tracing::debug!(index = self.index, failure = %failure, "trying next input");
        }
    }
}
