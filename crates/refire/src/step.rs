use crate::action::Action;
use crate::error::{Failure, Outcome};

/// What a `chain`/`next`/`guard` callback hands back.
///
/// `Pending` is flattened: the nested action is fired and *its* outcome is
/// forwarded, so callers downstream only ever see a value or a failure.
pub enum Step<T> {
    Value(T),
    Pending(Action<T>),
    Failure(Failure),
}

impl<T> Step<T> {
    pub fn fail(message: impl Into<String>) -> Self {
        Step::Failure(Failure::msg(message))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Step::Failure(_))
    }
}

impl<T> From<Outcome<T>> for Step<T> {
    fn from(outcome: Outcome<T>) -> Self {
        match outcome {
            Ok(v) => Step::Value(v),
            Err(f) => Step::Failure(f),
        }
    }
}

impl<T> From<Action<T>> for Step<T> {
    fn from(action: Action<T>) -> Self {
        Step::Pending(action)
    }
}

impl<T> From<Failure> for Step<T> {
    fn from(failure: Failure) -> Self {
        Step::Failure(failure)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Step<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Step::Pending(_) => f.write_str("Pending(..)"),
            Step::Failure(e) => f.debug_tuple("Failure").field(e).finish(),
        }
    }
}
