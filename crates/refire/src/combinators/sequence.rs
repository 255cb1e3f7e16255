use std::sync::Arc;

use crate::action::Action;
use crate::error::Failure;

/// A step of a [`sequence`]: builds the next action from the previous
/// action's value.
pub type Factory<T> = Arc<dyn Fn(T) -> Action<T> + Send + Sync>;

pub fn factory<T, F>(f: F) -> Factory<T>
where
    F: Fn(T) -> Action<T> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Compose factories left to right. The returned function builds an action
/// that feeds `input` to the first factory, each value on to the next, and
/// yields the last one. A failure anywhere skips the remaining factories.
///
/// With no factories the built action fails with [`Failure::NoActions`].
pub fn sequence<T: Send + 'static>(
    factories: Vec<Factory<T>>,
) -> impl Fn(T) -> Action<T> + Clone + Send + Sync + 'static {
    let factories: Arc<[Factory<T>]> = factories.into();
    move |input| {
        let Some((first, rest)) = factories.split_first() else {
            return Action::fail(Failure::NoActions);
        };
        rest.iter().fold(first(input), |acc, step| {
            let step = Arc::clone(step);
            acc.then(move |value| step(value))
        })
    }
}
