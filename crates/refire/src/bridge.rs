use std::future::{Future, IntoFuture};

use futures::channel::oneshot;
use futures::future::BoxFuture;
use futures::FutureExt;

use crate::action::Action;
use crate::error::{Failure, Outcome};

// ─── Futures → Action ─────────────────────────────────────────────────────

impl<T: Send + 'static> Action<T> {
    /// Build an action from an async factory. Each firing calls `factory`
    /// and spawns the resulting future on the current Tokio runtime; the
    /// future's output becomes the action's outcome.
    ///
    /// # Panics
    ///
    /// Firing panics when no Tokio runtime is active on the firing thread.
    pub fn from_future<F, Fut>(factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Outcome<T>> + Send + 'static,
    {
        Action::new(move |k| {
            let fut = factory();
            tokio::spawn(async move { k(fut.await) });
        })
    }

    // ─── Action → Futures ─────────────────────────────────────────────────

    /// Fire the action once, when the returned future is first polled, and
    /// resolve with its outcome.
    ///
    /// Resolves with [`Failure::Abandoned`] if the executor drops its
    /// continuation without delivering anything.
    pub fn outcome(&self) -> BoxFuture<'static, Outcome<T>> {
        let action = self.clone();
        async move {
            let (tx, rx) = oneshot::channel();
            action.fire(move |outcome| {
                let _ = tx.send(outcome);
            });
            rx.await.unwrap_or(Err(Failure::Abandoned))
        }
        .boxed()
    }
}

impl<T: Send + 'static> IntoFuture for Action<T> {
    type Output = Outcome<T>;
    type IntoFuture = BoxFuture<'static, Outcome<T>>;

    fn into_future(self) -> Self::IntoFuture {
        self.outcome()
    }
}
