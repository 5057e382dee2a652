//! Single-shot completion handed in by the host runtime
//!
//! A [`Promise`] is consumed by whichever of `resolve` or `reject` runs, so
//! it cannot complete twice. [`Completion`] covers the other half: if it is
//! dropped before either runs, the promise is rejected with `INTERNAL_ERROR`.

use serde_json::Value;
use tokio::sync::oneshot;

use crate::BridgeFailure;

/// Host callback pair for one bridge call
pub trait Promise: Send + 'static {
    fn resolve(self, value: Value);
    fn reject(self, failure: BridgeFailure);
}

/// Promise backed by two closures
pub struct CallbackPromise<R, J> {
    on_resolve: R,
    on_reject: J,
}

impl<R, J> CallbackPromise<R, J>
where
    R: FnOnce(Value) + Send + 'static,
    J: FnOnce(BridgeFailure) + Send + 'static,
{
    pub fn new(on_resolve: R, on_reject: J) -> Self {
        Self { on_resolve, on_reject }
    }
}

impl<R, J> Promise for CallbackPromise<R, J>
where
    R: FnOnce(Value) + Send + 'static,
    J: FnOnce(BridgeFailure) + Send + 'static,
{
    fn resolve(self, value: Value) {
        (self.on_resolve)(value)
    }

    fn reject(self, failure: BridgeFailure) {
        (self.on_reject)(failure)
    }
}

// Async hosts await the receiving half.
impl Promise for oneshot::Sender<Result<Value, BridgeFailure>> {
    fn resolve(self, value: Value) {
        if self.send(Ok(value)).is_err() {
            tracing::debug!("promise receiver dropped before resolution");
        }
    }

    fn reject(self, failure: BridgeFailure) {
        if self.send(Err(failure)).is_err() {
            tracing::debug!("promise receiver dropped before rejection");
        }
    }
}

/// Owns a promise until the call finishes
pub(crate) struct Completion<P: Promise> {
    method: String,
    promise: Option<P>,
}

impl<P: Promise> Completion<P> {
    pub(crate) fn new(method: &str, promise: P) -> Self {
        Self {
            method: method.to_string(),
            promise: Some(promise),
        }
    }

    pub(crate) fn finish(mut self, result: Result<Value, BridgeFailure>) {
        let Some(promise) = self.promise.take() else {
            return;
        };
        match result {
            Ok(value) => promise.resolve(value),
            Err(failure) => {
                tracing::warn!("{} rejected with {}", self.method, failure.code);
                promise.reject(failure)
            }
        }
    }
}

impl<P: Promise> Drop for Completion<P> {
    fn drop(&mut self) {
        if let Some(promise) = self.promise.take() {
            tracing::warn!("{} ended without completing its promise", self.method);
            promise.reject(BridgeFailure::internal(format!(
                "{} ended without a result",
                self.method
            )));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::mpsc;

    fn recording_promise() -> (
        CallbackPromise<impl FnOnce(Value) + Send + 'static, impl FnOnce(BridgeFailure) + Send + 'static>,
        mpsc::Receiver<Result<Value, BridgeFailure>>,
    ) {
        let (tx, rx) = mpsc::channel();
        let reject_tx = tx.clone();
        let promise = CallbackPromise::new(
            move |value| tx.send(Ok(value)).unwrap(),
            move |failure| reject_tx.send(Err(failure)).unwrap(),
        );
        (promise, rx)
    }

    #[test]
    fn test_finish_resolves_once() {
        let (promise, rx) = recording_promise();

        Completion::new("prove", promise).finish(Ok(json!({"verified": true})));

        assert_eq!(rx.recv().unwrap().unwrap(), json!({"verified": true}));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_completion_rejects() {
        let (promise, rx) = recording_promise();

        drop(Completion::new("verify", promise));

        let failure = rx.recv().unwrap().unwrap_err();
        assert_eq!(failure.code, crate::INTERNAL_ERROR);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_oneshot_sender_is_a_promise() {
        let (tx, mut rx) = oneshot::channel();

        Completion::new("setupSrs", tx).finish(Err(BridgeFailure::internal("boom")));

        let failure = rx.try_recv().unwrap().unwrap_err();
        assert_eq!(failure.message, "boom");
    }
}
