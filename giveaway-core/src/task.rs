use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::{JoinError, JoinHandle};

/// A spawned task that is aborted if its handle is dropped before completion.
///
/// Used for pending-listing work so cancelling a join (for example because the
/// caller's own deadline fired) does not leave resolution tasks running.
#[derive(Debug)]
pub struct AbortOnDrop<T> {
    inner: JoinHandle<T>,
}

impl<T: Send + 'static> AbortOnDrop<T> {
    /// Spawn `fut` on the current Tokio runtime.
    pub fn spawn<F>(fut: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            inner: tokio::spawn(fut),
        }
    }
}

impl<T> AbortOnDrop<T> {
    /// Return `true` if the underlying task has completed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

impl<T> Future for AbortOnDrop<T> {
    type Output = Result<T, JoinError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.inner).poll(cx)
    }
}

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        if !self.inner.is_finished() {
            self.inner.abort();
        }
    }
}
