//! Values that may not have resolved yet.
//!
//! A resource graph is evaluated before the infrastructure it describes
//! exists, so fields such as identifiers and subnet lists are often not known
//! at composition time. An [`Output`] is a cheaply cloneable handle to such a
//! value: derivation logic is attached with [`map`](Output::map) and runs once
//! the underlying value resolves, without ever blocking the composer.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::Context;
use std::task::Poll;

use futures::FutureExt as _;
use futures::future::BoxFuture;
use futures::future::Shared;

/// A value in the resource graph that may still be pending.
pub struct Output<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// The shared computation producing the value.
    inner: Shared<BoxFuture<'static, T>>,
}

impl<T> Output<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates an already-resolved output.
    pub fn value(value: T) -> Self {
        Self::from_future(futures::future::ready(value))
    }

    /// Creates an output backed by a not-yet-resolved computation.
    pub fn from_future<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            inner: future.boxed().shared(),
        }
    }

    /// Applies a pure transformation to the value once it resolves.
    ///
    /// The transformation is deferred; calling `map` never blocks.
    pub fn map<U, F>(&self, f: F) -> Output<U>
    where
        U: Clone + Send + Sync + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        let inner = self.inner.clone();
        Output::from_future(inner.map(f))
    }

    /// Pairs this output with another.
    pub fn zip<U>(&self, other: &Output<U>) -> Output<(T, U)>
    where
        U: Clone + Send + Sync + 'static,
    {
        let left = self.inner.clone();
        let right = other.inner.clone();
        Output::from_future(async move { futures::join!(left, right) })
    }

    /// Collects a list of outputs into an output of a list.
    pub fn all<I>(outputs: I) -> Output<Vec<T>>
    where
        I: IntoIterator<Item = Output<T>>,
    {
        let futures = outputs
            .into_iter()
            .map(|output| output.inner)
            .collect::<Vec<_>>();

        Output::from_future(futures::future::join_all(futures))
    }

    /// Gets a reference to the value without blocking.
    ///
    /// Returns [`None`] if the value has not resolved yet.
    pub fn peek(&self) -> Option<&T> {
        self.inner.peek()
    }
}

impl<T> Clone for Output<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for Output<T>
where
    T: Clone + Send + Sync + fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.peek() {
            Some(value) => f.debug_tuple("Output").field(value).finish(),
            None => f.write_str("Output(<pending>)"),
        }
    }
}

impl<T> Future for Output<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Output = T;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

impl<T> From<T> for Output<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn from(value: T) -> Self {
        Self::value(value)
    }
}

impl From<&str> for Output<String> {
    fn from(value: &str) -> Self {
        Self::value(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn map_applies_once_resolved() {
        let output = Output::value(21).map(|value| value * 2);
        assert_eq!(output.await, 42);
    }

    #[tokio::test]
    async fn zip_pairs_outputs() {
        let left = Output::value(String::from("a"));
        let right = Output::value(1);
        assert_eq!(left.zip(&right).await, (String::from("a"), 1));
    }

    #[tokio::test]
    async fn all_collects_in_order() {
        let outputs = vec![Output::value(1), Output::value(2), Output::value(3)];
        assert_eq!(Output::all(outputs).await, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn clones_share_the_same_resolution() {
        let output = Output::from_future(async { String::from("shared") });
        let clone = output.clone();
        assert_eq!(output.await, "shared");
        assert_eq!(clone.await, "shared");
    }

    #[test]
    fn peek_is_none_before_resolution() {
        let output = Output::from_future(async { 1 });
        assert!(output.peek().is_none());
    }

    #[test]
    fn peek_sees_resolved_values() {
        let output = Output::value(7);
        // A resolved output still has to be polled once for `peek` to see it.
        let output = futures::executor::block_on(async {
            let clone = output.clone();
            clone.await;
            output
        });
        assert_eq!(output.peek(), Some(&7));
    }
}
