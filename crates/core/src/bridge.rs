//! Try-bridges from failure-raising code into `Result`
//!
//! Each bridge catches at its own boundary: panics (including raised
//! [`Failure`](crate::errors::Failure)s) and, for the `fallible` forms,
//! returned errors are converted through [`Error::convert`] /
//! [`Error::from_boxed`] and come back as `Err`. Nothing escapes a bridge.

use crate::cancellation::CancellationToken;
use crate::errors::{Error, Result};
use crate::fail_fast::{ensure_hook, CaptureGuard};
use crate::result::VoidResult;
use crate::void::Void;
use futures::FutureExt;
use std::any::Any;
use std::error::Error as StdError;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Boxed error accepted by the `fallible` bridges
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Namespace for the try-bridge operations
pub struct Attempt;

fn captured(payload: Box<dyn Any + Send + 'static>) -> Error {
    let error = Error::convert(payload);
    tracing::debug!(kind = %error.kind(), %error, "captured failure");
    error
}

async fn capture<Fut>(future: Fut) -> Result<Fut::Output>
where
    Fut: Future,
{
    ensure_hook();
    let mut future = std::pin::pin!(AssertUnwindSafe(future).catch_unwind());
    futures::future::poll_fn(|cx| {
        let _guard = CaptureGuard::enter();
        future.as_mut().poll(cx)
    })
    .await
    .map_err(captured)
}

impl Attempt {
    /// Run `action`, turning a panic into `Err`
    pub fn run<F>(action: F) -> VoidResult
    where
        F: FnOnce(),
    {
        Self::value(action).map(|()| Void)
    }

    /// Run `f` and wrap its value, turning a panic into `Err`
    pub fn value<T, F>(f: F) -> Result<T>
    where
        F: FnOnce() -> T,
    {
        ensure_hook();
        let _guard = CaptureGuard::enter();
        catch_unwind(AssertUnwindSafe(f)).map_err(captured)
    }

    /// Like [`Attempt::value`], projecting the captured error with `project`
    pub fn value_with<T, E, F, P>(f: F, project: P) -> Result<T, E>
    where
        F: FnOnce() -> T,
        P: FnOnce(Error) -> E,
    {
        Self::value(f).map_err(project)
    }

    /// Run a fallible closure, converting both panics and returned errors
    pub fn fallible<T, X, F>(f: F) -> Result<T>
    where
        F: FnOnce() -> std::result::Result<T, X>,
        X: Into<BoxError>,
    {
        Self::value(f)?.map_err(|error| Error::from_boxed(error.into()))
    }

    /// Await `future`, turning a panic into `Err`
    pub async fn run_async<Fut>(future: Fut) -> VoidResult
    where
        Fut: Future<Output = ()>,
    {
        capture(future).await.map(|()| Void)
    }

    /// Await `future` and wrap its output, turning a panic into `Err`
    pub async fn value_async<Fut>(future: Fut) -> Result<Fut::Output>
    where
        Fut: Future,
    {
        capture(future).await
    }

    /// Like [`Attempt::value_async`], projecting the captured error
    pub async fn value_async_with<Fut, E, P>(future: Fut, project: P) -> Result<Fut::Output, E>
    where
        Fut: Future,
        P: FnOnce(Error) -> E,
    {
        capture(future).await.map_err(project)
    }

    /// Await a fallible future, converting both panics and returned errors
    pub async fn fallible_async<Fut, T, X>(future: Fut) -> Result<T>
    where
        Fut: Future<Output = std::result::Result<T, X>>,
        X: Into<BoxError>,
    {
        capture(future)
            .await?
            .map_err(|error| Error::from_boxed(error.into()))
    }

    /// Start `f` with a clone of `token` unless it is already cancelled.
    ///
    /// A token cancelled before the start yields a cancelled `Err` without
    /// calling `f`. Work that observes the token itself and raises through
    /// [`CancellationToken::raise_if_cancelled`] also ends as a cancelled
    /// `Err`.
    pub async fn cancellable<T, F, Fut>(token: &CancellationToken, f: F) -> Result<T>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = T>,
    {
        if token.is_cancelled() {
            tracing::debug!("cancelled before start");
            return Err(Error::cancelled());
        }

        let token = token.clone();
        let future = Self::value(move || f(token))?;
        capture(future).await
    }

    /// Like [`Attempt::cancellable`], projecting the error with `project`
    pub async fn cancellable_with<T, E, F, Fut, P>(
        token: &CancellationToken,
        f: F,
        project: P,
    ) -> Result<T, E>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = T>,
        P: FnOnce(Error) -> E,
    {
        Self::cancellable(token, f).await.map_err(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{Failure, FailureKind};
    use crate::fail_fast::raise;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_run_captures_panics() {
        assert_eq!(Attempt::run(|| {}), Ok(Void));

        let result = Attempt::run(|| panic!("worker exploded"));
        let error = result.unwrap_err();
        assert_eq!(error.text(), "worker exploded");
        assert_eq!(error.kind(), FailureKind::Panic);
    }

    #[test]
    fn test_raised_failure_round_trips() {
        let original = Failure::invalid_operation("cache is sealed");
        let error = Attempt::value(|| -> i32 { raise(original.clone()) }).unwrap_err();

        assert_eq!(error.kind(), FailureKind::InvalidOperation);
        assert_eq!(error.as_exception().unwrap().to_exception(), original);
    }

    #[test]
    fn test_value_with_projects_error() {
        let result = Attempt::value_with(|| -> u8 { panic!("nope") }, |e| e.to_string());
        assert_eq!(result, Err("nope".to_string()));
        assert_eq!(Attempt::value_with(|| 3, |e| e.to_string()), Ok(3));
    }

    #[test]
    fn test_fallible_converts_returned_errors() {
        let result: Result<()> = Attempt::fallible(|| Err(io::Error::other("disk full")));
        let error = result.unwrap_err();
        assert_eq!(error.text(), "disk full");
        assert_eq!(error.as_exception().unwrap().to_exception().message(), "disk full");

        let result = Attempt::fallible(|| Ok::<_, io::Error>(1));
        assert_eq!(result, Ok(1));
    }

    #[tokio::test]
    async fn test_async_bridges() {
        assert_eq!(Attempt::value_async(async { 5 }).await, Ok(5));
        assert_eq!(Attempt::run_async(async {}).await, Ok(Void));

        let error = Attempt::value_async(async {
            tokio::task::yield_now().await;
            panic!("late failure");
        })
        .await
        .map(|()| ())
        .unwrap_err();
        assert_eq!(error.text(), "late failure");

        let projected = Attempt::value_async_with(async { panic!("x") }, |e: Error| e.kind())
            .await
            .map(|()| ());
        assert_eq!(projected, Err(FailureKind::Panic));

        let result =
            Attempt::fallible_async(async { Err::<(), _>(anyhow::anyhow!("remote said no")) })
                .await;
        assert_eq!(result.unwrap_err().text(), "remote said no");
    }

    #[tokio::test]
    async fn test_cancelled_before_start_never_runs() {
        let token = CancellationToken::new();
        token.cancel();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let result = Attempt::cancellable(&token, move |_| async move {
            counter.fetch_add(1, Ordering::SeqCst);
            1
        })
        .await;

        assert!(result.unwrap_err().is_cancelled());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancellation_observed_by_work_becomes_err() {
        let token = CancellationToken::new();
        let trigger = token.clone();

        let result = Attempt::cancellable(&token, move |inner| async move {
            trigger.cancel();
            inner.raise_if_cancelled();
            "finished"
        })
        .await;
        assert!(result.unwrap_err().is_cancelled());

        let fresh = CancellationToken::new();
        let result = Attempt::cancellable_with(&fresh, |_| async { 2 }, |e| e.kind()).await;
        assert_eq!(result, Ok(2));
    }
}
