//! The in-flight handle of an action invocation.
//!
//! Every invocation settles exactly once. [`InFlight`] is a cloneable handle
//! to that settlement: any number of tasks may await it, before or after it
//! settles, and all of them observe the same outcome.

use std::fmt;
use std::future::{Future, IntoFuture};
use std::pin::Pin;

use tokio::sync::watch;

use crate::rest::entity::Resolved;
use crate::rest::errors::ResourceError;

type Settlement = Result<Resolved, ResourceError>;

/// A handle to the eventual outcome of an action.
///
/// Awaiting yields the resolved value: the placeholder itself unless a
/// response interceptor replaced it. If the request task is dropped without
/// settling, awaiting yields [`ResourceError::Aborted`].
///
/// # Example
///
/// ```rust,ignore
/// let post = posts.get(params)?;
/// let handle = post.promise().unwrap();
///
/// let first = handle.clone();
/// let second = handle;
/// let (a, b) = tokio::join!(first.wait(), second.wait());
/// assert_eq!(a.is_ok(), b.is_ok());
/// ```
#[derive(Clone)]
pub struct InFlight {
    rx: watch::Receiver<Option<Settlement>>,
}

/// The write side of an [`InFlight`] handle, owned by the request task.
pub(crate) struct Settler {
    tx: watch::Sender<Option<Settlement>>,
}

/// Creates a connected settler and handle.
pub(crate) fn channel() -> (Settler, InFlight) {
    let (tx, rx) = watch::channel(None);
    (Settler { tx }, InFlight { rx })
}

impl Settler {
    pub(crate) fn settle(self, outcome: Settlement) {
        self.tx.send_replace(Some(outcome));
    }
}

impl InFlight {
    /// Waits for the action to settle.
    ///
    /// # Errors
    ///
    /// Returns the [`ResourceError`] the action failed with.
    pub async fn wait(&self) -> Result<Resolved, ResourceError> {
        let mut rx = self.rx.clone();
        let settled = rx.wait_for(Option::is_some).await;
        match settled {
            Ok(value) => value.clone().unwrap_or(Err(ResourceError::Aborted)),
            Err(_) => Err(ResourceError::Aborted),
        }
    }

    /// Returns `true` once the action has settled.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// Returns the outcome without waiting, if there is one.
    #[must_use]
    pub fn try_result(&self) -> Option<Result<Resolved, ResourceError>> {
        self.rx.borrow().clone()
    }
}

impl IntoFuture for InFlight {
    type Output = Result<Resolved, ResourceError>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { self.wait().await })
    }
}

impl fmt::Debug for InFlight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InFlight")
            .field("settled", &self.is_settled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_all_awaiters_see_the_same_value() {
        let (settler, handle) = channel();
        let other = handle.clone();
        assert!(!handle.is_settled());

        settler.settle(Ok(Resolved::Data(json!({"ok": true}))));

        let a = handle.wait().await.unwrap();
        let b = other.await.unwrap();
        assert_eq!(a.as_data(), Some(&json!({"ok": true})));
        assert_eq!(b.as_data(), Some(&json!({"ok": true})));
    }

    #[tokio::test]
    async fn test_waiter_registered_before_settlement() {
        let (settler, handle) = channel();
        let waiter = tokio::spawn({
            let handle = handle.clone();
            async move { handle.wait().await }
        });
        tokio::task::yield_now().await;

        settler.settle(Err(ResourceError::Aborted));

        let result = waiter.await.unwrap();
        assert!(matches!(result, Err(ResourceError::Aborted)));
        assert!(handle.is_settled());
    }

    #[tokio::test]
    async fn test_dropped_settler_aborts() {
        let (settler, handle) = channel();
        drop(settler);
        assert!(matches!(handle.wait().await, Err(ResourceError::Aborted)));
        assert!(handle.try_result().is_none());
    }

    #[tokio::test]
    async fn test_settled_value_survives_settler_drop() {
        let (settler, handle) = channel();
        settler.settle(Ok(Resolved::Data(json!(1))));
        assert!(handle.wait().await.is_ok());
        assert!(handle.try_result().is_some_and(|r| r.is_ok()));
    }
}
