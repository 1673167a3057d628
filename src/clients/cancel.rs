//! Request deadlines and cancellation signals.

use std::time::Duration;

use tokio::sync::watch;

/// How long a request may run before it is abandoned.
///
/// A request either carries a fixed [`Duration`] or a [`CancelSignal`] that
/// some other part of the application fires.
#[derive(Clone, Debug)]
pub enum Timeout {
    /// Abandon the request once this much time has elapsed.
    After(Duration),
    /// Abandon the request when the signal fires.
    Signal(CancelSignal),
}

impl From<Duration> for Timeout {
    fn from(duration: Duration) -> Self {
        Self::After(duration)
    }
}

impl From<CancelSignal> for Timeout {
    fn from(signal: CancelSignal) -> Self {
        Self::Signal(signal)
    }
}

/// A one-shot, cloneable cancellation flag.
///
/// All clones observe the same state. Once cancelled, a signal stays cancelled.
///
/// # Example
///
/// ```rust
/// use wp_resource::clients::CancelSignal;
///
/// let signal = CancelSignal::new();
/// let observer = signal.clone();
/// assert!(!observer.is_cancelled());
///
/// signal.cancel();
/// assert!(observer.is_cancelled());
/// ```
#[derive(Clone, Debug)]
pub struct CancelSignal {
    tx: std::sync::Arc<watch::Sender<bool>>,
}

impl CancelSignal {
    /// Creates a signal that has not fired.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            tx: std::sync::Arc::new(tx),
        }
    }

    /// Fires the signal.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Returns `true` once the signal has fired.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Completes when the signal fires.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this only ends on cancellation.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}
