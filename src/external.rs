//! Guarded execution of external calls.
//!
//! Every call that leaves the process (model invocations, workspace provider
//! operations) runs through a [`CallGuard`], which races the call against a
//! per-call timeout and the turn's cancellation token.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors raised by the guard itself rather than by the guarded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CallError {
    /// The turn was cancelled while the call was in flight.
    #[error("external call cancelled")]
    Cancelled,

    /// The call did not complete within the configured timeout.
    #[error("external call timed out after {0:?}")]
    TimedOut(Duration),
}

impl CallError {
    /// Returns `true` when the error represents cancellation.
    #[must_use]
    pub const fn is_cancelled(self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Cancellation and timeout policy applied to external calls in one turn.
#[derive(Debug, Clone)]
pub struct CallGuard {
    cancel: CancellationToken,
    timeout: Duration,
}

impl CallGuard {
    /// Creates a guard bound to the given cancellation token.
    #[must_use]
    pub const fn new(cancel: CancellationToken, timeout: Duration) -> Self {
        Self { cancel, timeout }
    }

    /// Returns the per-call timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns `true` once the owning turn has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Runs `call` unless the turn is cancelled or the timeout elapses first.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::Cancelled`] when the token fires before the call
    /// completes and [`CallError::TimedOut`] when the timeout elapses.
    pub async fn run<F>(&self, call: F) -> Result<F::Output, CallError>
    where
        F: Future,
    {
        if self.cancel.is_cancelled() {
            return Err(CallError::Cancelled);
        }
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(CallError::Cancelled),
            outcome = tokio::time::timeout(self.timeout, call) => {
                outcome.map_err(|_| CallError::TimedOut(self.timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn run_returns_call_output() {
        let guard = CallGuard::new(CancellationToken::new(), Duration::from_secs(1));

        let value = guard.run(async { 7 }).await;

        assert_eq!(value, Ok(7));
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn run_rejects_already_cancelled_turn() {
        let token = CancellationToken::new();
        token.cancel();
        let guard = CallGuard::new(token, Duration::from_secs(1));

        let value = guard.run(async { 7 }).await;

        assert_eq!(value, Err(CallError::Cancelled));
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn run_times_out_slow_calls() {
        let guard = CallGuard::new(CancellationToken::new(), Duration::from_millis(10));

        let value = guard
            .run(tokio::time::sleep(Duration::from_secs(5)))
            .await;

        assert_eq!(value, Err(CallError::TimedOut(Duration::from_millis(10))));
    }
}
