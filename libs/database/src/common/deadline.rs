//! Deadline context: a cancellation token that fires on its own after a
//! fixed duration, paired with a manual cancel action.
//!
//! ```ignore
//! use database::common::DeadlineContext;
//! use std::time::Duration;
//!
//! let (ctx, mut cancel) = DeadlineContext::with_timeout(Duration::from_secs(30));
//! let value = ctx.run("ping", async { 42 }).await?;
//! cancel.cancel();
//! ```

use std::future::Future;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::error::{DatabaseError, DatabaseResult};

/// Why a deadline context stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The timer fired
    DeadlineExceeded,
    /// [`CancelFn::cancel`] ran (explicitly or on drop) before the timer fired
    Canceled,
}

/// Shared, clonable view of a deadline.
///
/// Clones observe the same token; only the paired [`CancelFn`] can stop it early.
#[derive(Debug, Clone)]
pub struct DeadlineContext {
    token: CancellationToken,
    reason: Arc<OnceLock<CancelReason>>,
    expires_at: Instant,
    timeout: Duration,
}

/// Cancel action for a [`DeadlineContext`].
///
/// Owns the timer task. Dropping it cancels the context, so the timer is
/// released on every exit path.
#[derive(Debug)]
pub struct CancelFn {
    token: CancellationToken,
    reason: Arc<OnceLock<CancelReason>>,
    timer: Option<JoinHandle<()>>,
}

impl DeadlineContext {
    /// Start a deadline that expires `timeout` from now.
    ///
    /// # Panics
    /// Must be called from within a Tokio runtime (the timer is a spawned task).
    pub fn with_timeout(timeout: Duration) -> (Self, CancelFn) {
        let token = CancellationToken::new();
        let reason = Arc::new(OnceLock::new());
        let expires_at = Instant::now() + timeout;

        let timer = tokio::spawn({
            let token = token.clone();
            let reason = Arc::clone(&reason);
            async move {
                tokio::select! {
                    _ = tokio::time::sleep_until(expires_at) => {
                        let _ = reason.set(CancelReason::DeadlineExceeded);
                        debug!(?timeout, "Deadline exceeded");
                        token.cancel();
                    }
                    _ = token.cancelled() => {}
                }
            }
        });

        debug!(?timeout, "Deadline context started");

        let ctx = Self {
            token: token.clone(),
            reason: Arc::clone(&reason),
            expires_at,
            timeout,
        };
        let cancel = CancelFn {
            token,
            reason,
            timer: Some(timer),
        };
        (ctx, cancel)
    }

    /// The total duration this deadline was created with
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Time left before expiry, zero once it has passed
    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    /// Whether the context has expired or been canceled
    pub fn is_done(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Why the context stopped, `None` while it is still live
    pub fn reason(&self) -> Option<CancelReason> {
        if !self.token.is_cancelled() {
            return None;
        }
        self.reason.get().copied()
    }

    /// Resolves once the context expires or is canceled
    pub async fn done(&self) {
        self.token.cancelled().await
    }

    /// Drive `fut` to completion unless the context stops first.
    ///
    /// A context that is already done never polls `fut`.
    pub async fn run<F, T>(&self, operation: &'static str, fut: F) -> DatabaseResult<T>
    where
        F: Future<Output = T>,
    {
        if let Some(err) = self.error_for(operation) {
            return Err(err);
        }

        tokio::select! {
            biased;
            output = fut => Ok(output),
            _ = self.token.cancelled() => Err(self
                .error_for(operation)
                .unwrap_or(DatabaseError::Canceled { operation })),
        }
    }

    fn error_for(&self, operation: &'static str) -> Option<DatabaseError> {
        match self.reason()? {
            CancelReason::DeadlineExceeded => Some(DatabaseError::DeadlineExceeded {
                operation,
                timeout: self.timeout,
            }),
            CancelReason::Canceled => Some(DatabaseError::Canceled { operation }),
        }
    }
}

impl CancelFn {
    /// Cancel the context and release the timer.
    ///
    /// Returns `true` for the call that released it; every later call is a
    /// no-op returning `false`.
    pub fn cancel(&mut self) -> bool {
        let Some(timer) = self.timer.take() else {
            return false;
        };

        let _ = self.reason.set(CancelReason::Canceled);
        self.token.cancel();
        timer.abort();
        debug!("Deadline context canceled");
        true
    }

    /// Whether the cancel action has already run
    pub fn is_canceled(&self) -> bool {
        self.timer.is_none()
    }
}

impl Drop for CancelFn {
    fn drop(&mut self) {
        self.cancel();
    }
}
