//! Scoped release of a connection and its deadline.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::connection::Connection;
use crate::common::{CancelFn, DatabaseError, DatabaseResult};

/// Owns a connection handle and its [`CancelFn`] until they are released.
///
/// [`Closer::close`] disconnects and then cancels the deadline. If the closer
/// is dropped without `close` (early return, `?`, panic), `Drop` cancels the
/// deadline immediately and spawns the disconnect onto the current runtime.
/// Each action runs at most once.
pub struct Closer<C: Connection + 'static> {
    connection: Arc<C>,
    cancel: CancelFn,
    disconnect_timeout: Duration,
    closed: bool,
}

impl<C: Connection + 'static> Closer<C> {
    pub fn new(connection: C, cancel: CancelFn, disconnect_timeout: Duration) -> Self {
        Self {
            connection: Arc::new(connection),
            cancel,
            disconnect_timeout,
            closed: false,
        }
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Disconnect, then cancel the deadline.
    ///
    /// The deadline is canceled even when the disconnect fails or times out.
    #[instrument(skip_all, fields(timeout = ?self.disconnect_timeout))]
    pub async fn close(mut self) -> DatabaseResult<()> {
        self.closed = true;

        let result = disconnect_within(self.connection.as_ref(), self.disconnect_timeout).await;
        self.cancel.cancel();

        match &result {
            Ok(()) => info!("MongoDB connection closed successfully"),
            Err(e) => warn!(error = %e, "MongoDB disconnect failed"),
        }
        result
    }
}

impl<C: Connection + 'static> Drop for Closer<C> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.cancel.cancel();

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                debug!("Closer dropped before close(), disconnecting in background");
                let connection = Arc::clone(&self.connection);
                let timeout = self.disconnect_timeout;
                handle.spawn(async move {
                    if let Err(e) = disconnect_within(connection.as_ref(), timeout).await {
                        warn!(error = %e, "Background MongoDB disconnect failed");
                    }
                });
            }
            Err(_) => {
                warn!("Closer dropped outside a runtime; connection is released at process exit");
            }
        }
    }
}

async fn disconnect_within<C: Connection + ?Sized>(
    connection: &C,
    timeout: Duration,
) -> DatabaseResult<()> {
    match tokio::time::timeout(timeout, connection.disconnect()).await {
        Ok(result) => result,
        Err(_) => Err(DatabaseError::DisconnectFailed(format!(
            "timed out after {:?}",
            timeout
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{CancelReason, DeadlineContext};
    use crate::mongodb::connection::MockConnection;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingConnection {
        disconnects: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Connection for CountingConnection {
        async fn ping_primary(&self) -> DatabaseResult<()> {
            Ok(())
        }

        async fn disconnect(&self) -> DatabaseResult<()> {
            self.disconnects.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct StalledDisconnect;

    #[async_trait]
    impl Connection for StalledDisconnect {
        async fn ping_primary(&self) -> DatabaseResult<()> {
            Ok(())
        }

        async fn disconnect(&self) -> DatabaseResult<()> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_close_disconnects_once_and_cancels() {
        let mut connection = MockConnection::new();
        connection.expect_disconnect().times(1).returning(|| Ok(()));
        let (ctx, cancel) = DeadlineContext::with_timeout(Duration::from_secs(30));

        let closer = Closer::new(connection, cancel, Duration::from_secs(5));
        closer.close().await.unwrap();

        assert_eq!(ctx.reason(), Some(CancelReason::Canceled));
    }

    #[tokio::test]
    async fn test_disconnect_failure_still_cancels() {
        let mut connection = MockConnection::new();
        connection
            .expect_disconnect()
            .times(1)
            .returning(|| Err(DatabaseError::DisconnectFailed("socket closed".into())));
        let (ctx, cancel) = DeadlineContext::with_timeout(Duration::from_secs(30));

        let err = Closer::new(connection, cancel, Duration::from_secs(5))
            .close()
            .await
            .unwrap_err();

        assert!(matches!(err, DatabaseError::DisconnectFailed(_)));
        assert!(ctx.is_done());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_disconnect_times_out() {
        let (ctx, cancel) = DeadlineContext::with_timeout(Duration::from_secs(30));

        let err = Closer::new(StalledDisconnect, cancel, Duration::from_secs(2))
            .close()
            .await
            .unwrap_err();

        assert!(err.to_string().contains("timed out"));
        assert_eq!(ctx.reason(), Some(CancelReason::Canceled));
    }

    #[tokio::test]
    async fn test_drop_without_close_still_releases() {
        let connection = CountingConnection::default();
        let disconnects = Arc::clone(&connection.disconnects);
        let (ctx, cancel) = DeadlineContext::with_timeout(Duration::from_secs(30));

        {
            let _closer = Closer::new(connection, cancel, Duration::from_secs(5));
        }

        assert!(ctx.is_done());
        // let the spawned disconnect run
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(disconnects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_close_then_drop_disconnects_once() {
        let connection = CountingConnection::default();
        let disconnects = Arc::clone(&connection.disconnects);
        let (_ctx, cancel) = DeadlineContext::with_timeout(Duration::from_secs(30));

        Closer::new(connection, cancel, Duration::from_secs(5))
            .close()
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(disconnects.load(Ordering::SeqCst), 1);
    }
}
