use std::time::Instant;
use tracing::{info, instrument, warn};

use super::connection::Connection;
use crate::common::{DatabaseResult, DeadlineContext};

/// Health check status for MongoDB
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Whether the database is healthy
    pub healthy: bool,
    /// Optional message (e.g., error details)
    pub message: Option<String>,
    /// Response time in milliseconds
    pub response_time_ms: u64,
}

/// Ping the primary, bounded by `ctx`.
///
/// Fails with `HealthCheckFailed`, `DeadlineExceeded` or `Canceled`. There is
/// no retry.
///
/// # Example
/// ```ignore
/// use database::mongodb::{MongoConfig, connect, ping};
///
/// let (connection, ctx, cancel) = connect(&MongoConfig::default()).await?;
/// let status = ping(&connection, &ctx).await?;
/// ```
#[instrument(skip_all)]
pub async fn ping<C: Connection>(
    connection: &C,
    ctx: &DeadlineContext,
) -> DatabaseResult<HealthStatus> {
    let start = Instant::now();

    let outcome = ctx
        .run("ping", connection.ping_primary())
        .await
        .and_then(|result| result);
    if let Err(e) = outcome {
        warn!(error = %e, "MongoDB ping failed");
        return Err(e);
    }

    let response_time_ms = elapsed_ms(start);
    info!(response_time_ms, "MongoDB primary responded to ping");

    Ok(HealthStatus {
        healthy: true,
        message: None,
        response_time_ms,
    })
}

/// Check MongoDB health, collapsing the outcome to a bool
pub async fn check_health<C: Connection>(connection: &C, ctx: &DeadlineContext) -> bool {
    ping(connection, ctx).await.is_ok()
}

/// Check MongoDB health with detailed status
///
/// Never fails; errors end up in `message`.
pub async fn check_health_detailed<C: Connection>(
    connection: &C,
    ctx: &DeadlineContext,
) -> HealthStatus {
    let start = Instant::now();

    match ping(connection, ctx).await {
        Ok(status) => status,
        Err(e) => HealthStatus {
            healthy: false,
            message: Some(e.to_string()),
            response_time_ms: elapsed_ms(start),
        },
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::DatabaseError;
    use crate::mongodb::connection::MockConnection;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_ping_success() {
        let mut connection = MockConnection::new();
        connection.expect_ping_primary().times(1).returning(|| Ok(()));
        let (ctx, _cancel) = DeadlineContext::with_timeout(Duration::from_secs(30));

        let status = ping(&connection, &ctx).await.unwrap();

        assert!(status.healthy);
        assert!(status.message.is_none());
    }

    #[tokio::test]
    async fn test_response_time_reflects_elapsed() {
        let mut connection = MockConnection::new();
        connection.expect_ping_primary().returning(|| Ok(()));
        let (ctx, _cancel) = DeadlineContext::with_timeout(Duration::from_secs(30));
        let start = Instant::now() - Duration::from_millis(250);

        assert!(elapsed_ms(start) >= 250);
        assert!(ping(&connection, &ctx).await.unwrap().response_time_ms < 250);
    }

    #[tokio::test]
    async fn test_ping_failure_is_returned_not_retried() {
        let mut connection = MockConnection::new();
        connection
            .expect_ping_primary()
            .times(1)
            .returning(|| Err(DatabaseError::HealthCheckFailed("not primary".into())));
        let (ctx, _cancel) = DeadlineContext::with_timeout(Duration::from_secs(30));

        let err = ping(&connection, &ctx).await.unwrap_err();

        assert!(matches!(err, DatabaseError::HealthCheckFailed(ref msg) if msg == "not primary"));
    }

    #[tokio::test]
    async fn test_ping_after_cancel_never_reaches_server() {
        struct FlagConnection(AtomicBool);

        #[async_trait::async_trait]
        impl Connection for FlagConnection {
            async fn ping_primary(&self) -> DatabaseResult<()> {
                self.0.store(true, Ordering::SeqCst);
                Ok(())
            }

            async fn disconnect(&self) -> DatabaseResult<()> {
                Ok(())
            }
        }

        let connection = FlagConnection(AtomicBool::new(false));
        let (ctx, mut cancel) = DeadlineContext::with_timeout(Duration::from_secs(30));
        cancel.cancel();

        let err = ping(&connection, &ctx).await.unwrap_err();

        assert!(matches!(err, DatabaseError::Canceled { operation: "ping" }));
        assert!(!connection.0.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_check_health() {
        let mut healthy = MockConnection::new();
        healthy.expect_ping_primary().returning(|| Ok(()));
        let mut unhealthy = MockConnection::new();
        unhealthy
            .expect_ping_primary()
            .returning(|| Err(DatabaseError::HealthCheckFailed("refused".into())));
        let (ctx, _cancel) = DeadlineContext::with_timeout(Duration::from_secs(30));

        assert!(check_health(&healthy, &ctx).await);
        assert!(!check_health(&unhealthy, &ctx).await);
    }

    #[tokio::test]
    async fn test_check_health_detailed_reports_error() {
        let mut connection = MockConnection::new();
        connection
            .expect_ping_primary()
            .returning(|| Err(DatabaseError::HealthCheckFailed("connection refused".into())));
        let (ctx, _cancel) = DeadlineContext::with_timeout(Duration::from_secs(30));

        let status = check_health_detailed(&connection, &ctx).await;

        assert!(!status.healthy);
        assert!(status.message.unwrap().contains("connection refused"));
    }
}
