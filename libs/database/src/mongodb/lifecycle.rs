//! The connect → ping → close sequence.

use std::io::Write;
use tracing::{error, instrument};

use super::MongoConfig;
use super::closer::Closer;
use super::connector::{Connector, connect_with};
use super::health::{HealthStatus, ping};
use crate::common::DatabaseResult;

/// Confirmation line written after a successful ping
pub const CONNECTED_MESSAGE: &str = "Connected to MongoDB Successfully!";

/// Connect, verify the primary answers, and release everything.
///
/// The ping only runs after the connector succeeded. Once a connection
/// exists it is disconnected and its deadline canceled exactly once, whether
/// the ping succeeds or not. A ping failure takes precedence over a
/// disconnect failure in the returned error.
///
/// # Example
/// ```ignore
/// use database::mongodb::{MongoConfig, MongoConnector, lifecycle};
///
/// let config = MongoConfig::new("mongodb://localhost:27017");
/// lifecycle::run(&MongoConnector, &config, &mut std::io::stdout()).await?;
/// ```
#[instrument(skip_all, fields(uri = %config.redacted_uri()))]
pub async fn run<K, W>(
    connector: &K,
    config: &MongoConfig,
    out: &mut W,
) -> DatabaseResult<HealthStatus>
where
    K: Connector,
    W: Write,
{
    let (connection, ctx, cancel) = connect_with(connector, config).await?;
    let closer = Closer::new(connection, cancel, config.disconnect_timeout());

    let probe = match ping(closer.connection(), &ctx).await {
        Ok(status) => writeln!(out, "{}", CONNECTED_MESSAGE)
            .map(|_| status)
            .map_err(Into::into),
        Err(e) => Err(e),
    };

    let closed = closer.close().await;

    match (probe, closed) {
        (Ok(status), Ok(())) => Ok(status),
        (Ok(_), Err(close_err)) => Err(close_err),
        (Err(probe_err), Ok(())) => Err(probe_err),
        (Err(probe_err), Err(close_err)) => {
            error!(error = %close_err, "Disconnect also failed after unsuccessful ping");
            Err(probe_err)
        }
    }
}
