//! What the binary prints: the redacted URI, then the lifecycle's confirmation.

use database::DatabaseResult;
use database::mongodb::{Connector, HealthStatus, MongoConfig, lifecycle};
use std::io::Write;

/// Print the redacted URI, then connect, ping and close through `connector`.
///
/// Both lines go to `out`; nothing after the URI is written on failure.
pub async fn run<K, W>(
    connector: &K,
    config: &MongoConfig,
    out: &mut W,
) -> DatabaseResult<HealthStatus>
where
    K: Connector,
    W: Write,
{
    writeln!(out, "{}", config.redacted_uri())?;
    lifecycle::run(connector, config, out).await
}
