use async_trait::async_trait;
use mongodb::{Client, options::ClientOptions};
use std::time::Duration;
use tracing::{info, instrument};

use super::MongoConfig;
use super::connection::{Connection, MongoConnection};
use crate::common::{CancelFn, DatabaseError, DatabaseResult, DeadlineContext};

/// Opens a client session for a [`MongoConfig`].
///
/// `remaining` is what is left of the deadline when the connector is invoked;
/// implementations should not configure their own waits beyond it.
#[async_trait]
pub trait Connector: Send + Sync {
    type Connection: Connection + 'static;

    async fn open(
        &self,
        config: &MongoConfig,
        remaining: Duration,
    ) -> DatabaseResult<Self::Connection>;
}

/// Connector for real MongoDB deployments
#[derive(Clone, Copy, Debug, Default)]
pub struct MongoConnector;

#[async_trait]
impl Connector for MongoConnector {
    type Connection = MongoConnection;

    async fn open(
        &self,
        config: &MongoConfig,
        remaining: Duration,
    ) -> DatabaseResult<MongoConnection> {
        let mut options = ClientOptions::parse(config.uri())
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        options.connect_timeout = Some(capped(options.connect_timeout, remaining));
        options.server_selection_timeout =
            Some(capped(options.server_selection_timeout, remaining));

        if let Some(ref app_name) = config.app_name {
            options.app_name = Some(app_name.clone());
        }

        let client = Client::with_options(options)
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        Ok(MongoConnection::new(client))
    }
}

fn capped(configured: Option<Duration>, remaining: Duration) -> Duration {
    configured.map_or(remaining, |timeout| timeout.min(remaining))
}

/// Connect to MongoDB and return the handle together with its deadline.
///
/// The deadline starts before the connect call and bounds it, so a hung
/// SRV lookup fails with [`DatabaseError::DeadlineExceeded`] instead of
/// blocking. Use the returned context for every follow-up operation and hand
/// the [`CancelFn`] to a [`Closer`](super::Closer).
///
/// # Example
/// ```ignore
/// use database::mongodb::{MongoConfig, connect};
///
/// let config = MongoConfig::new("mongodb://localhost:27017");
/// let (connection, ctx, cancel) = connect(&config).await?;
/// ```
pub async fn connect(
    config: &MongoConfig,
) -> DatabaseResult<(MongoConnection, DeadlineContext, CancelFn)> {
    connect_with(&MongoConnector, config).await
}

/// [`connect`] with a caller-supplied [`Connector`]
#[instrument(skip_all, fields(uri = %config.redacted_uri(), deadline_secs = config.deadline_secs))]
pub async fn connect_with<K: Connector>(
    connector: &K,
    config: &MongoConfig,
) -> DatabaseResult<(K::Connection, DeadlineContext, CancelFn)> {
    let (ctx, cancel) = DeadlineContext::with_timeout(config.deadline());

    info!("Attempting to connect to MongoDB");

    // On error `cancel` drops here, which releases the deadline
    let connection = ctx
        .run("connect", connector.open(config, ctx.remaining()))
        .await??;

    info!("MongoDB client created");
    Ok((connection, ctx, cancel))
}
