use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::{ReadPreference, SelectionCriteria};
use mongodb::{Client, Database};
use tracing::debug;

use crate::common::{DatabaseError, DatabaseResult};

/// Operations the lifecycle needs from an established client session.
///
/// Implemented by [`MongoConnection`]; tests substitute their own.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Connection: Send + Sync {
    /// One `{ ping: 1 }` round-trip against the primary
    async fn ping_primary(&self) -> DatabaseResult<()>;

    /// Close every pooled connection held by this handle
    async fn disconnect(&self) -> DatabaseResult<()>;
}

/// Connection handle backed by a `mongodb::Client`
#[derive(Clone, Debug)]
pub struct MongoConnection {
    client: Client,
}

impl MongoConnection {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn database(&self, name: &str) -> Database {
        self.client.database(name)
    }
}

#[async_trait]
impl Connection for MongoConnection {
    async fn ping_primary(&self) -> DatabaseResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .selection_criteria(SelectionCriteria::ReadPreference(ReadPreference::Primary))
            .await
            .map_err(|e| DatabaseError::HealthCheckFailed(e.to_string()))?;
        Ok(())
    }

    async fn disconnect(&self) -> DatabaseResult<()> {
        // Client is a shared handle; shutting down a clone closes the pools for all of them
        self.client.clone().shutdown().await;
        debug!("MongoDB client shut down");
        Ok(())
    }
}
