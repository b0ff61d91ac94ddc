//! MongoDB test infrastructure
//!
//! Provides a `TestMongo` helper that creates a standalone MongoDB container for testing.

use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::mongo::Mongo;

/// Test MongoDB wrapper that ensures proper cleanup
///
/// The container is automatically stopped and removed when this struct is dropped.
///
/// # Example
///
/// ```no_run
/// use test_utils::TestMongo;
///
/// # async fn example() {
/// let mongo = TestMongo::new().await;
/// let uri = mongo.connection_string();
/// // Hand `uri` to the code under test
/// # }
/// ```
pub struct TestMongo {
    #[allow(dead_code)]
    container: ContainerAsync<Mongo>,
    pub connection_string: String,
}

impl TestMongo {
    /// Create a new test MongoDB instance
    ///
    /// Uses the MongoDB 7.0 image (standalone, no auth).
    pub async fn new() -> Self {
        let container = Mongo::default()
            .with_tag("7.0")
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let host_port = container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");

        let connection_string = format!("mongodb://127.0.0.1:{}/?directConnection=true", host_port);

        tracing::info!(port = host_port, "Test MongoDB ready (mongo 7.0)");

        Self {
            container,
            connection_string,
        }
    }

    /// Get the connection string for manual client creation
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }
}

// Container is automatically cleaned up when TestMongo is dropped
impl Drop for TestMongo {
    fn drop(&mut self) {
        tracing::debug!("Cleaning up test MongoDB container");
    }
}
