//! MongoDB database connector and utilities
//!
//! Provides the connection lifecycle: connect under a deadline, ping the
//! primary, release the connection.

mod closer;
mod config;
mod connection;
mod connector;
mod health;
pub mod lifecycle;

pub use closer::Closer;
pub use config::{
    DEFAULT_DEADLINE_SECS, DEFAULT_DISCONNECT_TIMEOUT_SECS, MongoConfig, redact_uri,
};
pub use connection::{Connection, MongoConnection};
pub use connector::{Connector, MongoConnector, connect, connect_with};
pub use health::{HealthStatus, check_health, check_health_detailed, ping};

// Re-export MongoDB types for convenience
pub use mongodb::Database;
