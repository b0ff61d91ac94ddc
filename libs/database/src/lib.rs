//! Database library: MongoDB connection lifecycle with deadline-bound
//! connect/ping and guaranteed cleanup.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB support
//! - `config` - Configuration support with `core_config::FromEnv`
//! - `all` - All features
//!
//! # Examples
//!
//! ## One-shot connectivity check
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, MongoConnector, lifecycle};
//!
//! let config = MongoConfig::new("mongodb://localhost:27017");
//! let status = lifecycle::run(&MongoConnector, &config, &mut std::io::stdout()).await?;
//! ```
//!
//! ## Step by step
//!
//! ```ignore
//! use database::mongodb::{Closer, MongoConfig, connect, ping};
//!
//! let config = MongoConfig::new("mongodb://localhost:27017");
//! let (connection, ctx, cancel) = connect(&config).await?;
//! let closer = Closer::new(connection, cancel, config.disconnect_timeout());
//! ping(closer.connection(), &ctx).await?;
//! closer.close().await?;
//! ```

// Always available modules
pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

// Re-exports for convenience
pub use common::{DatabaseError, DatabaseResult};
