//! Shared test utilities
//!
//! - `TestMongo`: MongoDB container with automatic cleanup (feature: "mongo")
//! - `closed_port_uri`: a MongoDB URI that points at a port nobody listens on
//!
//! # Usage
//!
//! Add `features = ["mongo"]` to your dev-dependencies:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { workspace = true, features = ["mongo"] }
//! ```
//!
//! Container-backed tests need a local Docker daemon, so mark them `#[ignore]`
//! and run them with `cargo test -- --ignored`.

use std::net::{Ipv4Addr, TcpListener};

#[cfg(feature = "mongo")]
mod mongo;

#[cfg(feature = "mongo")]
pub use mongo::TestMongo;

/// A MongoDB URI for a loopback port that was free a moment ago.
///
/// The port is reserved by binding and released before returning, so
/// connection attempts are refused rather than hanging.
pub fn closed_port_uri() -> String {
    let port = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .and_then(|listener| listener.local_addr())
        .map(|addr| addr.port())
        .expect("Failed to reserve a loopback port");

    format!("mongodb://127.0.0.1:{}/?directConnection=true", port)
}
