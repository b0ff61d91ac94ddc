use std::time::Duration;

/// Unified database error type for all database operations
///
/// Every stage of the connection lifecycle returns this instead of aborting,
/// so the caller decides whether a failure ends the process.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Client could not be created (bad URI, DNS/SRV lookup, invalid options)
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Reachability probe returned an error
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// The deadline context expired before the operation finished
    #[error("Deadline of {timeout:?} exceeded during {operation}")]
    DeadlineExceeded {
        operation: &'static str,
        timeout: Duration,
    },

    /// The deadline context was canceled before the operation finished
    #[error("{operation} canceled before completion")]
    Canceled { operation: &'static str },

    /// Disconnect did not complete cleanly
    #[error("Disconnect failed: {0}")]
    DisconnectFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Failed to write a status line
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(feature = "config")]
impl From<core_config::ConfigError> for DatabaseError {
    fn from(err: core_config::ConfigError) -> Self {
        DatabaseError::ConfigError(err.to_string())
    }
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
