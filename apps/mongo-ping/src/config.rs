use core_config::{ConfigError, Environment, FromEnv};
use database::mongodb::MongoConfig;
use std::path::PathBuf;

/// Points at an environment file that must exist; unset means "`.env` if present"
pub const ENV_FILE_VAR: &str = "MONGO_DB_ENV_FILE";

/// Application-specific configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub mongodb: MongoConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;

        Ok(Self {
            mongodb,
            environment,
        })
    }
}

/// Explicit environment-file path, if one was configured
pub fn env_file_path() -> Option<PathBuf> {
    std::env::var_os(ENV_FILE_VAR)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
}
