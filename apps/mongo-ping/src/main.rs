use color_eyre::Section;
use core_config::dotenv::load_env_file;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::mongodb::MongoConnector;
use eyre::WrapErr;
use tracing::info;

mod check;
mod config;

use config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    // The file may provide MONGO_DB_URI and APP_ENV, so it goes before config
    let env_file = load_env_file(config::env_file_path().as_deref())?;

    let config = Config::from_env()
        .suggestion("Set MONGO_DB_URI in the environment or in a .env file")?;

    init_tracing(&config.environment);
    info!(?env_file, mongodb = ?config.mongodb, "Configuration loaded");

    check::run(&MongoConnector, &config.mongodb, &mut std::io::stdout())
        .await
        .wrap_err("MongoDB connectivity check failed")
        .suggestion("Check that the server in MONGO_DB_URI is running and reachable")?;

    info!("MongoDB connection released");
    Ok(())
}
