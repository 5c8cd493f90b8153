use anyhow::Result;

use api_server::ServerConfig;
use core_runtime::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let config = ServerConfig::from_env()?;
    init_logging(config.logging_config())?;

    api_server::serve(config).await?;
    Ok(())
}
