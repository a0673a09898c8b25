use anyhow::Result;

use skycast_core::Config;
use skycast_mcp::{Handlers, Server};
use skycast_weather::WeatherClient;

#[tokio::main]
async fn main() -> Result<()> {
    // A .env file is optional; real environment variables win.
    dotenvy::dotenv().ok();

    skycast_core::init();

    // Missing API key or a bad unit system terminates here, before the
    // server reads its first request.
    let config = Config::from_env()?;
    tracing::info!(units = %config.units, "configuration loaded");

    let client = WeatherClient::new(config.api_key, config.units)?;
    let handlers = Handlers::new(client, config.units);

    Server::new(handlers).run().await
}
