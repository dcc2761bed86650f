use std::sync::Arc;

use anyhow::Result;

mod clients;
mod infrastructure;
mod presentation;
mod proto;
mod query;
mod server;
mod token;

use clients::ServiceClients;
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Arc::new(Settings::from_env()?);

    init_logging(&settings.log_level)?;

    let clients = ServiceClients::connect(&settings)?;
    server::run_http(settings, clients).await
}
