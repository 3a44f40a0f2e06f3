use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

use night_haunts_backend::config::Config;
use night_haunts_backend::pipeline::VenueLookup;
use night_haunts_backend::{backends, controller, location};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::parse();

    let client = reqwest::Client::builder()
        .build()
        .context("Error building the shared HTTP client")?;

    let location = location::from_config(&config, client.clone())?;
    let backend = backends::from_config(&config, client)?;
    let lookup = Arc::new(VenueLookup::new(
        location,
        backend,
        Duration::from_millis(config.location_timeout_ms),
    ));

    controller::serve(lookup, &config).await
}
