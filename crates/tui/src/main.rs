mod app;
mod auth;
mod client;
mod config;
mod error;
mod ui;

use std::{fs::OpenOptions, sync::Arc, sync::Mutex, time::Duration};

use crate::{
    auth::InMemoryAuth,
    error::{AppError, Result},
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    init_logging(&config)?;
    tracing::info!(base_url = %config.base_url, "starting bank portal");

    let client = client::Client::new(&config.base_url)?;
    let auth = Arc::new(InMemoryAuth::with_demo_users(Duration::from_millis(
        config.auth_delay_ms,
    )));
    let mut app = app::App::new(client, auth, &config.username);
    app.run().await?;
    Ok(())
}

/// The terminal is owned by the UI, so logs go to a file.
fn init_logging(config: &config::AppConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "bank_portal_tui={level},api_types={level}",
            level = config.log_level
        ))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| AppError::Logging(err.to_string()))
}
