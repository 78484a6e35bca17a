use tracing::{info, Level};

mod config;
mod db;
mod domain;
mod normalize;
mod rest;
mod session;
mod views;

use config::Config;
use db::DbConnection;
use domain::{AnimalService, CredentialService};
use rest::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let config = Config::from_env()?;

    info!("Setting up database");
    let db = DbConnection::new(&config.database_url).await?;

    // Set up our application state
    let state = AppState::new(
        AnimalService::new(db.clone()),
        CredentialService::new(db),
        config.session_key(),
    );

    let app = rest::router(state);

    info!("Starting server on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
