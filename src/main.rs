use std::sync::Arc;

mod app;
mod auth;
mod collections;
mod config;
mod db;
mod error;
mod state;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Arc::new(AppConfig::from_env()?);

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "winterward=debug,axum=info,tower_http=info".to_string());

    if config.json_logs() {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    tracing::info!(env = ?config.env, "configuration loaded");

    let db = db::connect(&config).await?;
    db::migrate(&db).await?;

    let app = app::build_app(AppState::from_pool(db.clone(), config.clone()));
    let served = app::serve(app, &config).await;

    db.close().await;
    tracing::info!("database pool closed");
    served
}
