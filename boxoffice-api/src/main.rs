use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use boxoffice_api::{app, AppState, AuthConfig};
use boxoffice_core::{InventoryStore, MemoryInventoryStore};
use boxoffice_store::{app_config::Config, DbClient, PgInventoryStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "boxoffice_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting inventory service on port {}", config.server.port);

    let store: Arc<dyn InventoryStore> = match DbClient::from_config(&config.database)
        .await
        .context("Failed to connect to Postgres")?
    {
        Some(db) => {
            db.migrate().await.context("Failed to run migrations")?;
            Arc::new(PgInventoryStore::new(db.pool.clone()))
        }
        None => {
            tracing::warn!("database.url not set, inventory is kept in memory");
            Arc::new(MemoryInventoryStore::new())
        }
    };

    let app_state = AppState::new(
        store,
        AuthConfig {
            secret: config.auth.jwt_secret.clone(),
        },
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app(app_state)).await?;

    Ok(())
}
