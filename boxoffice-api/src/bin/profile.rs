use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use boxoffice_api::{profile_app, AuthConfig, ProfileState};
use boxoffice_profile::{HttpValidatorClient, MemoryProfileStore, PurchaseOrchestrator};
use boxoffice_store::app_config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "profile_service=debug,boxoffice_api=debug,boxoffice_profile=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!(
        validator = %config.validator.url,
        timeout_ms = config.validator.timeout_ms,
        "Starting profile service on port {}",
        config.server.profile_port
    );

    let validator = HttpValidatorClient::new(config.validator.url.clone(), config.validator.timeout())
        .context("Failed to build validator client")?;
    let orchestrator = PurchaseOrchestrator::new(Arc::new(validator), Arc::new(MemoryProfileStore::new()));

    let state = ProfileState {
        orchestrator: Arc::new(orchestrator),
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
        },
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.profile_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, profile_app(state)).await?;

    Ok(())
}
