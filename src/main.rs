use std::net::SocketAddr;
use std::sync::Arc;

use auth_token_service::config::{Config, StoreBackend};
use auth_token_service::http::{create_router, AppState};
use auth_token_service::jwt::TokenCodec;
use auth_token_service::rotation::TokenRotator;
use auth_token_service::storage::{MemoryStore, RedisStore, TokenStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .json()
        .init();

    info!("Starting auth token service");

    let config = Config::from_env()?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let store: Arc<dyn TokenStore> = match &config.store {
        StoreBackend::Redis { url } => Arc::new(RedisStore::new(url).await?),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };

    let codec = Arc::new(TokenCodec::new(config.signing_secret.as_bytes()));
    let rotator = Arc::new(TokenRotator::new(
        Arc::clone(&codec),
        store,
        config.access_token_ttl,
        config.refresh_token_ttl,
    ));

    let app = create_router(AppState { rotator, codec });

    info!("Auth token service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
