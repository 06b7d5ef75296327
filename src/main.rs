//! Plate & Grape server binary.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use plate_and_grape::adapters::ai::{AnthropicConfig, AnthropicProvider};
use plate_and_grape::adapters::http::{
    pairings_routes, preferences_routes, PairingsState, PreferencesState,
};
use plate_and_grape::adapters::preferences::PostgresPreferenceStore;
use plate_and_grape::adapters::storage::{SupabaseStorage, SupabaseStorageConfig};
use plate_and_grape::application::PairingService;
use plate_and_grape::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    info!(environment = ?config.server.environment, "starting plate-and-grape");

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;

    let api_key = config
        .ai
        .anthropic_api_key
        .clone()
        .expect("validated configuration carries an API key");
    let provider = AnthropicProvider::new(
        AnthropicConfig::new(api_key)
            .with_model(config.ai.model.clone())
            .with_timeout(config.ai.timeout()),
    )?;

    let storage_base = config
        .storage
        .base_url
        .clone()
        .expect("validated configuration carries a storage URL");
    let storage_key = config
        .storage
        .api_key
        .clone()
        .expect("validated configuration carries a storage key");
    let storage = SupabaseStorage::new(
        SupabaseStorageConfig::new(storage_base, storage_key, config.storage.bucket.clone())
            .with_timeout(config.storage.timeout()),
    )?;

    let service = Arc::new(PairingService::new(Arc::new(provider), Arc::new(storage)));
    let store = Arc::new(PostgresPreferenceStore::new(pool));

    let app = axum::Router::new()
        .nest("/api/pairings", pairings_routes(PairingsState::new(service)))
        .nest(
            "/api/preferences",
            preferences_routes(PreferencesState::new(store)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.server.socket_addr()?;
    info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
