use std::sync::Arc;

use coursemart_api_rust::api::routes::create_router;
use coursemart_api_rust::config;
use coursemart_api_rust::handlers::AppState;
use coursemart_api_rust::seed;
use coursemart_api_rust::storage::HmacUrlSigner;
use coursemart_api_rust::store::{CatalogStore, PgStore};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Coursemart API in {:?} mode", config.environment);

    let store: Arc<dyn CatalogStore> = match std::env::var("DATABASE_URL") {
        Ok(url) => match PgStore::connect(&url).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::error!("failed to connect to database: {}", e);
                std::process::exit(1);
            }
        },
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; serving the in-memory demo catalog");
            Arc::new(seed::demo_store())
        }
    };

    let signer = HmacUrlSigner::new(
        &config.storage.media_base_url,
        &config.storage.signing_secret,
        config.storage.download_ttl_secs,
    )
    .unwrap_or_else(|e| panic!("invalid MEDIA_BASE_URL {}: {}", config.storage.media_base_url, e));

    let app = create_router(AppState { store, signer: Arc::new(signer) });

    // Allow tests or deployments to override port via env
    let port = std::env::var("COURSEMART_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Coursemart API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
