use std::sync::Arc;

use anyhow::{Context, Result};

use coursemart_api_rust::api::routes::create_router;
use coursemart_api_rust::handlers::AppState;
use coursemart_api_rust::seed;
use coursemart_api_rust::storage::HmacUrlSigner;
use coursemart_api_rust::store::MemoryStore;

pub struct TestServer {
    pub base_url: String,
}

/// Serve the app against an in-memory store on a free local port. Each test
/// gets its own server, so state never leaks between tests.
pub async fn spawn_app(store: MemoryStore) -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let signer = HmacUrlSigner::new("https://media.test", "test-secret", 3600)?;
    let app = create_router(AppState { store: Arc::new(store), signer: Arc::new(signer) });

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });

    Ok(TestServer { base_url: format!("http://127.0.0.1:{}", port) })
}

/// The demo catalog: three published courses, two sellers, two buyers, one
/// enrolled buyer (lena@coursemart.test). All accounts use `password123`.
pub async fn spawn_demo_app() -> Result<TestServer> {
    spawn_app(seed::demo_store()).await
}

/// Log in and return the bearer token.
pub async fn login(server: &TestServer, email: &str, password: &str) -> Result<String> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await?;
    anyhow::ensure!(res.status().is_success(), "login failed: {}", res.status());
    let payload = res.json::<serde_json::Value>().await?;
    payload["data"]["token"]
        .as_str()
        .map(str::to_string)
        .context("login response carried no token")
}
