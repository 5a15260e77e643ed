use std::env;

use anyhow::Result;
use tourism_api::{build_app, ApiConfig};
use tourism_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("tourism_api");

    let bind = env::var("TOURISM_BIND").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let config = ApiConfig::from_env()?;
    let geocoding_url = config.tools.geocoding_url.to_string();

    let app = build_app(config)?;

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(bind = %bind, geocoding_url = %geocoding_url, "tourism api started");

    axum::serve(listener, app).await?;
    Ok(())
}
