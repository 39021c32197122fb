use std::sync::Arc;

use anyhow::Context;

use coupons_api::{
    app::{AppServices, build_app},
    config::ApiConfig,
};
use coupons_auth::{KeyProvider, TokenCodec};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    coupons_observability::init();

    let config = ApiConfig::from_env()?;

    let keys = Arc::new(KeyProvider::new(config.keys.clone()));
    keys.preload().context("loading JWT key material")?;
    let codec = Arc::new(TokenCodec::new(keys, config.token.clone()));

    let services = AppServices::in_memory(codec, config.seed_demo_data).context("seeding demo data")?;
    let app = build_app(Arc::new(services), &config.allowed_origins);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, issuer = %config.token.issuer, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
