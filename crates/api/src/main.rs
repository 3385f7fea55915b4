use anyhow::Context;

use ledgerdesk_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ledgerdesk_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;
    let app = ledgerdesk_api::app::build_app(&config)?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, seeded = config.seed_sample_data, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
