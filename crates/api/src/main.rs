use anyhow::Context;

use beerstock_api::app::{self, services};
use beerstock_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    beerstock_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;
    let services = services::build_services(&config).await?;
    tracing::info!(backend = ?services.backend(), "stock service ready");

    let app = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
