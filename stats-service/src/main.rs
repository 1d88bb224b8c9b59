use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use stats_service::{
    api::{self, AppState},
    config::AppConfig,
    metrics_server, observability,
    sources::PgRecordSource,
};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let cfg = AppConfig::load()?;

    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    let pool = PgPoolOptions::new()
        .max_connections(cfg.database.max_connections)
        .connect(&cfg.database.uri)
        .await?;

    let state = AppState::new(Arc::new(PgRecordSource::new(pool)), cfg.query.default_limit);
    let app = api::router(state);

    let addr: SocketAddr = cfg
        .http
        .bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid http.bind_addr: {e}"))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "stats service listening");

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
