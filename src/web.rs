use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api;
use crate::skill::SkillHandler;

pub fn app(handler: Arc<SkillHandler>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new().nest("/api", api::router(handler)).layer(cors)
}

pub async fn run(port: u16, handler: Arc<SkillHandler>) -> Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Skill endpoint listening on http://localhost:{}/api/skill", port);
    axum::serve(listener, app(handler))
        .await
        .context("HTTP server failed")?;
    Ok(())
}
