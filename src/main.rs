use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::TimeDelta;

use avalanche_forecast::{
    AvalancheConfig, AvalancheOrgClient, CacheStore, FjallStore, ForecastService, SkillHandler,
    telemetry, web,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AvalancheConfig::load()?;
    telemetry::init(&config.logging)?;

    let source = AvalancheOrgClient::new(&config.source)?;
    let store = FjallStore::open(&config.cache.location)
        .with_context(|| format!("Failed to open cache store at {}", config.cache.location))?;

    let cache = CacheStore::new(Arc::new(source), Arc::new(store))
        .with_ttl(TimeDelta::hours(config.cache.ttl_hours.into()));
    let handler = SkillHandler::new(
        ForecastService::new(cache),
        config.skill.apology_messages.clone(),
    )?;

    tracing::info!(
        "Serving forecasts from {} (snapshot TTL {}h)",
        config.source.url,
        config.cache.ttl_hours
    );
    web::run(config.server.port, Arc::new(handler)).await
}
