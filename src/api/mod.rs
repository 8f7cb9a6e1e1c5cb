use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    response::Json,
    routing::{get, post},
};
use tower_http::limit::RequestBodyLimitLayer;

use crate::skill::{Intent, RequestContext, SkillHandler, SkillResponse};

/// Intents are tiny; anything bigger is not from the voice platform
const MAX_BODY_BYTES: usize = 16 * 1024;

pub fn router(handler: Arc<SkillHandler>) -> Router {
    Router::new()
        .route("/skill", post(handle_skill))
        .route("/health", get(health))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(handler)
}

async fn handle_skill(
    State(handler): State<Arc<SkillHandler>>,
    Json(intent): Json<Intent>,
) -> Json<SkillResponse> {
    let ctx = RequestContext::now();
    Json(handler.handle(&intent, &ctx).await)
}

async fn health() -> &'static str {
    "ok"
}
