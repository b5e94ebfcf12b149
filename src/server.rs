use axum::{Json, Router, routing::get};
use serde::Serialize;

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
}

pub async fn health_handler() -> Json<Health> {
    Json(Health { status: "running" })
}

/// Build the main router. webhook_router can be passed (via webhooks::axum_to_router)
/// or None to only serve /health (polling mode and tests).
pub fn build_router(webhook_router: Option<Router>) -> Router {
    let base = Router::new().route("/health", get(health_handler));
    match webhook_router {
        Some(r) => base.merge(r),
        None => base,
    }
}
