use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use super::Ctx;

pub fn router() -> Router<Ctx> {
    Router::new()
        .route("/", get(root))
        .route("/api/v1", get(app_info))
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Hello, World!" }))
}

async fn app_info(State(ctx): State<Ctx>) -> Json<Value> {
    Json(json!({
        "app_name": ctx.settings.app_name,
        "app_version": ctx.settings.app_version,
    }))
}
