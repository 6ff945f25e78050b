// src/handlers/health.rs

use axum::Json;
use serde_json::{Value, json};

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is up"))
)]
pub async fn root() -> Json<Value> {
    Json(json!({ "Hello": "World" }))
}
