use axum::Json;
use serde_json::{json, Value};

/// Static descriptor of available endpoints.
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "Schemascan API",
        "endpoints": ["/scan"],
    }))
}
