use axum::Json;
use serde_json::{json, Value};

/// GET /
pub async fn welcome_handler() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Feedback Sentiment Analysis API" }))
}

/// GET /test
pub async fn test_handler() -> Json<Value> {
    Json(json!({ "status": "Server is running properly" }))
}
