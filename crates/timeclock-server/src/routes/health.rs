use axum::Json;

/// GET /healthz: liveness check for the kiosk host.
pub async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
