//! Alert history handler.

use axum::Json;

/// Alert history endpoint.
///
/// Alerts are delivered inline on `/detect` responses; this endpoint exists
/// for front-end parity and always returns an empty list.
pub async fn list_alerts() -> Json<Vec<serde_json::Value>> {
    Json(Vec::new())
}
