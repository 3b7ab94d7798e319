use crate::models::StatusResponse;
use axum::Json;

pub const ENDPOINTS: &[&str] = &[
    "POST /generate-text",
    "POST /generate-text-from-image",
    "POST /generate-from-audio",
];

/// The handler for the root (`/`) endpoint.
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "Server is running!".to_string(),
        endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
    })
}
