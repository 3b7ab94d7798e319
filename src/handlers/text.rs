use super::ApiError;
use crate::ai::Part;
use crate::models::TextResponse;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;

/// `POST /generate-text`
///
/// The prompt is forwarded as-is with no presence check; an absent prompt
/// becomes an empty text part and the provider decides what to do with it.
/// A body without a JSON content type is read as an empty request. Only a
/// body that is not JSON at all is rejected.
pub async fn generate_text(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TextResponse>, ApiError> {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(JsonRejection::MissingJsonContentType(_)) => Value::Null,
        Err(rejection) => return Err(ApiError::BadJson(rejection.body_text())),
    };

    let prompt = prompt_text(&body);
    tracing::info!("Generating text for a {}-character prompt", prompt.chars().count());

    let response = state
        .generator
        .generate_content(vec![Part::text(prompt)])
        .await
        .map_err(ApiError::Generation)?;

    Ok(Json(TextResponse {
        output: state.extractor.extract_text(&response),
    }))
}

/// The `prompt` member as text: strings as-is, other values as their JSON
/// rendering, and empty when absent or `null`.
fn prompt_text(body: &Value) -> String {
    match body.get("prompt") {
        Some(Value::String(prompt)) => prompt.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
