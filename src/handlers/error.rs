use crate::upload::UploadError;
use crate::Error;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

/// Failure at the HTTP boundary, rendered in the body shape of the endpoint that raised it.
#[derive(Debug)]
pub enum ApiError {
    /// Upload rejected before the provider was contacted.
    Upload(UploadError),
    /// Unparseable JSON on the text endpoint, reported under `error`.
    BadJson(String),
    /// Provider failure on the text endpoint, reported under `error`.
    Generation(Error),
    /// Provider failure on a media endpoint, reported under `message`.
    Provider(Error),
    /// Provider refused the audio payload itself.
    AudioRejected(Error),
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        ApiError::Upload(err)
    }
}

impl ApiError {
    /// Classify a provider failure on the audio endpoint.
    pub fn from_audio_failure(err: Error) -> Self {
        if err.to_string().contains("Audio") {
            ApiError::AudioRejected(err)
        } else {
            ApiError::Provider(err)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Upload(err) => {
                warn!("Rejected upload: {}", err);
                (StatusCode::BAD_REQUEST, err.to_json())
            }
            ApiError::BadJson(message) => {
                warn!("Rejected request body: {}", message);
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            ApiError::Generation(err) => {
                error!("Text generation failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": err.to_string() }),
                )
            }
            ApiError::Provider(err) => {
                error!("Provider call failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": err.to_string() }),
                )
            }
            ApiError::AudioRejected(err) => {
                error!("Provider rejected audio: {}", err);
                (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "message": "Error processing audio file. Check that the audio format and quality are supported.",
                        "error": err.to_string(),
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
