use super::ApiError;
use crate::ai::Part;
use crate::models::AudioResponse;
use crate::state::{AppState, DEFAULT_AUDIO_PROMPT};
use crate::upload::{format_megabytes, validate_audio_upload, UploadForm, MAX_AUDIO_BYTES};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};

/// `POST /generate-from-audio`
///
/// Multipart form with an optional `prompt` and a required `audio` file.
/// Provider errors that mention `Audio` are reported as client errors.
#[tracing::instrument(skip(state, multipart))]
pub async fn generate_from_audio(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AudioResponse>, ApiError> {
    let form = UploadForm::from_extractor(multipart, "audio", Some(MAX_AUDIO_BYTES)).await?;
    let prompt = form
        .prompt
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_AUDIO_PROMPT.to_string());
    let file = validate_audio_upload(form.file)?;
    let file_size = format_megabytes(file.size());

    tracing::info!(
        "Processing audio: {} ({}, {})",
        file.filename,
        file.content_type,
        file_size
    );

    let parts = vec![
        Part::text(prompt.clone()),
        Part::inline_data(file.content_type.clone(), &file.bytes),
    ];
    let response = state
        .generator
        .generate_content(parts)
        .await
        .map_err(ApiError::from_audio_failure)?;

    Ok(Json(AudioResponse {
        result: state.extractor.extract_text(&response),
        prompt,
        filename: file.filename,
        file_type: file.content_type,
        file_size,
    }))
}
