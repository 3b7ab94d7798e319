use super::ApiError;
use crate::ai::Part;
use crate::models::ImageResponse;
use crate::state::AppState;
use crate::upload::{format_megabytes, validate_image_upload, UploadForm};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};

/// `POST /generate-text-from-image`
///
/// Multipart form with a required `prompt` and a required `image` file.
#[tracing::instrument(skip(state, multipart))]
pub async fn generate_text_from_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ImageResponse>, ApiError> {
    let form = UploadForm::from_extractor(multipart, "image", None).await?;
    let (prompt, file) = validate_image_upload(form.prompt, form.file)?;

    tracing::info!(
        "Processing image: {} ({}, {})",
        file.filename,
        file.content_type,
        format_megabytes(file.size())
    );

    let parts = vec![
        Part::text(prompt.clone()),
        Part::inline_data(file.content_type.clone(), &file.bytes),
    ];
    let response = state
        .generator
        .generate_content(parts)
        .await
        .map_err(ApiError::Provider)?;

    Ok(Json(ImageResponse {
        result: state.extractor.extract_text(&response),
        prompt,
        filename: file.filename,
    }))
}
