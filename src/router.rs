use crate::{handlers, state::AppState};
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Body limit for the image route.
const IMAGE_BODY_LIMIT: usize = 32 * 1024 * 1024;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/generate-text", post(handlers::generate_text))
        .route(
            "/generate-text-from-image",
            post(handlers::generate_text_from_image).layer(DefaultBodyLimit::max(IMAGE_BODY_LIMIT)),
        )
        .route(
            "/generate-from-audio",
            // Streamed and capped at MAX_AUDIO_BYTES by UploadForm::read.
            post(handlers::generate_from_audio).layer(DefaultBodyLimit::disable()),
        )
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
