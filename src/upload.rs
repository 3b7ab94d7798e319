//! Multipart upload parsing and per-endpoint file validation.

use axum::extract::{multipart::MultipartRejection, Multipart};
use serde_json::{json, Value};
use thiserror::Error;

/// Audio uploads above this size are rejected.
pub const MAX_AUDIO_BYTES: usize = 20 * 1024 * 1024;

/// Audio MIME types accepted by the audio endpoint, with the label shown to users.
pub const SUPPORTED_AUDIO_TYPES: &[(&str, &str)] = &[("audio/mpeg", "MP3"), ("audio/mp4", "M4A")];

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A single uploaded file, held in memory for the lifetime of one request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    /// File contents; left empty when the upload ran past the read limit.
    pub bytes: Vec<u8>,
    size: usize,
}

impl UploadedFile {
    /// Size of the upload as sent by the client, even when `bytes` was not kept.
    pub fn size(&self) -> usize {
        self.size
    }
}

/// Text fields and the single file read from a multipart form.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub prompt: Option<String>,
    pub file: Option<UploadedFile>,
}

impl UploadForm {
    /// Read the form from an extracted multipart body.
    ///
    /// A request that is not multipart at all carries no fields, so it yields
    /// an empty form and the endpoint's own presence checks report it.
    pub async fn from_extractor(
        multipart: Result<Multipart, MultipartRejection>,
        file_field: &str,
        max_file_bytes: Option<usize>,
    ) -> Result<Self, UploadError> {
        match multipart {
            Ok(mut multipart) => Self::read(&mut multipart, file_field, max_file_bytes).await,
            Err(rejection) => {
                tracing::debug!("Treating non-multipart body as an empty form: {}", rejection);
                Ok(Self::default())
            }
        }
    }

    /// Drain `multipart`, keeping the `prompt` field and the first file part named `file_field`.
    ///
    /// A part only counts as a file when it carries a filename; anything else
    /// under `file_field` is ignored, as are unknown fields.
    ///
    /// The file is read chunk by chunk. Past `max_file_bytes` its bytes are
    /// dropped but its full size is still counted.
    pub async fn read(
        multipart: &mut Multipart,
        file_field: &str,
        max_file_bytes: Option<usize>,
    ) -> Result<Self, UploadError> {
        let mut form = UploadForm::default();

        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|e| UploadError::InvalidForm(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();

            if name == "prompt" {
                form.prompt = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| UploadError::InvalidForm(e.to_string()))?,
                );
            } else if name == file_field {
                let Some(filename) = field.file_name().map(str::to_string) else {
                    tracing::debug!("Ignoring '{}' part without a filename", name);
                    continue;
                };
                if form.file.is_some() {
                    tracing::warn!("Ignoring extra '{}' upload: {}", name, filename);
                    continue;
                }
                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_CONTENT_TYPE)
                    .to_string();
                let limit = max_file_bytes.unwrap_or(usize::MAX);
                let mut bytes = Vec::new();
                let mut size = 0usize;

                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| UploadError::InvalidForm(e.to_string()))?
                {
                    size = size.saturating_add(chunk.len());
                    if size <= limit {
                        bytes.extend_from_slice(&chunk);
                    } else if !bytes.is_empty() {
                        tracing::debug!("'{}' upload passed {} bytes, counting only", name, limit);
                        bytes = Vec::new();
                    }
                }

                form.file = Some(UploadedFile {
                    filename,
                    content_type,
                    bytes,
                    size,
                });
            }
        }

        Ok(form)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UploadError {
    #[error("prompt missing")]
    PromptMissing,

    #[error("image file required")]
    ImageMissing,

    #[error("file must be an image")]
    NotAnImage,

    #[error("audio file required")]
    AudioMissing,

    #[error("unsupported audio format, use: {}", supported_audio_labels())]
    UnsupportedAudio { received_type: String },

    #[error("audio file too large, maximum is {}", format_megabytes(MAX_AUDIO_BYTES))]
    AudioTooLarge { size: usize },

    #[error("invalid multipart body: {0}")]
    InvalidForm(String),
}

impl UploadError {
    /// JSON body returned to the client for this rejection.
    pub fn to_json(&self) -> Value {
        match self {
            UploadError::UnsupportedAudio { received_type } => json!({
                "message": self.to_string(),
                "receivedType": received_type,
            }),
            UploadError::AudioTooLarge { size } => json!({
                "message": self.to_string(),
                "fileSize": format_megabytes(*size),
            }),
            _ => json!({ "message": self.to_string() }),
        }
    }
}

/// Render a byte count as mebibytes with two decimals, e.g. `21.00MB`.
pub fn format_megabytes(bytes: usize) -> String {
    format!("{:.2}MB", bytes as f64 / 1024.0 / 1024.0)
}

fn supported_audio_labels() -> String {
    SUPPORTED_AUDIO_TYPES
        .iter()
        .map(|(_, label)| *label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Checks for the image endpoint, in order: prompt, file presence, image MIME type.
pub fn validate_image_upload(
    prompt: Option<String>,
    file: Option<UploadedFile>,
) -> Result<(String, UploadedFile), UploadError> {
    let prompt = prompt
        .filter(|p| !p.is_empty())
        .ok_or(UploadError::PromptMissing)?;
    let file = file.ok_or(UploadError::ImageMissing)?;

    if !file.content_type.starts_with("image/") {
        return Err(UploadError::NotAnImage);
    }

    Ok((prompt, file))
}

/// Checks for the audio endpoint, in order: file presence, allow-listed MIME type, size.
pub fn validate_audio_upload(file: Option<UploadedFile>) -> Result<UploadedFile, UploadError> {
    let file = file.ok_or(UploadError::AudioMissing)?;

    if !SUPPORTED_AUDIO_TYPES
        .iter()
        .any(|(mime, _)| *mime == file.content_type)
    {
        return Err(UploadError::UnsupportedAudio {
            received_type: file.content_type,
        });
    }

    if file.size() > MAX_AUDIO_BYTES {
        return Err(UploadError::AudioTooLarge { size: file.size() });
    }

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn file(content_type: &str, size: usize) -> UploadedFile {
        UploadedFile {
            filename: "upload.bin".to_string(),
            content_type: content_type.to_string(),
            bytes: vec![0; size],
            size,
        }
    }

    #[test]
    fn test_format_megabytes() {
        assert_eq!(format_megabytes(21 * 1024 * 1024), "21.00MB");
        assert_eq!(format_megabytes(1536 * 1024), "1.50MB");
        assert_eq!(format_megabytes(0), "0.00MB");
    }

    #[test]
    fn test_image_checks_prompt_first() {
        let err = validate_image_upload(None, None).unwrap_err();
        assert_eq!(err, UploadError::PromptMissing);

        let err =
            validate_image_upload(Some(String::new()), Some(file("image/png", 1))).unwrap_err();
        assert_eq!(err, UploadError::PromptMissing);
    }

    #[test]
    fn test_image_requires_file_and_image_type() {
        let err = validate_image_upload(Some("describe".to_string()), None).unwrap_err();
        assert_eq!(err, UploadError::ImageMissing);

        let err = validate_image_upload(Some("describe".to_string()), Some(file("text/plain", 1)))
            .unwrap_err();
        assert_eq!(err, UploadError::NotAnImage);

        let (prompt, accepted) =
            validate_image_upload(Some("describe".to_string()), Some(file("image/webp", 3)))
                .unwrap();
        assert_eq!(prompt, "describe");
        assert_eq!(accepted.size(), 3);
    }

    #[test]
    fn test_audio_allow_list() {
        assert_eq!(
            validate_audio_upload(None).unwrap_err(),
            UploadError::AudioMissing
        );

        let err = validate_audio_upload(Some(file("audio/wav", 1))).unwrap_err();
        assert_eq!(
            err.to_json(),
            json!({
                "message": "unsupported audio format, use: MP3, M4A",
                "receivedType": "audio/wav",
            })
        );

        assert!(validate_audio_upload(Some(file("audio/mpeg", 1))).is_ok());
        assert!(validate_audio_upload(Some(file("audio/mp4", 1))).is_ok());
    }

    #[test]
    fn test_audio_error_message_matches_allow_list() {
        let message = UploadError::UnsupportedAudio {
            received_type: "audio/ogg".to_string(),
        }
        .to_string();

        for (_, label) in SUPPORTED_AUDIO_TYPES {
            assert!(message.contains(label));
        }
        assert!(!message.contains("WAV"));
    }

    #[test]
    fn test_audio_size_limit() {
        assert!(validate_audio_upload(Some(file("audio/mpeg", MAX_AUDIO_BYTES))).is_ok());

        let err = validate_audio_upload(Some(file("audio/mpeg", 21 * 1024 * 1024))).unwrap_err();
        assert_eq!(err.to_json()["fileSize"], "21.00MB");
        assert_eq!(
            err.to_json()["message"],
            "audio file too large, maximum is 20.00MB"
        );
    }

    #[test]
    fn test_audio_size_uses_streamed_count() {
        let streamed = UploadedFile {
            filename: "long.mp3".to_string(),
            content_type: "audio/mpeg".to_string(),
            bytes: Vec::new(),
            size: 33 * 1024 * 1024,
        };

        let err = validate_audio_upload(Some(streamed)).unwrap_err();
        assert_eq!(err, UploadError::AudioTooLarge { size: 33 * 1024 * 1024 });
        assert_eq!(err.to_json()["fileSize"], "33.00MB");
    }
}
