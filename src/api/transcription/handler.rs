// Transcription handler: multipart audio upload forwarded to Whisper.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use serde_json::json;
use tracing::{info, instrument};

use crate::api::backend_failure;
use crate::backends::whisper::Transcription;
use crate::backends::Language;
use crate::config::state::AppState;
use crate::utils::response_handler::HandlerResponse;

const DEFAULT_FILE_NAME: &str = "audio.wav";

/// Transcribes an uploaded audio file. Fields:
/// - `file` (required): the audio recording
/// - `language` (optional): pins the transcription language; omitted
///   means Whisper detects it
#[instrument(name = "transcribe", skip(state, multipart))]
pub async fn transcribe_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> HandlerResponse {
    let mut audio: Option<(Vec<u8>, String)> = None;
    let mut language: Option<Language> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return HandlerResponse::new(StatusCode::BAD_REQUEST)
                    .data(json!({ "error": e.to_string() }))
                    .message("Malformed multipart upload");
            }
        };

        let name: Option<String> = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name: String = field
                    .file_name()
                    .unwrap_or(DEFAULT_FILE_NAME)
                    .to_string();

                match field.bytes().await {
                    Ok(bytes) => audio = Some((bytes.to_vec(), file_name)),
                    Err(e) => {
                        return HandlerResponse::new(StatusCode::BAD_REQUEST)
                            .data(json!({ "error": e.to_string() }))
                            .message("Failed to read audio upload");
                    }
                }
            }
            Some("language") => {
                let raw: String = field.text().await.unwrap_or_default();
                match Language::parse(&raw) {
                    Some(lang) => language = Some(lang),
                    None => {
                        return HandlerResponse::new(StatusCode::BAD_REQUEST)
                            .data(json!({ "error": format!("unsupported language: {raw}") }))
                            .message("Unsupported language");
                    }
                }
            }
            // Unknown fields are ignored
            _ => {}
        }
    }

    let Some((bytes, file_name)) = audio else {
        return HandlerResponse::new(StatusCode::BAD_REQUEST)
            .data(json!({ "error": "missing file field" }))
            .message("No audio provided. Please upload or record audio first.");
    };

    info!("Transcribing {} ({} bytes)", file_name, bytes.len());

    match state.backends.whisper.transcribe(bytes, file_name, language).await {
        Ok(Transcription { text, .. }) if text.is_empty() => {
            HandlerResponse::new(StatusCode::BAD_REQUEST)
                .data(json!({ "error": "empty transcription" }))
                .message("No transcription returned. Please try again with a clearer recording.")
        }
        Ok(transcription) => {
            let message: String = match language {
                Some(lang) => format!("Transcribed in {}.", lang),
                None => "Transcription complete.".to_string(),
            };

            HandlerResponse::new(StatusCode::OK)
                .data(json!({
                    "text": transcription.text,
                    "language": transcription.language,
                }))
                .message(message)
        }
        Err(e) => backend_failure("Transcription", e),
    }
}
