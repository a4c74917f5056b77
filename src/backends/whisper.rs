// Whisper speech-to-text client. The serving endpoint takes a
// multipart upload and answers with the transcription plus the
// detected language.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::error::{BackendError, BackendResult};
use super::language::Language;
use super::{Endpoint, HealthReport, HEALTH_TIMEOUT};

const BACKEND: &str = "whisper";
const WHISPER_MODEL: &str = "openai/whisper-large-v3";
// Long audio files take a while to transcribe
const TRANSCRIBE_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Clone, Debug)]
pub struct WhisperClient {
    client: reqwest::Client,
    endpoint: Endpoint,
}

#[derive(Clone, Debug, Serialize)]
pub struct Transcription {
    pub text: String,
    /// Display name of the detected language, when the endpoint reports one
    pub language: Option<String>,
}

impl WhisperClient {
    pub fn new(client: reqwest::Client, endpoint: Endpoint) -> Self {
        Self { client, endpoint }
    }

    fn ensure_configured(&self) -> BackendResult<()> {
        if self.endpoint.is_configured() {
            Ok(())
        } else {
            Err(BackendError::NotConfigured { backend: BACKEND })
        }
    }

    /// Transcribes an audio file. When `language` is given the
    /// transcription language is pinned; otherwise Whisper detects it.
    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        file_name: String,
        language: Option<Language>,
    ) -> BackendResult<Transcription> {
        self.ensure_configured()?;

        let mut form: Form = Form::new()
            .part("file", Part::bytes(audio).file_name(file_name))
            .text("model", WHISPER_MODEL);

        if let Some(lang) = language {
            debug!("Pinning transcription language to {} ({})", lang, lang.iso_code());
            form = form.text("language", lang.iso_code());
        }

        info!("Sending transcription request to Whisper");
        let response: reqwest::Response = self
            .client
            .post(&self.endpoint.url)
            .bearer_auth(&self.endpoint.token)
            .multipart(form)
            .timeout(TRANSCRIBE_TIMEOUT)
            .send()
            .await?;

        let status: StatusCode = response.status();
        if !status.is_success() {
            let body: String = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                backend: BACKEND,
                status,
                body,
            });
        }

        let value: Value = response.json().await?;

        let text: String = value
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string();

        let detected: Option<String> = value
            .get("language")
            .and_then(Value::as_str)
            .map(|code| Language::describe_detected(code).to_string());

        Ok(Transcription {
            text,
            language: detected,
        })
    }

    /// A probe without a file; the endpoint answers 400, which still
    /// proves it is up and parsing requests.
    pub async fn health(&self) -> HealthReport {
        if !self.endpoint.is_configured() {
            return HealthReport::down(BACKEND, "not configured");
        }

        let result = self
            .client
            .post(&self.endpoint.url)
            .bearer_auth(&self.endpoint.token)
            .json(&json!({ "model": WHISPER_MODEL }))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(r) if r.status() == StatusCode::BAD_REQUEST => {
                HealthReport::up(BACKEND, "available (expected 400 for probe without file)")
            }
            Ok(r) if r.status().is_success() => {
                HealthReport::up(BACKEND, "available and responding")
            }
            Ok(r) => HealthReport::down(BACKEND, format!("returned status {}", r.status())),
            Err(e) => HealthReport::down(BACKEND, e.to_string()),
        }
    }
}
