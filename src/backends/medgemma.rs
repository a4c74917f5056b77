// MedGemma multimodal client. X-ray images travel as base64 data URIs
// inside an OpenAI-style chat completion request.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::info;

use super::error::{BackendError, BackendResult};
use super::{Endpoint, HealthReport, HEALTH_TIMEOUT};

const BACKEND: &str = "medgemma";
const MEDGEMMA_MODEL: &str = "google/medgemma-4b-it";
const ANALYZE_TIMEOUT: Duration = Duration::from_secs(120);

const SYSTEM_PROMPT: &str =
    "You are an expert radiologist. Analyze the provided X-ray image and provide a detailed medical assessment.";

const ANALYSIS_INSTRUCTION: &str =
    "Please analyze this X-ray image. Describe any abnormalities, potential diagnoses, and recommendations for further evaluation if needed. Provide a structured analysis including: 1) Image quality assessment, 2) Anatomical structures visible, 3) Abnormal findings (if any), 4) Differential diagnoses, 5) Recommendations.";

#[derive(Clone, Debug)]
pub struct MedGemmaClient {
    client: reqwest::Client,
    endpoint: Endpoint,
}

impl MedGemmaClient {
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

    // The configured URL is the serving base; chat completions hang off it
    fn chat_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.endpoint.url.trim_end_matches('/')
        )
    }

    /// Runs the radiology analysis prompt over an uploaded X-ray image.
    pub async fn analyze_xray(&self, image: Vec<u8>) -> BackendResult<String> {
        self.ensure_configured()?;

        let encoded: String = BASE64.encode(&image);

        let payload: Value = json!({
            "model": MEDGEMMA_MODEL,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": [
                    { "type": "text", "text": ANALYSIS_INSTRUCTION },
                    { "type": "image_url", "image_url": {
                        "url": format!("data:image/png;base64,{encoded}")
                    }}
                ]}
            ],
            "max_tokens": 1000,
            "temperature": 0.1,
        });

        info!("Sending X-ray analysis request to MedGemma");
        let response: reqwest::Response = self
            .client
            .post(self.chat_url())
            .bearer_auth(&self.endpoint.token)
            .json(&payload)
            .timeout(ANALYZE_TIMEOUT)
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

        value
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| BackendError::UnexpectedResponse {
                backend: BACKEND,
                detail: value.to_string(),
            })
    }

    pub async fn health(&self) -> HealthReport {
        if !self.endpoint.is_configured() {
            return HealthReport::down(BACKEND, "not configured");
        }

        let probe: Value = json!({
            "model": MEDGEMMA_MODEL,
            "messages": [
                { "role": "system", "content": "You are an expert radiologist." },
                { "role": "user", "content": [
                    { "type": "text", "text": "Hello, can you help with medical imaging analysis?" }
                ]}
            ],
            "max_tokens": 10,
            "temperature": 0.1,
        });

        let result = self
            .client
            .post(self.chat_url())
            .bearer_auth(&self.endpoint.token)
            .json(&probe)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(r) if r.status().is_success() => {
                HealthReport::up(BACKEND, "available and responding")
            }
            Ok(r) => HealthReport::down(BACKEND, format!("returned status {}", r.status())),
            Err(e) => HealthReport::down(BACKEND, e.to_string()),
        }
    }
}
