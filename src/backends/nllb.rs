// NLLB translation client. The serving endpoint speaks the
// `instances`/`predictions` convention, but deployed images differ in
// how they shape the prediction entries, so extraction tries the known
// layouts before falling back to the raw body.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::info;

use super::error::{BackendError, BackendResult};
use super::language::Language;
use super::{Endpoint, HealthReport, HEALTH_TIMEOUT};

const BACKEND: &str = "nllb";
const TRANSLATE_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Clone, Debug)]
pub struct NllbClient {
    client: reqwest::Client,
    endpoint: Endpoint,
}

impl NllbClient {
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

    pub async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> BackendResult<String> {
        self.ensure_configured()?;

        info!("Translating from {} to {}", source, target);

        let payload: Value = json!({
            "instances": [{
                "text": text,
                "source_language": source.nllb_name(),
                "target_language": target.nllb_name(),
            }]
        });

        let response: reqwest::Response = self
            .client
            .post(&self.endpoint.url)
            .bearer_auth(&self.endpoint.token)
            .json(&payload)
            .timeout(TRANSLATE_TIMEOUT)
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

        // Last resort mirrors the response body back rather than failing;
        // the operator sees what the endpoint actually produced.
        Ok(extract_translation(&value).unwrap_or_else(|| value.to_string()))
    }

    pub async fn health(&self) -> HealthReport {
        if !self.endpoint.is_configured() {
            return HealthReport::down(BACKEND, "not configured");
        }

        let probe: Value = json!({
            "instances": [{
                "text": "hello",
                "source_language": "english",
                "target_language": "french",
            }]
        });

        let result = self
            .client
            .post(&self.endpoint.url)
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

/// Pulls the translated text out of whichever layout the serving image
/// used: `predictions`/`outputs` arrays first, then any top-level array
/// entry, then a bare `translated_text` field.
fn extract_translation(value: &Value) -> Option<String> {
    for key in ["predictions", "outputs"] {
        if let Some(first) = value
            .get(key)
            .and_then(Value::as_array)
            .and_then(|entries| entries.first())
        {
            if let Some(text) = extract_entry(first) {
                return Some(text);
            }
        }
    }

    if let Some(map) = value.as_object() {
        for entry in map.values() {
            if let Some(first) = entry.as_array().and_then(|entries| entries.first()) {
                if let Some(text) = extract_entry(first) {
                    return Some(text);
                }
            }
        }

        if let Some(text) = map.get("translated_text").and_then(Value::as_str) {
            return Some(text.to_string());
        }
    }

    None
}

fn extract_entry(entry: &Value) -> Option<String> {
    match entry {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map
            .get("translated_text")
            .or_else(|| map.get("translation"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_predictions_with_translated_text() {
        let value = json!({ "predictions": [{ "translated_text": "bonjour" }] });
        assert_eq!(extract_translation(&value), Some("bonjour".to_string()));
    }

    #[test]
    fn extracts_bare_string_predictions() {
        let value = json!({ "predictions": ["bonjour"] });
        assert_eq!(extract_translation(&value), Some("bonjour".to_string()));
    }

    #[test]
    fn extracts_outputs_layout() {
        let value = json!({ "outputs": [{ "translated_text": "hallo" }] });
        assert_eq!(extract_translation(&value), Some("hallo".to_string()));
    }

    #[test]
    fn scans_unknown_top_level_keys() {
        let value = json!({ "results": [{ "translation": "ahoj" }] });
        assert_eq!(extract_translation(&value), Some("ahoj".to_string()));
    }

    #[test]
    fn accepts_top_level_translated_text() {
        let value = json!({ "translated_text": "hei" });
        assert_eq!(extract_translation(&value), Some("hei".to_string()));
    }

    #[test]
    fn unrecognized_shape_yields_none() {
        let value = json!({ "detail": { "message": "nothing here" } });
        assert_eq!(extract_translation(&value), None);
    }
}
