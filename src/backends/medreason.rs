// MedReason client. Sends clinical notes through a completion request
// with the triage prompt and parses the markdown-sectioned answer into
// its reasoning parts plus the structured summary JSON.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use super::error::{BackendError, BackendResult};
use super::{Endpoint, HealthReport, HEALTH_TIMEOUT};

const BACKEND: &str = "medreason";
const MEDREASON_MODEL: &str = "UCSC-VLAA/MedReason-8B";
const DIAGNOSE_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_COMPLETION_TOKENS: u32 = 4096;

#[derive(Clone, Debug)]
pub struct MedReasonClient {
    client: reqwest::Client,
    endpoint: Endpoint,
}

/// Reasoning parts split out of the model's markdown answer.
/// Sections the model skipped come back empty.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DiagnosisSections {
    pub thinking: String,
    pub reasoning: String,
    pub conclusion: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Diagnosis {
    /// Full completion text as returned by the model
    pub raw: String,
    pub sections: DiagnosisSections,
    /// Pretty-printed triage summary JSON, when the model produced one
    pub summary: Option<String>,
}

impl MedReasonClient {
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

    /// Runs the triage analysis prompt over the practitioner's notes.
    pub async fn diagnose(&self, notes: &str) -> BackendResult<Diagnosis> {
        self.ensure_configured()?;

        let payload: Value = json!({
            "model": MEDREASON_MODEL,
            "prompt": build_triage_prompt(notes),
            "max_tokens": MAX_COMPLETION_TOKENS,
            "temperature": 0.1,
        });

        info!("Sending triage analysis request to MedReason");
        let response: reqwest::Response = self
            .client
            .post(&self.endpoint.url)
            .bearer_auth(&self.endpoint.token)
            .json(&payload)
            .timeout(DIAGNOSE_TIMEOUT)
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
        let raw: String = extract_completion_text(&value);

        Ok(parse_diagnosis(raw))
    }

    pub async fn health(&self) -> HealthReport {
        if !self.endpoint.is_configured() {
            return HealthReport::down(BACKEND, "not configured");
        }

        let probe: Value = json!({
            "model": MEDREASON_MODEL,
            "prompt": "Hello",
            "max_tokens": 10,
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

/// The triage prompt. Dates are pinned to SQL-friendly formats so the
/// summary can be stored without guessing.
fn build_triage_prompt(notes: &str) -> String {
    format!(
        r#"
{notes}

Analyze the medical information above. After your analysis, provide your conclusion in valid JSON format with the following fields:
{{
  "patient_name": "Full Name",
  "date_of_birth": "YYYY-MM-DD",
  "visit_time": "YYYY-MM-DD HH:MM:SS",
  "severity": "Mild/Moderate/Severe",
  "primary_diagnosis": "Primary diagnosis",
  "secondary_diagnoses": "Comma-separated list of secondary diagnoses or 'None'",
  "recommended_tests": "Comma-separated list of recommended tests",
  "recommended_treatment": "Treatment plan",
  "follow_up": "Follow-up recommendations",
  "medical_reasoning": "Brief summary of your medical reasoning"
}}

Analyze the case carefully step by step. Include your thinking process and medical reasoning, following this structure:

## Thinking
Systematically explore possible diagnoses based on symptoms, findings, and medical history.

### Reasoning Process
Explain your diagnostic reasoning in detail, considering differential diagnoses and their likelihood.

### Conclusion
Summarize your findings and medical assessment.

## Triage Summary
Return your final answer in valid JSON format with all the fields mentioned above. Each field must contain a string value - no arrays allowed.

IMPORTANT: Format dates and times as follows:
- date_of_birth: Use YYYY-MM-DD format (e.g., 1978-01-10)
- visit_time: Use YYYY-MM-DD HH:MM:SS format (e.g., 2025-04-23 14:30:00)

Return ONLY valid JSON with no additional text.
"#
    )
}

/// Serving runtimes expose completions under several shapes; try the
/// known ones before falling back to the pretty-printed body.
fn extract_completion_text(value: &Value) -> String {
    if let Some(choice) = value
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
    {
        if let Some(text) = choice.get("text").and_then(Value::as_str) {
            return text.to_string();
        }
        if let Some(content) = choice.pointer("/message/content").and_then(Value::as_str) {
            return content.to_string();
        }
        return serde_json::to_string_pretty(choice).unwrap_or_default();
    }

    if let Some(text) = value.get("response").and_then(Value::as_str) {
        return text.to_string();
    }

    if let Some(text) = value.pointer("/generations/0/text").and_then(Value::as_str) {
        return text.to_string();
    }

    serde_json::to_string_pretty(value).unwrap_or_default()
}

fn parse_diagnosis(raw: String) -> Diagnosis {
    let sections: DiagnosisSections = split_sections(&raw);
    let summary: Option<String> = extract_summary_json(&raw);

    Diagnosis {
        raw,
        sections,
        summary,
    }
}

/// Text between a heading and the first of the given terminators
/// (or the end of the answer).
fn section_between<'a>(text: &'a str, heading: &str, terminators: &[&str]) -> Option<&'a str> {
    let (_, tail) = text.split_once(heading)?;

    let end: usize = terminators
        .iter()
        .filter_map(|t| tail.find(t))
        .min()
        .unwrap_or(tail.len());

    Some(tail[..end].trim())
}

fn split_sections(text: &str) -> DiagnosisSections {
    DiagnosisSections {
        thinking: section_between(text, "## Thinking", &["## Final Answer", "## Triage Summary"])
            .unwrap_or_default()
            .to_string(),
        reasoning: section_between(text, "### Reasoning Process", &["---", "### Conclusion"])
            .unwrap_or_default()
            .to_string(),
        conclusion: section_between(text, "### Conclusion", &["## Final Answer", "## Triage Summary"])
            .unwrap_or_default()
            .to_string(),
    }
}

/// First balanced JSON object after the summary heading, pretty-printed.
/// `## Final Answer` is the older heading some checkpoints still emit.
fn extract_summary_json(text: &str) -> Option<String> {
    let tail: &str = text
        .split_once("## Triage Summary")
        .map(|(_, t)| t)
        .or_else(|| text.split_once("## Final Answer").map(|(_, t)| t))
        .unwrap_or(text);

    let start: usize = tail.find('{')?;

    let mut depth: usize = 0;
    let mut end: Option<usize> = None;
    for (i, ch) in tail[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    end = Some(start + i + 1);
                    break;
                }
            }
            _ => {}
        }
    }

    let candidate: &str = &tail[start..end?];
    let parsed: Value = serde_json::from_str(candidate).ok()?;
    serde_json::to_string_pretty(&parsed).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ANSWER: &str = r#"## Thinking
The patient presents with fever and a productive cough.

### Reasoning Process
Community-acquired pneumonia is the most likely diagnosis given the exam findings.

### Conclusion
Moderate severity, start empiric antibiotics.

## Triage Summary
{"patient_name": "Jan Novak", "severity": "Moderate", "primary_diagnosis": "Pneumonia"}
"#;

    #[test]
    fn splits_markdown_sections() {
        let sections = split_sections(ANSWER);
        assert!(sections.thinking.starts_with("The patient presents"));
        assert!(sections.reasoning.starts_with("Community-acquired pneumonia"));
        assert_eq!(sections.conclusion, "Moderate severity, start empiric antibiotics.");
    }

    #[test]
    fn thinking_stops_at_summary_heading() {
        let sections = split_sections(ANSWER);
        assert!(!sections.thinking.contains("Triage Summary"));
        assert!(!sections.thinking.contains("patient_name"));
    }

    #[test]
    fn section_ends_at_earliest_closing_heading() {
        let text = "## Thinking\nanalysis here\n\n## Triage Summary\n{}\n\n## Final Answer\nstale";
        let sections = split_sections(text);
        assert_eq!(sections.thinking, "analysis here");
    }

    #[test]
    fn missing_sections_come_back_empty() {
        let sections = split_sections("no headings at all");
        assert!(sections.thinking.is_empty());
        assert!(sections.reasoning.is_empty());
        assert!(sections.conclusion.is_empty());
    }

    #[test]
    fn extracts_summary_json() {
        let summary = extract_summary_json(ANSWER).expect("summary present");
        let parsed: Value = serde_json::from_str(&summary).unwrap();
        assert_eq!(parsed["patient_name"], "Jan Novak");
        assert_eq!(parsed["severity"], "Moderate");
    }

    #[test]
    fn summary_accepts_final_answer_heading() {
        let text = "## Final Answer\nSome preamble {\"severity\": \"Mild\"} trailing";
        let summary = extract_summary_json(text).expect("summary present");
        assert!(summary.contains("Mild"));
    }

    #[test]
    fn summary_handles_nested_braces() {
        let text = "## Triage Summary\n{\"a\": {\"b\": \"c\"}, \"d\": \"e\"} extra";
        let summary = extract_summary_json(text).expect("summary present");
        let parsed: Value = serde_json::from_str(&summary).unwrap();
        assert_eq!(parsed["a"]["b"], "c");
        assert_eq!(parsed["d"], "e");
    }

    #[test]
    fn malformed_summary_yields_none() {
        let text = "## Triage Summary\n{not valid json}";
        assert_eq!(extract_summary_json(text), None);
        assert_eq!(extract_summary_json("## Triage Summary\nno braces"), None);
    }

    #[test]
    fn completion_text_prefers_choices_text() {
        let value = json!({ "choices": [{ "text": "from text" }] });
        assert_eq!(extract_completion_text(&value), "from text");
    }

    #[test]
    fn completion_text_falls_back_to_chat_content() {
        let value = json!({ "choices": [{ "message": { "content": "from chat" } }] });
        assert_eq!(extract_completion_text(&value), "from chat");
    }

    #[test]
    fn completion_text_handles_alternate_layouts() {
        assert_eq!(
            extract_completion_text(&json!({ "response": "plain" })),
            "plain"
        );
        assert_eq!(
            extract_completion_text(&json!({ "generations": [{ "text": "gen" }] })),
            "gen"
        );
    }

    #[test]
    fn prompt_embeds_notes_and_headings() {
        let prompt = build_triage_prompt("fever for three days");
        assert!(prompt.contains("fever for three days"));
        assert!(prompt.contains("## Triage Summary"));
        assert!(prompt.contains("\"date_of_birth\": \"YYYY-MM-DD\""));
    }
}
