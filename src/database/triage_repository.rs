// Triage record persistence. The structured summary coming out of
// MedReason is model output, so dates are validated and coerced before
// they reach the DATE/DATETIME columns.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

/// Structured triage summary as produced by MedReason.
/// All fields are optional; the model does not always fill them.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TriageSummary {
    pub patient_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub visit_time: Option<String>,
    pub severity: Option<String>,
    pub primary_diagnosis: Option<String>,
    pub secondary_diagnoses: Option<String>,
    pub recommended_tests: Option<String>,
    pub recommended_treatment: Option<String>,
    pub follow_up: Option<String>,
    /// Present in model output, deliberately not persisted
    #[serde(default)]
    pub medical_reasoning: Option<String>,
}

/// A persisted triage record
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct TriageRecord {
    pub id: u64,
    pub patient_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub visit_time: Option<NaiveDateTime>,
    pub severity: Option<String>,
    pub primary_diagnosis: Option<String>,
    pub secondary_diagnoses: Option<String>,
    pub recommended_tests: Option<String>,
    pub recommended_treatment: Option<String>,
    pub follow_up: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Inserts a triage summary and returns the new record id.
pub async fn insert_summary(pool: &MySqlPool, summary: &TriageSummary) -> Result<u64> {
    let result = sqlx::query(
        r#"
        INSERT INTO triage (
            patient_name, date_of_birth, visit_time, severity,
            primary_diagnosis, secondary_diagnoses, recommended_tests,
            recommended_treatment, follow_up
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(text_or_na(&summary.patient_name))
    .bind(normalize_date_of_birth(summary.date_of_birth.as_deref()))
    .bind(normalize_visit_time(summary.visit_time.as_deref()))
    .bind(text_or_na(&summary.severity))
    .bind(text_or_na(&summary.primary_diagnosis))
    .bind(text_or_na(&summary.secondary_diagnoses))
    .bind(text_or_na(&summary.recommended_tests))
    .bind(text_or_na(&summary.recommended_treatment))
    .bind(text_or_na(&summary.follow_up))
    .execute(pool)
    .await
    .context("Failed to insert triage record")?;

    Ok(result.last_insert_id())
}

/// Most recent triage records, newest first.
pub async fn list_recent(pool: &MySqlPool, limit: u32) -> Result<Vec<TriageRecord>> {
    sqlx::query_as::<_, TriageRecord>(
        r#"
        SELECT id, patient_name, date_of_birth, visit_time, severity,
               primary_diagnosis, secondary_diagnoses, recommended_tests,
               recommended_treatment, follow_up, created_at
        FROM triage
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
    .context("Failed to list triage records")
}

fn text_or_na(value: &Option<String>) -> String {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("N/A")
        .to_string()
}

/// Birth dates must arrive as YYYY-MM-DD; anything else is stored NULL.
fn normalize_date_of_birth(raw: Option<&str>) -> Option<NaiveDate> {
    let value: &str = raw?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("n/a") {
        return None;
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Visit times tolerate an ISO `T` separator and bare dates (midnight
/// is assumed); anything that still fails to parse is stored NULL.
fn normalize_visit_time(raw: Option<&str>) -> Option<NaiveDateTime> {
    let value: &str = raw?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("n/a") {
        return None;
    }

    let mut value: String = value.replace('T', " ");
    if value.len() == 10 && value.matches('-').count() == 2 {
        value.push_str(" 00:00:00");
    }

    NaiveDateTime::parse_from_str(&value, "%Y-%m-%d %H:%M:%S").ok()
}
