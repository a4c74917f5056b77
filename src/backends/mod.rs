// Typed clients for the four hosted inference services.
// One reqwest connection pool is shared across all of them.

pub mod error;
pub mod language;
pub mod medgemma;
pub mod medreason;
pub mod nllb;
pub mod whisper;

pub use error::{BackendError, BackendResult};
pub use language::Language;

use std::time::Duration;

use serde::Serialize;

use crate::config::environment::EnvironmentVariables;

/// Timeout shared by all health probes
pub(crate) const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

/// URL + bearer token pair for one inference backend
#[derive(Clone, Debug)]
pub struct Endpoint {
    pub url: String,
    pub token: String,
}

impl Endpoint {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
        }
    }

    /// An endpoint with no URL is treated as unconfigured, not broken
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// Outcome of a single backend health probe
#[derive(Clone, Debug, Serialize)]
pub struct HealthReport {
    pub backend: &'static str,
    pub healthy: bool,
    pub detail: String,
}

impl HealthReport {
    pub fn up(backend: &'static str, detail: impl Into<String>) -> Self {
        Self {
            backend,
            healthy: true,
            detail: detail.into(),
        }
    }

    pub fn down(backend: &'static str, detail: impl Into<String>) -> Self {
        Self {
            backend,
            healthy: false,
            detail: detail.into(),
        }
    }
}

/// All four inference clients, wired from the environment
#[derive(Clone, Debug)]
pub struct Backends {
    pub medreason: medreason::MedReasonClient,
    pub whisper: whisper::WhisperClient,
    pub nllb: nllb::NllbClient,
    pub medgemma: medgemma::MedGemmaClient,
}

impl Backends {
    pub fn from_environment(env: &EnvironmentVariables) -> BackendResult<Self> {
        // The serving endpoints commonly sit behind self-signed certificates
        let client: reqwest::Client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .build()?;

        Ok(Self {
            medreason: medreason::MedReasonClient::new(
                client.clone(),
                Endpoint::new(env.medreason_url.as_ref(), env.medreason_token.as_ref()),
            ),
            whisper: whisper::WhisperClient::new(
                client.clone(),
                Endpoint::new(env.whisper_url.as_ref(), env.whisper_token.as_ref()),
            ),
            nllb: nllb::NllbClient::new(
                client.clone(),
                Endpoint::new(env.nllb_url.as_ref(), env.nllb_token.as_ref()),
            ),
            medgemma: medgemma::MedGemmaClient::new(
                client,
                Endpoint::new(env.medgemma_url.as_ref(), env.medgemma_token.as_ref()),
            ),
        })
    }

    /// Probes all four backends concurrently
    pub async fn check_all(&self) -> Vec<HealthReport> {
        let (medreason, whisper, nllb, medgemma) = tokio::join!(
            self.medreason.health(),
            self.whisper.health(),
            self.nllb.health(),
            self.medgemma.health(),
        );

        vec![medreason, whisper, nllb, medgemma]
    }
}
