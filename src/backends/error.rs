use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("{backend} backend is not configured (missing URL)")]
    NotConfigured { backend: &'static str },

    #[error("{backend} returned status {status}: {body}")]
    Status {
        backend: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unexpected response from {backend}: {detail}")]
    UnexpectedResponse {
        backend: &'static str,
        detail: String,
    },
}

pub type BackendResult<T> = Result<T, BackendError>;
