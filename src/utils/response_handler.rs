// Unified response system. Handlers build a HandlerResponse; the
// response_wrapper middleware folds every response (including layer
// errors) into the standard ResponseFormat JSON envelope.

use std::convert::Infallible;

use axum::{
    body::Body,
    http::{header, HeaderValue, Request, Response, StatusCode},
    middleware::Next,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::utils::json::to_pretty_json;

/// Standard JSON envelope for all API endpoints
#[derive(Serialize, Deserialize)]
pub struct ResponseFormat {
    pub status: String,        // HTTP status text (e.g. "OK", "NOT_FOUND")
    pub code: u16,             // HTTP status code
    pub data: Value,           // Response payload
    pub messages: Vec<String>, // Informational messages
    pub date: String,          // ISO timestamp
}

/// Convenience builder for handler responses
#[derive(Debug, Clone)]
pub struct HandlerResponse {
    pub status_code: StatusCode,
    pub data: Value,
    pub messages: Vec<String>,
}

impl HandlerResponse {
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            status_code,
            data: Value::Null,
            messages: Vec::new(),
        }
    }

    /// Adds the JSON data payload
    pub fn data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Adds an informational message
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }
}

impl IntoResponse for HandlerResponse {
    fn into_response(self) -> axum::response::Response {
        let mut response: Response<Body> = Json(json!({
            "data": self.data,
            "messages": self.messages
        }))
        .into_response();

        *response.status_mut() = self.status_code;

        // Stash the structured form for the wrapper middleware
        response.extensions_mut().insert(self);
        response
    }
}

/// Middleware that wraps all responses in the ResponseFormat envelope.
/// Responses that never went through a handler (router misses, layer
/// errors) get an empty payload but the same shape.
pub async fn response_wrapper(
    req: Request<Body>,
    next: Next,
) -> Result<Response<Body>, Infallible> {
    let response: Response<Body> = next.run(req).await;

    let (messages, data) = match response.extensions().get::<HandlerResponse>() {
        Some(r) => (r.messages.clone(), r.data.clone()),
        None => (Vec::new(), Value::Null),
    };

    let (mut parts, _) = response.into_parts();
    let status: StatusCode = parts.status;

    let envelope: ResponseFormat = ResponseFormat {
        status: status_label(status),
        code: status.as_u16(),
        data,
        messages,
        date: Utc::now().to_rfc3339(),
    };

    match to_pretty_json(&envelope) {
        Ok(pretty) => debug!("\nFinal response:\n{}", pretty),
        Err(err) => error!("Failed to format response JSON: {:?}", err),
    }

    let body: Vec<u8> = serde_json::to_vec(&envelope).unwrap_or_else(|_| b"{}".to_vec());

    parts
        .headers
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    // The body changed; a stale length would truncate the envelope
    parts.headers.remove(header::CONTENT_LENGTH);

    Ok(Response::from_parts(parts, Body::from(body)))
}

/// "Not Found" -> "NOT_FOUND"
fn status_label(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("UNKNOWN STATUS")
        .to_uppercase()
        .replace(' ', "_")
}
