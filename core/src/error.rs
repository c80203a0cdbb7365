//! Error taxonomy for calls against the fleet service.
//!
//! # Design
//! `Network` is the only variant without a status: the request never reached
//! the service. Every answered request that is not 2xx becomes `NotFound`
//! (404) or `Http`; client and server errors are carried the same way and
//! only distinguished through `is_client_error` / `is_server_error`. When the
//! response body has a `message` field it is extracted so callers can show
//! the service's wording instead of a generic one.

use serde_json::Value;
use thiserror::Error;

use crate::http::HttpResponse;

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request never reached the service (DNS, refused connection, reset).
    #[error("network error: {0}")]
    Network(String),

    /// The service answered 404.
    #[error("resource not found{}", suffix(.message))]
    NotFound { message: Option<String> },

    /// Any other non-2xx answer.
    #[error("HTTP {status}: {}", describe(.message, .body))]
    Http {
        status: u16,
        message: Option<String>,
        body: String,
    },

    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The caller's cancellation token fired before the response arrived.
    #[error("request cancelled")]
    Cancelled,
}

fn suffix(message: &Option<String>) -> String {
    match message {
        Some(msg) => format!(": {msg}"),
        None => String::new(),
    }
}

fn describe<'a>(message: &'a Option<String>, body: &'a str) -> &'a str {
    message.as_deref().unwrap_or(body)
}

impl ApiError {
    /// Classify a non-2xx response.
    pub fn from_response(response: &HttpResponse) -> Self {
        let message = extract_message(&response.body);
        if response.status == 404 {
            return ApiError::NotFound { message };
        }
        ApiError::Http {
            status: response.status,
            message,
            body: response.body.clone(),
        }
    }

    /// Status code of the answer, `None` when the service was never reached.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable message sent by the service, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiError::NotFound { message } | ApiError::Http { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(400..=499))
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(500..=599))
    }

    /// Text to show the user: the service's message when it sent one,
    /// otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.message().unwrap_or(fallback).to_string()
    }
}

/// Pull the `message` field out of a JSON error body. Validation failures
/// arrive as an array of strings and are joined with `"; "`.
pub fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("message")? {
        Value::String(msg) if !msg.trim().is_empty() => Some(msg.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        }
        _ => None,
    }
}
