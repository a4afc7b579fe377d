//! Failure classification and the normalized error returned to callers.

use serde::Serialize;
use serde_json::{Map, Value};

/// A raw failure, classified once at the transport boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportFailure {
    /// The failure did not come from the transport, e.g. the request could not be built.
    NonTransport(String),
    /// The transport gave up waiting for the service.
    Timeout,
    /// The service answered with a non-success status.
    ServerResponded { status: u16, body: Option<Value> },
    /// No response was obtained (connection refused, reset, DNS, proxy...).
    NoResponse { message: String },
}

impl TransportFailure {
    /// Transient failures never reached the service, so repeating the request may help.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TransportFailure::Timeout | TransportFailure::NoResponse { .. }
        )
    }

    /// Classifies a reqwest error raised while sending or reading a response.
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            TransportFailure::Timeout
        } else if error.is_builder() {
            TransportFailure::NonTransport(error.to_string())
        } else {
            TransportFailure::NoResponse {
                message: error.to_string(),
            }
        }
    }

    /// Builds a server failure from a raw error body.
    pub fn server_responded(status: u16, body: &[u8]) -> Self {
        TransportFailure::ServerResponded {
            status,
            body: parse_body(body),
        }
    }
}

/// Interprets a response body: JSON when it parses, text otherwise, `None` when empty.
pub fn parse_body(bytes: &[u8]) -> Option<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(String::from_utf8_lossy(bytes).into_owned())),
    }
}

/// The single failure shape handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (HTTP {})", self.message, status),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Converts a classified failure into the caller-facing shape.
    ///
    /// Pure: the same failure and base URL always give the same error.
    pub fn normalize(failure: &TransportFailure, base_url: &str) -> Self {
        match failure {
            TransportFailure::NonTransport(original) => ApiError {
                message: "Unexpected error".to_string(),
                status: None,
                hint: None,
                detail: Some(Value::String(original.clone())),
            },
            TransportFailure::Timeout => ApiError {
                message: "Request timed out".to_string(),
                status: None,
                hint: Some(format!(
                    "The service at {} did not answer in time. It may be unreachable or overloaded.",
                    base_url
                )),
                detail: None,
            },
            TransportFailure::ServerResponded { status, body } => {
                server_error(*status, body.as_ref())
            }
            TransportFailure::NoResponse { message } => ApiError {
                message: "Network error".to_string(),
                status: None,
                hint: Some(format!(
                    "Could not reach {}. Check that the service is running there and that no proxy or cross-origin policy is blocking the request.",
                    base_url
                )),
                detail: Some(Value::String(message.clone())),
            },
        }
    }
}

fn server_error(status: u16, body: Option<&Value>) -> ApiError {
    let fallback = || format!("Request failed with status {}", status);

    match body {
        Some(Value::String(text)) if !text.trim().is_empty() => ApiError {
            message: text.clone(),
            status: Some(status),
            hint: None,
            detail: None,
        },
        Some(Value::Object(fields)) => ApiError {
            message: text_field(fields, "message")
                .or_else(|| text_field(fields, "detail"))
                .map(str::to_string)
                .unwrap_or_else(fallback),
            status: Some(status),
            hint: hint_from(fields),
            detail: ["detail", "message"]
                .iter()
                .filter_map(|key| fields.get(*key))
                .find(|value| !is_blank(value))
                .cloned(),
        },
        _ => ApiError {
            message: fallback(),
            status: Some(status),
            hint: None,
            detail: None,
        },
    }
}

fn text_field<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn hint_from(fields: &Map<String, Value>) -> Option<String> {
    match (text_field(fields, "hint"), text_field(fields, "action")) {
        (Some(hint), Some(action)) => Some(format!("{} {}", hint, action)),
        (Some(hint), None) => Some(hint.to_string()),
        (None, Some(action)) => Some(action.to_string()),
        (None, None) => None,
    }
}
