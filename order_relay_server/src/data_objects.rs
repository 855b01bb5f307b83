use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of the `GET /webhook` health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthStatus {
    pub fn ok_now() -> Self {
        Self { status: "ok".to_string(), timestamp: Utc::now() }
    }
}

/// Acknowledgment sent for diagnostic probe deliveries. Nothing is forwarded for these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeAck {
    pub status: String,
    pub message: String,
}

impl ProbeAck {
    pub fn received() -> Self {
        Self { status: "test".to_string(), message: "Test data received successfully".to_string() }
    }
}

/// 400 body for payloads that fail schema validation (or cannot be deserialized at all).
/// `details` carries every violation, not just the first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestDataError {
    pub error: String,
    pub details: Vec<String>,
}

impl RequestDataError {
    pub fn new(details: Vec<String>) -> Self {
        Self { error: "Invalid request data".to_string(), details }
    }
}

/// 400 body for payloads that validate but cannot be turned into a forwardable transaction.
/// Deliberately distinct from [`RequestDataError`] so the provider can tell the two apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDataError {
    pub error: String,
    pub message: String,
}

impl OrderDataError {
    pub fn new<S: std::fmt::Display>(message: S) -> Self {
        Self { error: "Invalid order data".to_string(), message: message.to_string() }
    }
}

/// Generic 500 body. `details` is only populated in development mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternalError {
    pub status: String,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl InternalError {
    pub fn forwarding(details: Option<String>) -> Self {
        Self {
            status: "error".to_string(),
            error: "Internal server error".to_string(),
            message: "Could not forward the transaction to the accounting API".to_string(),
            details,
        }
    }

    pub fn unexpected() -> Self {
        Self {
            status: "error".to_string(),
            error: "Internal server error".to_string(),
            message: "An unexpected error occurred".to_string(),
            details: None,
        }
    }
}

/// 200 body for a successfully forwarded order. `api_response` is whatever the accounting API
/// replied with, passed through verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardSuccess {
    pub status: String,
    pub message: String,
    #[serde(rename = "orderId")]
    pub order_id: String,
    #[serde(rename = "apiResponse")]
    pub api_response: Value,
}

impl ForwardSuccess {
    pub fn new<S: Into<String>>(order_id: S, api_response: Value) -> Self {
        Self {
            status: "success".to_string(),
            message: "Order forwarded to accounting".to_string(),
            order_id: order_id.into(),
            api_response,
        }
    }
}
