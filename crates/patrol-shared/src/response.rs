//! Response envelopes shared by every endpoint.

use serde::{Deserialize, Serialize};

/// Successful response: `{"success": true, "message"?: ..., ...payload}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}

/// Payload for responses that only acknowledge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    pub fn acknowledged() -> Self {
        Self::ok(Empty {})
    }
}

/// Error body: `{"error": ..., "details"?: ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short, human-readable message.
    pub error: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn unauthorized() -> Self {
        Self::new("Unauthorized")
    }

    pub fn internal_error() -> Self {
        Self::new("Internal server error")
    }
}
