//! Response envelope shared by every endpoint.

use serde::Serialize;

/// Literal `status` member of an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// `{status, message?, data?}` wrapper around every API response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// `"success"` or `"error"`
    pub status: ResponseStatus,
    /// Human-readable message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Helper to create success response carrying data
pub fn success_response<T: Serialize>(data: T) -> ApiResponse<T> {
    ApiResponse {
        status: ResponseStatus::Success,
        message: None,
        data: Some(data),
    }
}

/// Helper to create success response carrying only a message
pub fn success_message(message: impl Into<String>) -> ApiResponse<()> {
    ApiResponse {
        status: ResponseStatus::Success,
        message: Some(message.into()),
        data: None,
    }
}

/// Helper to create error response
pub fn error_response(message: impl Into<String>) -> ApiResponse<()> {
    ApiResponse {
        status: ResponseStatus::Error,
        message: Some(message.into()),
        data: None,
    }
}
