//! API configuration.

/// HTTP layer configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Request body read timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Runtime reply timeout in milliseconds
    pub response_timeout_ms: u64,
    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 5000,   // 5 seconds default
            response_timeout_ms: 10000, // 10 seconds default
            max_body_bytes: 1024 * 1024,
        }
    }
}
