//! Request utilities for HTTP endpoints.

use std::error::Error as StdError;

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::Response;
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use serde::Serialize;
use skills_core::SkillError;
use skills_runtime::{ApiRequest, ResponseSender};
use tokio::sync::oneshot;
use tokio::time;

use crate::router::{AppState, RouterError};

/// Reads a request body, bounded in size and time.
pub async fn read_request_body_with_timeout<B>(
    body: B,
    max_bytes: usize,
    timeout_ms: u64,
) -> Result<Bytes, RouterError>
where
    B: Body,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let timeout_duration = time::Duration::from_millis(timeout_ms);
    let collected = time::timeout(timeout_duration, Limited::new(body, max_bytes).collect())
        .await
        .map_err(|_| RouterError::Timeout)?
        .map_err(|e| {
            if e.downcast_ref::<LengthLimitError>().is_some() {
                RouterError::PayloadTooLarge
            } else {
                RouterError::BadRequest(format!("Failed to read request body: {}", e))
            }
        })?;
    Ok(collected.to_bytes())
}

/// Helper function to wait for response with timeout
pub async fn wait_for_response_with_timeout<T>(
    rx: oneshot::Receiver<T>,
    timeout_ms: u64,
) -> Result<T, RouterError> {
    let timeout_duration = time::Duration::from_millis(timeout_ms);
    time::timeout(timeout_duration, rx)
        .await
        .map_err(|_| RouterError::GatewayTimeout)?
        .map_err(|e| RouterError::InternalError(format!("Response channel closed: {}", e)))
}

/// Queues a request on the runtime and waits for its reply.
pub async fn dispatch<T>(
    state: &AppState,
    build: impl FnOnce(ResponseSender<T>) -> ApiRequest,
) -> Result<T, RouterError> {
    let (tx, rx) = oneshot::channel();
    state
        .api_tx
        .send(build(tx))
        .await
        .map_err(|e| RouterError::InternalError(format!("Channel closed: {}", e)))?;

    let result = wait_for_response_with_timeout(rx, state.config.response_timeout_ms).await?;
    result.map_err(map_skill_error_to_router_error)
}

/// Map SkillError to appropriate RouterError
pub fn map_skill_error_to_router_error(e: SkillError) -> RouterError {
    match e {
        SkillError::NotFound { .. } => RouterError::NotFound(e.to_string()),
        SkillError::KeyMismatch { .. } | SkillError::InvalidKey { .. } => {
            RouterError::BadRequest(e.to_string())
        }
        SkillError::Timeout => RouterError::GatewayTimeout,
        SkillError::Storage(_) => RouterError::InternalError(e.to_string()),
    }
}

/// Decodes a percent-encoded path parameter.
pub fn decode_path_param(raw: &str) -> Result<String, RouterError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| RouterError::BadRequest(format!("Invalid path segment '{}'", raw)))
}

/// Parses a JSON request body.
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, RouterError> {
    serde_json::from_slice(body)
        .map_err(|e| RouterError::BadRequest(format!("Can't bind payload: {}", e)))
}

/// Serializes an envelope into a JSON response.
pub fn json_response<T: Serialize>(status: u16, payload: &T) -> Result<Response<Bytes>, RouterError> {
    let json = serde_json::to_vec(payload)
        .map_err(|e| RouterError::InternalError(format!("Failed to serialize response: {}", e)))?;
    build_response(status, json)
}

/// Helper to build HTTP response with proper error handling
pub fn build_response(status: u16, json: Vec<u8>) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Bytes::from(json))
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}
