//! Matchit routing configuration.

use std::error::Error as StdError;
use std::sync::Arc;

use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use matchit::Router as MatchitRouter;
use skills_core::SkillField;
use skills_runtime::ApiRequest;
use tokio::sync::mpsc;

use crate::config::ApiConfig;
use crate::handlers;
use crate::handlers::request_utils::{decode_path_param, read_request_body_with_timeout};

/// Prefix shared by every skill route.
pub const SKILLS_PATH: &str = "/api/v1/skills";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// HTTP layer configuration
    pub config: Arc<ApiConfig>,
    /// API request sender to runtime
    pub api_tx: mpsc::Sender<ApiRequest>,
}

/// HTTP request router.
pub struct Router {
    inner: MatchitRouter<RouteHandler>,
    state: AppState,
}

impl Router {
    /// Creates a router with the skill routes registered.
    pub fn new(
        config: Arc<ApiConfig>,
        api_tx: mpsc::Sender<ApiRequest>,
    ) -> Result<Self, matchit::InsertError> {
        let mut router = MatchitRouter::new();

        router.insert(SKILLS_PATH, RouteHandler::Collection)?;
        router.insert(format!("{}/{{key}}", SKILLS_PATH), RouteHandler::Item)?;
        router.insert(
            format!("{}/{{key}}/actions/{{field}}", SKILLS_PATH),
            RouteHandler::Action,
        )?;

        Ok(Self {
            inner: router,
            state: AppState { config, api_tx },
        })
    }

    /// Shared state handed to every handler.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Routes an incoming request to the appropriate handler.
    ///
    /// # Returns
    /// The handler's response, or a `RouterError` the caller turns into an
    /// error envelope.
    pub async fn route<B>(&self, req: Request<B>) -> Result<Response<Bytes>, RouterError>
    where
        B: Body,
        B::Error: Into<Box<dyn StdError + Send + Sync>>,
    {
        let path = req.uri().path().to_string();

        let (handler, key, field) = match self.inner.at(&path) {
            Ok(matched) => (
                *matched.value,
                matched.params.get("key").map(str::to_string),
                matched.params.get("field").map(str::to_string),
            ),
            Err(_) => return Err(RouterError::NotFound(format!("No route found for {}", path))),
        };

        let key = key.as_deref().map(decode_path_param).transpose()?;
        let field = match field {
            Some(field) => Some(
                field
                    .parse::<SkillField>()
                    .map_err(|_| RouterError::NotFound(format!("No route found for {}", path)))?,
            ),
            None => None,
        };
        let method = req.method().clone();
        tracing::debug!(%method, %path, "routing request");

        match (handler, method, key, field) {
            (RouteHandler::Collection, Method::GET, None, _) => {
                handlers::list_skills(&self.state).await
            }
            (RouteHandler::Collection, Method::POST, None, _) => {
                let body = self.read_body(req).await?;
                handlers::create_skill(body, &self.state).await
            }
            (RouteHandler::Item, Method::GET, Some(key), _) => {
                handlers::get_skill(key, &self.state).await
            }
            (RouteHandler::Item, Method::PUT, Some(key), _) => {
                let body = self.read_body(req).await?;
                handlers::replace_skill(key, body, &self.state).await
            }
            (RouteHandler::Item, Method::DELETE, Some(key), _) => {
                handlers::delete_skill(key, &self.state).await
            }
            (RouteHandler::Action, Method::PATCH, Some(key), Some(field)) => {
                let body = self.read_body(req).await?;
                handlers::patch_skill(key, field, body, &self.state).await
            }
            _ => Err(RouterError::MethodNotAllowed),
        }
    }

    async fn read_body<B>(&self, req: Request<B>) -> Result<Bytes, RouterError>
    where
        B: Body,
        B::Error: Into<Box<dyn StdError + Send + Sync>>,
    {
        read_request_body_with_timeout(
            req.into_body(),
            self.state.config.max_body_bytes,
            self.state.config.request_timeout_ms,
        )
        .await
    }
}

/// Route handler function.
#[derive(Debug, Clone, Copy)]
enum RouteHandler {
    Collection,
    Item,
    Action,
}

/// Router error type.
#[derive(Debug)]
pub enum RouterError {
    MethodNotAllowed,
    InternalError(String),
    Timeout,
    GatewayTimeout,
    BadRequest(String),
    NotFound(String),
    PayloadTooLarge,
}

impl RouterError {
    /// HTTP status code for this error.
    pub fn status(&self) -> u16 {
        match self {
            RouterError::MethodNotAllowed => 405,
            RouterError::InternalError(_) => 500,
            RouterError::Timeout => 408,
            RouterError::GatewayTimeout => 504,
            RouterError::BadRequest(_) => 400,
            RouterError::NotFound(_) => 404,
            RouterError::PayloadTooLarge => 413,
        }
    }

    /// Message placed in the error envelope.
    ///
    /// Internal details stay in the logs.
    pub fn public_message(&self) -> &str {
        match self {
            RouterError::MethodNotAllowed => "Method Not Allowed",
            RouterError::InternalError(_) => "Internal server error",
            RouterError::Timeout => "Request Timeout",
            RouterError::GatewayTimeout => "Gateway Timeout",
            RouterError::BadRequest(msg) => msg,
            RouterError::NotFound(msg) => msg,
            RouterError::PayloadTooLarge => "Payload Too Large",
        }
    }
}

impl std::fmt::Display for RouterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterError::MethodNotAllowed => write!(f, "Method Not Allowed"),
            RouterError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
            RouterError::Timeout => write!(f, "Request Timeout"),
            RouterError::GatewayTimeout => write!(f, "Gateway Timeout"),
            RouterError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            RouterError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            RouterError::PayloadTooLarge => write!(f, "Payload Too Large"),
        }
    }
}

impl std::error::Error for RouterError {}

impl From<RouterError> for Response<Bytes> {
    fn from(err: RouterError) -> Self {
        let status = err.status();
        if status >= 500 {
            tracing::error!(error = %err, "request failed");
        } else {
            tracing::debug!(error = %err, "request rejected");
        }

        let envelope = handlers::error_response(err.public_message());
        let body = serde_json::to_vec(&envelope).unwrap_or_else(|_| {
            br#"{"status":"error","message":"Internal server error"}"#.to_vec()
        });

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Bytes::from(body))
            .unwrap_or_else(|_| {
                let mut response = Response::new(Bytes::from_static(b"Internal server error"));
                *response.status_mut() = hyper::StatusCode::INTERNAL_SERVER_ERROR;
                response
            })
    }
}
