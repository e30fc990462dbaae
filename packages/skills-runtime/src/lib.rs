//! Single-writer runtime for the skills service.
//!
//! HTTP handlers never touch the store directly. They enqueue an
//! [`ApiRequest`] and await its reply; one [`SkillRuntime`] thread applies
//! requests in arrival order.

mod api_handlers;
mod api_request;
mod runtime;

pub use api_handlers::ApiHandlers;
pub use api_request::{ApiRequest, ResponseSender};
pub use runtime::{RuntimeConfig, SkillRuntime};

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, skills_core::SkillError>;
