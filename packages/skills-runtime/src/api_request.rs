//! Requests queued from the HTTP layer to the runtime.

use skills_core::{CreateOutcome, Skill, SkillPatch, SkillUpdateRequest};
use tokio::sync::oneshot;

use crate::Result;

/// Reply channel for an API request
pub type ResponseSender<T> = oneshot::Sender<Result<T>>;

/// API request from REST server
#[derive(Debug)]
pub enum ApiRequest {
    /// Fetch one skill
    Get {
        key: String,
        response: ResponseSender<Skill>,
    },
    /// List every skill
    List { response: ResponseSender<Vec<Skill>> },
    /// Create a skill unless the key is taken
    Create {
        skill: Skill,
        response: ResponseSender<CreateOutcome>,
    },
    /// Replace every field except the key
    Replace {
        key: String,
        update: SkillUpdateRequest,
        response: ResponseSender<Skill>,
    },
    /// Update a single field
    Patch {
        key: String,
        patch: SkillPatch,
        response: ResponseSender<Skill>,
    },
    /// Delete a skill
    Delete {
        key: String,
        response: ResponseSender<()>,
    },
}

impl ApiRequest {
    /// Action name used in logs.
    pub fn action(&self) -> &'static str {
        match self {
            ApiRequest::Get { .. } => "get",
            ApiRequest::List { .. } => "list",
            ApiRequest::Create { .. } => "create",
            ApiRequest::Replace { .. } => "update",
            ApiRequest::Patch { patch, .. } => match patch {
                SkillPatch::Name(_) => "update_name",
                SkillPatch::Description(_) => "update_desc",
                SkillPatch::Logo(_) => "update_logo",
                SkillPatch::Tags(_) => "update_tags",
            },
            ApiRequest::Delete { .. } => "delete",
        }
    }
}
