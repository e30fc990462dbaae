//! API request handlers

use skills_core::{SharedSkillStore, SkillError};

use crate::api_request::{ApiRequest, ResponseSender};
use crate::Result;

/// Applies queued API requests to a store.
pub struct ApiHandlers {
    /// Backing store
    store: SharedSkillStore,
}

impl ApiHandlers {
    /// Create new API handlers
    pub fn new(store: SharedSkillStore) -> Self {
        Self { store }
    }

    /// Handle API request
    pub fn handle_api_request(&self, req: ApiRequest) {
        let action = req.action();
        match req {
            ApiRequest::Get { key, response } => {
                tracing::debug!(action, key = %key, "Fetching skill");
                reply(action, response, self.store.get(&key));
            }
            ApiRequest::List { response } => {
                tracing::debug!(action, "Listing skills");
                reply(action, response, self.store.list());
            }
            ApiRequest::Create { skill, response } => {
                let key = skill.key.clone();
                let result = self.store.create(skill);
                match &result {
                    Ok(outcome) if outcome.is_created() => {
                        tracing::info!(action, key = %key, "Created skill")
                    }
                    Ok(_) => tracing::info!(action, key = %key, "Skill already exists, kept"),
                    Err(_) => {}
                }
                reply(action, response, result);
            }
            ApiRequest::Replace {
                key,
                update,
                response,
            } => {
                tracing::info!(action, key = %key, "Replacing skill");
                reply(action, response, self.store.replace(&key, update));
            }
            ApiRequest::Patch {
                key,
                patch,
                response,
            } => {
                tracing::info!(action, key = %key, field = %patch.field(), "Patching skill");
                reply(action, response, self.store.patch(&key, patch));
            }
            ApiRequest::Delete { key, response } => {
                tracing::info!(action, key = %key, "Deleting skill");
                reply(action, response, self.store.delete(&key));
            }
        }
    }
}

/// Logs backend failures and hands the result back to the waiting handler.
fn reply<T>(action: &'static str, response: ResponseSender<T>, result: Result<T>) {
    if let Err(err) = &result {
        match err {
            SkillError::Storage(_) | SkillError::Timeout => {
                tracing::error!(action, error = %err, "Store operation failed")
            }
            _ => tracing::debug!(action, error = %err, "Request rejected"),
        }
    }
    // Handler may have timed out and dropped the receiver.
    if response.send(result).is_err() {
        tracing::warn!(action, "Reply dropped, requester went away");
    }
}
