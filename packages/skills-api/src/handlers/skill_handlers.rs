//! Skill endpoint handlers.

use hyper::body::Bytes;
use hyper::Response;
use skills_core::{SkillCreateRequest, SkillField, SkillUpdateRequest};
use skills_runtime::ApiRequest;

use super::request_utils::{dispatch, json_response, parse_json};
use super::response::{success_message, success_response};
use crate::router::{AppState, RouterError};

/// Fetches one skill.
///
/// # Endpoint
/// `GET /api/v1/skills/{key}`
///
/// # Response
/// - **200 OK**: `{"status":"success","data":{"key":"go",...}}`
///
/// # Errors
/// - **404 Not Found**: `{"status":"error","message":"Skill not found"}`
pub async fn get_skill(key: String, state: &AppState) -> Result<Response<Bytes>, RouterError> {
    let skill = dispatch(state, |response| ApiRequest::Get { key, response }).await?;
    json_response(200, &success_response(skill))
}

/// Lists every skill ordered by key.
///
/// # Endpoint
/// `GET /api/v1/skills`
pub async fn list_skills(state: &AppState) -> Result<Response<Bytes>, RouterError> {
    let skills = dispatch(state, |response| ApiRequest::List { response }).await?;
    json_response(200, &success_response(skills))
}

/// Creates a skill.
///
/// # Endpoint
/// `POST /api/v1/skills`
///
/// # Request Body
/// ```json
/// {
///   "key": "python",
///   "name": "Python",
///   "description": "...",
///   "logo": "https://...",
///   "tags": ["programming language", "scripting"]
/// }
/// ```
///
/// # Response
/// - **201 Created**: the stored skill
/// - **200 OK**: the key was already taken; the existing skill is returned
///   unchanged
///
/// # Errors
/// - **400 Bad Request**: unparsable payload or invalid key
///
/// # Example
/// ```bash
/// curl -X POST http://localhost:8080/api/v1/skills \
///   -H "Content-Type: application/json" \
///   -d '{"key": "rust", "name": "Rust"}'
/// ```
pub async fn create_skill(body: Bytes, state: &AppState) -> Result<Response<Bytes>, RouterError> {
    let request: SkillCreateRequest = parse_json(&body)?;
    let skill = request
        .into_skill()
        .map_err(|e| RouterError::BadRequest(e.to_string()))?;

    let outcome = dispatch(state, |response| ApiRequest::Create { skill, response }).await?;
    let status = if outcome.is_created() { 201 } else { 200 };
    json_response(status, &success_response(outcome.into_skill()))
}

/// Replaces every field of a skill except its key.
///
/// # Endpoint
/// `PUT /api/v1/skills/{key}`
///
/// # Errors
/// - **400 Bad Request**: unparsable payload, or a body `key` that differs
///   from the path key
/// - **404 Not Found**: no skill under `key`
pub async fn replace_skill(
    key: String,
    body: Bytes,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let update: SkillUpdateRequest = parse_json(&body)?;
    update
        .check_key(&key)
        .map_err(|e| RouterError::BadRequest(e.to_string()))?;

    let skill = dispatch(state, |response| ApiRequest::Replace {
        key,
        update,
        response,
    })
    .await?;
    json_response(200, &success_response(skill))
}

/// Updates a single field.
///
/// # Endpoint
/// `PATCH /api/v1/skills/{key}/actions/{name|description|logo|tags}`
///
/// # Request Body
/// The field as the only member, e.g. `{"tags": ["test tags"]}`.
///
/// # Errors
/// - **400 Bad Request**: member missing or of the wrong type
/// - **404 Not Found**: no skill under `key`
pub async fn patch_skill(
    key: String,
    field: SkillField,
    body: Bytes,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let patch = field
        .parse_patch(&body)
        .map_err(|e| RouterError::BadRequest(format!("Can't bind payload: {}", e)))?;

    let skill = dispatch(state, |response| ApiRequest::Patch {
        key,
        patch,
        response,
    })
    .await?;
    json_response(200, &success_response(skill))
}

/// Deletes a skill.
///
/// # Endpoint
/// `DELETE /api/v1/skills/{key}`
///
/// # Response
/// - **200 OK**: `{"status":"success","message":"Skill deleted"}`
///
/// # Errors
/// - **404 Not Found**: no skill under `key`
pub async fn delete_skill(key: String, state: &AppState) -> Result<Response<Bytes>, RouterError> {
    dispatch(state, |response| ApiRequest::Delete { key, response }).await?;
    json_response(200, &success_message("Skill deleted"))
}
