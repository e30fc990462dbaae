//! Envelope and skill-shape checks applied to API replies.
//!
//! Only the 2xx / non-2xx class of a status is asserted; exact codes are
//! the service's choice.

use std::fmt::Debug;

use serde_json::Value;
use skills_core::Skill;

use crate::client::ApiReply;
use crate::error::CaseFailure;

const SKILL_STRING_FIELDS: [&str; 4] = ["key", "name", "description", "logo"];

/// Successful reply whose `data` is one skill.
pub fn expect_success_skill(reply: &ApiReply) -> Result<Skill, CaseFailure> {
    let data = expect_success_data(reply)?;
    expect_skill_shape(data)?;
    serde_json::from_value(data.clone())
        .map_err(|e| CaseFailure::new(format!("data is not a skill: {}", e)))
}

/// Successful reply whose `data` is an array of skills.
pub fn expect_success_list(reply: &ApiReply) -> Result<Vec<Skill>, CaseFailure> {
    let data = expect_success_data(reply)?;
    let items = data
        .as_array()
        .ok_or_else(|| CaseFailure::new(format!("data is not an array: {}", data)))?;
    for item in items {
        expect_skill_shape(item)?;
    }
    serde_json::from_value(data.clone())
        .map_err(|e| CaseFailure::new(format!("data is not a skill list: {}", e)))
}

/// Successful reply carrying `message` and no skill data.
pub fn expect_success_message(reply: &ApiReply, message: &str) -> Result<(), CaseFailure> {
    expect_success_status(reply)?;
    expect_field("message", reply.body.get("message"), Some(&Value::from(message)))
}

/// Failed reply with an error envelope.
///
/// When `message` is given the envelope message must equal it. Returns the
/// envelope message.
pub fn expect_error(reply: &ApiReply, message: Option<&str>) -> Result<String, CaseFailure> {
    if reply.is_success() {
        return Err(CaseFailure::new(format!(
            "expected a non-2xx status, got {} with body {}",
            reply.status, reply.body
        )));
    }
    expect_envelope_status(reply, "error")?;

    let actual = reply
        .body
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| CaseFailure::new(format!("error envelope has no message: {}", reply.body)))?;
    if let Some(expected) = message {
        expect_field("message", actual, expected)?;
    }
    Ok(actual.to_string())
}

/// Checks that `value` is an object with string `key`, `name`,
/// `description` and `logo` members and a string array `tags`.
pub fn expect_skill_shape(value: &Value) -> Result<(), CaseFailure> {
    let object = value
        .as_object()
        .ok_or_else(|| CaseFailure::new(format!("skill is not an object: {}", value)))?;

    for field in SKILL_STRING_FIELDS {
        match object.get(field) {
            Some(Value::String(_)) => {}
            other => {
                return Err(CaseFailure::new(format!(
                    "skill field '{}' should be a string, got {:?}",
                    field, other
                )))
            }
        }
    }

    match object.get("tags") {
        Some(Value::Array(tags)) if tags.iter().all(Value::is_string) => Ok(()),
        other => Err(CaseFailure::new(format!(
            "skill field 'tags' should be an array of strings, got {:?}",
            other
        ))),
    }
}

/// Compares one observed value with the expected one.
pub fn expect_field<T: PartialEq + Debug>(
    what: &str,
    actual: T,
    expected: T,
) -> Result<(), CaseFailure> {
    if actual == expected {
        Ok(())
    } else {
        Err(CaseFailure::new(format!(
            "{}: expected {:?}, got {:?}",
            what, expected, actual
        )))
    }
}

fn expect_success_status(reply: &ApiReply) -> Result<(), CaseFailure> {
    if !reply.is_success() {
        return Err(CaseFailure::new(format!(
            "expected a 2xx status, got {} with body {}",
            reply.status, reply.body
        )));
    }
    expect_envelope_status(reply, "success")
}

fn expect_success_data(reply: &ApiReply) -> Result<&Value, CaseFailure> {
    expect_success_status(reply)?;
    reply
        .body
        .get("data")
        .ok_or_else(|| CaseFailure::new(format!("success envelope has no data: {}", reply.body)))
}

fn expect_envelope_status(reply: &ApiReply, status: &str) -> Result<(), CaseFailure> {
    expect_field(
        "envelope status",
        reply.body.get("status").and_then(Value::as_str),
        Some(status),
    )
}
