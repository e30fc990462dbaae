//! Key validation.

use crate::error::{Result, SkillError};

/// Longest key accepted on create.
pub const MAX_KEY_LEN: usize = 128;

/// Validates a skill key before it is stored.
///
/// Keys are used verbatim as a path segment, so they must be non-blank,
/// free of `/` and surrounding whitespace, and bounded in length.
pub fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(SkillError::InvalidKey {
            reason: "key is required".to_string(),
        });
    }
    if key.trim() != key {
        return Err(SkillError::InvalidKey {
            reason: "key must not start or end with whitespace".to_string(),
        });
    }
    if key.contains('/') {
        return Err(SkillError::InvalidKey {
            reason: "key must not contain '/'".to_string(),
        });
    }
    if key.len() > MAX_KEY_LEN {
        return Err(SkillError::InvalidKey {
            reason: format!("key exceeds {} bytes", MAX_KEY_LEN),
        });
    }
    Ok(())
}
