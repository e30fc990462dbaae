//! Skill storage backends.

mod memory;
mod postgres_store;

use std::sync::Arc;

use crate::error::Result;
use crate::skill::{Skill, SkillPatch, SkillUpdateRequest};

pub use self::memory::MemorySkillStore;
pub use self::postgres_store::PostgresSkillStore;

/// Shared handle to a store.
pub type SharedSkillStore = Arc<dyn SkillStore>;

/// Result of a create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// A new row was stored
    Created(Skill),
    /// The key was already taken; carries the stored record, untouched
    Existing(Skill),
}

impl CreateOutcome {
    pub fn into_skill(self) -> Skill {
        match self {
            CreateOutcome::Created(skill) | CreateOutcome::Existing(skill) => skill,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, CreateOutcome::Created(_))
    }
}

/// Persistent collection of skills keyed by `key`.
///
/// Every method that addresses a single key returns
/// [`SkillError::NotFound`](crate::SkillError::NotFound) when nothing is
/// stored under it.
pub trait SkillStore: Send + Sync {
    /// Fetches one skill.
    fn get(&self, key: &str) -> Result<Skill>;

    /// Lists every skill ordered by key.
    fn list(&self) -> Result<Vec<Skill>>;

    /// Stores a new skill unless the key is taken.
    fn create(&self, skill: Skill) -> Result<CreateOutcome>;

    /// Replaces every field except `key`.
    fn replace(&self, key: &str, update: SkillUpdateRequest) -> Result<Skill>;

    /// Updates a single field.
    fn patch(&self, key: &str, patch: SkillPatch) -> Result<Skill>;

    /// Removes one skill.
    fn delete(&self, key: &str) -> Result<()>;

    /// Removes every skill, returning how many rows were deleted.
    fn clear(&self) -> Result<u64>;
}
