//! Skill data model and storage backends.
//!
//! Holds the `Skill` entity, the request payloads accepted by the skills
//! API, key validation, and the `SkillStore` trait with its Postgres and
//! in-memory implementations.

pub mod config;
pub mod error;
pub mod skill;
pub mod store;
pub mod validation;

pub use error::{Result, SkillError};
pub use skill::{
    DescriptionUpdateRequest, LogoUpdateRequest, NameUpdateRequest, Skill, SkillCreateRequest,
    SkillField, SkillPatch, SkillUpdateRequest, TagsUpdateRequest,
};
pub use store::{CreateOutcome, MemorySkillStore, PostgresSkillStore, SharedSkillStore, SkillStore};
