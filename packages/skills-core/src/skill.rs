//! Skill entity and request payloads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkillError};
use crate::validation::validate_key;

/// A named technology or tool exposed by the skills API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Skill {
    /// Applies a single-field patch in place.
    pub fn apply(&mut self, patch: SkillPatch) {
        match patch {
            SkillPatch::Name(name) => self.name = name,
            SkillPatch::Description(description) => self.description = description,
            SkillPatch::Logo(logo) => self.logo = logo,
            SkillPatch::Tags(tags) => self.tags = tags,
        }
    }

    /// Replaces every field except `key`.
    pub fn replace(&mut self, update: SkillUpdateRequest) {
        self.name = update.name;
        self.description = update.description;
        self.logo = update.logo;
        self.tags = update.tags;
    }
}

/// Body of `POST /api/v1/skills`.
///
/// Only `key` is required; the other fields default to empty values, the
/// same defaults the `skill` table declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCreateRequest {
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl SkillCreateRequest {
    /// Validates the key and turns the request into a storable skill.
    pub fn into_skill(self) -> Result<Skill> {
        validate_key(&self.key)?;
        Ok(Skill {
            key: self.key,
            name: self.name,
            description: self.description,
            logo: self.logo,
            tags: self.tags,
        })
    }
}

/// Body of `PUT /api/v1/skills/{key}`.
///
/// `key` may be echoed back by clients; when present it must equal the
/// key in the path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl SkillUpdateRequest {
    /// Checks the optional body key against the path key.
    pub fn check_key(&self, path_key: &str) -> Result<()> {
        match &self.key {
            Some(body_key) if body_key != path_key => Err(SkillError::KeyMismatch {
                path: path_key.to_string(),
                body: body_key.clone(),
            }),
            _ => Ok(()),
        }
    }
}

/// Body of `PATCH /api/v1/skills/{key}/actions/name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameUpdateRequest {
    pub name: String,
}

/// Body of `PATCH /api/v1/skills/{key}/actions/description`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionUpdateRequest {
    pub description: String,
}

/// Body of `PATCH /api/v1/skills/{key}/actions/logo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoUpdateRequest {
    pub logo: String,
}

/// Body of `PATCH /api/v1/skills/{key}/actions/tags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagsUpdateRequest {
    pub tags: Vec<String>,
}

/// Mutable skill fields addressable through `/actions/{field}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkillField {
    Name,
    Description,
    Logo,
    Tags,
}

impl SkillField {
    pub const ALL: [SkillField; 4] = [
        SkillField::Name,
        SkillField::Description,
        SkillField::Logo,
        SkillField::Tags,
    ];

    /// Path segment and JSON member name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillField::Name => "name",
            SkillField::Description => "description",
            SkillField::Logo => "logo",
            SkillField::Tags => "tags",
        }
    }

    /// Parses a patch body for this field.
    pub fn parse_patch(&self, body: &[u8]) -> serde_json::Result<SkillPatch> {
        Ok(match self {
            SkillField::Name => {
                SkillPatch::Name(serde_json::from_slice::<NameUpdateRequest>(body)?.name)
            }
            SkillField::Description => SkillPatch::Description(
                serde_json::from_slice::<DescriptionUpdateRequest>(body)?.description,
            ),
            SkillField::Logo => {
                SkillPatch::Logo(serde_json::from_slice::<LogoUpdateRequest>(body)?.logo)
            }
            SkillField::Tags => {
                SkillPatch::Tags(serde_json::from_slice::<TagsUpdateRequest>(body)?.tags)
            }
        })
    }
}

impl fmt::Display for SkillField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        SkillField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("unknown skill field '{}'", s))
    }
}

/// A single-field update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillPatch {
    Name(String),
    Description(String),
    Logo(String),
    Tags(Vec<String>),
}

impl SkillPatch {
    pub fn field(&self) -> SkillField {
        match self {
            SkillPatch::Name(_) => SkillField::Name,
            SkillPatch::Description(_) => SkillField::Description,
            SkillPatch::Logo(_) => SkillField::Logo,
            SkillPatch::Tags(_) => SkillField::Tags,
        }
    }
}
