//! In-memory skill store.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::{CreateOutcome, SkillStore};
use crate::error::{Result, SkillError};
use crate::skill::{Skill, SkillPatch, SkillUpdateRequest};

/// Skill store backed by an ordered map.
///
/// Used by the reference server when no database is configured and by the
/// in-process contract tests.
#[derive(Debug, Default)]
pub struct MemorySkillStore {
    skills: RwLock<BTreeMap<String, Skill>>,
}

impl MemorySkillStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored skills.
    pub fn len(&self) -> usize {
        self.skills.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.read().is_empty()
    }
}

impl SkillStore for MemorySkillStore {
    fn get(&self, key: &str) -> Result<Skill> {
        self.skills
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| SkillError::not_found(key))
    }

    fn list(&self) -> Result<Vec<Skill>> {
        Ok(self.skills.read().values().cloned().collect())
    }

    fn create(&self, skill: Skill) -> Result<CreateOutcome> {
        let mut skills = self.skills.write();
        if let Some(existing) = skills.get(&skill.key) {
            return Ok(CreateOutcome::Existing(existing.clone()));
        }
        skills.insert(skill.key.clone(), skill.clone());
        Ok(CreateOutcome::Created(skill))
    }

    fn replace(&self, key: &str, update: SkillUpdateRequest) -> Result<Skill> {
        let mut skills = self.skills.write();
        let skill = skills.get_mut(key).ok_or_else(|| SkillError::not_found(key))?;
        skill.replace(update);
        Ok(skill.clone())
    }

    fn patch(&self, key: &str, patch: SkillPatch) -> Result<Skill> {
        let mut skills = self.skills.write();
        let skill = skills.get_mut(key).ok_or_else(|| SkillError::not_found(key))?;
        skill.apply(patch);
        Ok(skill.clone())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.skills
            .write()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| SkillError::not_found(key))
    }

    fn clear(&self) -> Result<u64> {
        let mut skills = self.skills.write();
        let removed = skills.len() as u64;
        skills.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(key: &str, name: &str) -> Skill {
        Skill {
            key: key.to_string(),
            name: name.to_string(),
            description: format!("{} description", name),
            logo: format!("{}.svg", key),
            tags: vec!["programming language".to_string()],
        }
    }

    #[test]
    fn test_create_then_get() {
        let store = MemorySkillStore::new();
        let outcome = store.create(skill("go", "Go")).unwrap();
        assert!(outcome.is_created());
        assert_eq!(store.get("go").unwrap(), skill("go", "Go"));
    }

    #[test]
    fn test_duplicate_create_keeps_existing_record() {
        let store = MemorySkillStore::new();
        store.create(skill("go", "Go")).unwrap();

        let outcome = store.create(skill("go", "Python")).unwrap();
        assert_eq!(outcome, CreateOutcome::Existing(skill("go", "Go")));
        assert_eq!(store.get("go").unwrap().name, "Go");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_list_is_ordered_by_key() {
        let store = MemorySkillStore::new();
        store.create(skill("rust", "Rust")).unwrap();
        store.create(skill("go", "Go")).unwrap();
        store.create(skill("python", "Python")).unwrap();

        let keys: Vec<String> = store.list().unwrap().into_iter().map(|s| s.key).collect();
        assert_eq!(keys, vec!["go", "python", "rust"]);
    }

    #[test]
    fn test_patch_changes_only_target_field() {
        let store = MemorySkillStore::new();
        store.create(skill("go", "Go")).unwrap();

        let patched = store
            .patch("go", SkillPatch::Name("golang patch".to_string()))
            .unwrap();

        let mut expected = skill("go", "Go");
        expected.name = "golang patch".to_string();
        assert_eq!(patched, expected);
        assert_eq!(store.get("go").unwrap(), expected);
    }

    #[test]
    fn test_missing_key_errors() {
        let store = MemorySkillStore::new();
        assert_eq!(store.get("kotlin"), Err(SkillError::not_found("kotlin")));
        assert_eq!(
            store.patch("kotlin", SkillPatch::Logo("x".to_string())),
            Err(SkillError::not_found("kotlin"))
        );
        assert_eq!(
            store.replace("kotlin", SkillUpdateRequest::default()),
            Err(SkillError::not_found("kotlin"))
        );
        assert_eq!(store.delete("kotlin"), Err(SkillError::not_found("kotlin")));
    }

    #[test]
    fn test_delete_and_clear() {
        let store = MemorySkillStore::new();
        store.create(skill("go", "Go")).unwrap();
        store.create(skill("rust", "Rust")).unwrap();

        store.delete("go").unwrap();
        assert!(store.get("go").is_err());

        assert_eq!(store.clear().unwrap(), 1);
        assert!(store.is_empty());
    }
}
