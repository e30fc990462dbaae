//! Database seeding and cleanup around a suite run.

use postgres::{Client, NoTls};
use skills_core::config::PostgresConfig;
use skills_core::{CreateOutcome, SharedSkillStore, Skill};

use crate::error::FixtureError;

/// Key of the seeded skill.
pub const SEED_KEY: &str = "go";

const INSERT_SEED: &str =
    "INSERT INTO skill (key, name, description, logo, tags) VALUES ($1, $2, $3, $4, $5)";
const DELETE_ALL: &str = "DELETE FROM skill";

/// Skill present in the database while the suite runs.
pub fn seed_skill() -> Skill {
    Skill {
        key: SEED_KEY.to_string(),
        name: "test".to_string(),
        description: "testDescription".to_string(),
        logo: "testLogo".to_string(),
        tags: vec!["programming language".to_string(), "system".to_string()],
    }
}

/// Seed/cleanup pair run once before and once after a suite.
pub trait SkillFixture {
    /// Inserts the seed skill. Must complete before any case runs.
    fn insert_data(&mut self) -> Result<(), FixtureError>;

    /// Deletes every skill and releases the fixture's resources.
    fn delete_data(&mut self) -> Result<(), FixtureError>;
}

/// Fixture writing straight to the service's Postgres database.
///
/// Owns its connection for the lifetime of a run. Must not be used from
/// inside an async runtime; the `postgres` client blocks.
pub struct PostgresFixture {
    config: PostgresConfig,
    client: Option<Client>,
}

impl PostgresFixture {
    pub fn new(config: PostgresConfig) -> Self {
        Self {
            config,
            client: None,
        }
    }

    /// Returns true while a connection is held.
    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    fn client(&mut self) -> Result<&mut Client, FixtureError> {
        match self.client {
            Some(ref mut client) => Ok(client),
            None => {
                let target = self.config.redacted();
                tracing::debug!(db = %target, "fixture connecting");
                let client = self
                    .config
                    .to_pg_config()
                    .connect(NoTls)
                    .map_err(|source| FixtureError::Connect { target, source })?;
                Ok(self.client.insert(client))
            }
        }
    }
}

impl SkillFixture for PostgresFixture {
    fn insert_data(&mut self) -> Result<(), FixtureError> {
        let skill = seed_skill();
        let client = self.client()?;
        client.execute(
            INSERT_SEED,
            &[
                &skill.key,
                &skill.name,
                &skill.description,
                &skill.logo,
                &skill.tags,
            ],
        )?;
        tracing::info!(key = %skill.key, "seed skill inserted");
        Ok(())
    }

    fn delete_data(&mut self) -> Result<(), FixtureError> {
        let deleted = self.client()?.execute(DELETE_ALL, &[])?;
        tracing::info!(deleted, "skill table cleared");

        if let Some(client) = self.client.take() {
            client.close()?;
        }
        Ok(())
    }
}

/// Fixture over any [`SkillStore`](skills_core::SkillStore).
///
/// Used when the service under test shares a store with the verifier, as
/// an in-process server does.
pub struct StoreFixture {
    store: SharedSkillStore,
}

impl StoreFixture {
    pub fn new(store: SharedSkillStore) -> Self {
        Self { store }
    }
}

impl SkillFixture for StoreFixture {
    fn insert_data(&mut self) -> Result<(), FixtureError> {
        match self.store.create(seed_skill())? {
            CreateOutcome::Created(skill) => {
                tracing::info!(key = %skill.key, "seed skill inserted");
                Ok(())
            }
            CreateOutcome::Existing(skill) => Err(FixtureError::SeedExists { key: skill.key }),
        }
    }

    fn delete_data(&mut self) -> Result<(), FixtureError> {
        let deleted = self.store.clear()?;
        tracing::info!(deleted, "skill store cleared");
        Ok(())
    }
}
