//! Postgres-backed skill store.

use std::time::Duration;

use postgres::{NoTls, Row};
use r2d2::{Pool, PooledConnection};
use r2d2_postgres::PostgresConnectionManager;

use super::{CreateOutcome, SkillStore};
use crate::config::PostgresConfig;
use crate::error::{Result, SkillError};
use crate::skill::{Skill, SkillPatch, SkillUpdateRequest};

/// Column list shared by every query that returns a skill.
const SKILL_COLUMNS: &str = "key, name, description, logo, tags";

/// Table definition; defaults match the create request defaults.
const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS skill (
    key TEXT PRIMARY KEY,
    name TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    logo TEXT NOT NULL DEFAULT '',
    tags TEXT [] NOT NULL DEFAULT '{}'
);";

type Manager = PostgresConnectionManager<NoTls>;

/// Skill store over a pool of blocking Postgres connections.
///
/// The `postgres` client drives its own runtime internally, so this store
/// must be built and called from plain threads, never from inside a tokio
/// task.
pub struct PostgresSkillStore {
    pool: Option<Pool<Manager>>,
}

impl Drop for PostgresSkillStore {
    fn drop(&mut self) {
        // Closing pooled clients blocks on the driver's runtime, which panics
        // inside a tokio context.
        if let Some(pool) = self.pool.take() {
            if std::thread::spawn(move || drop(pool)).join().is_err() {
                tracing::error!("Postgres pool shutdown panicked");
            }
        }
    }
}

impl PostgresSkillStore {
    /// Connects to Postgres and creates the `skill` table when missing.
    pub fn connect(config: &PostgresConfig) -> Result<Self> {
        let manager = PostgresConnectionManager::new(config.to_pg_config(), NoTls);
        let pool = Pool::builder()
            .max_size(config.max_connections.max(1))
            .connection_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build(manager)?;
        let store = Self { pool: Some(pool) };
        store.migrate()?;
        tracing::info!("Connected skill store to {}", config.redacted());
        Ok(store)
    }

    fn connection(&self) -> Result<PooledConnection<Manager>> {
        let pool = self
            .pool
            .as_ref()
            .ok_or_else(|| SkillError::Storage("postgres store closed".to_string()))?;
        pool.get().map_err(|e| {
            tracing::warn!("No pooled connection available: {}", e);
            SkillError::Timeout
        })
    }

    fn migrate(&self) -> Result<()> {
        self.connection()?.batch_execute(CREATE_TABLE)?;
        Ok(())
    }
}

fn row_to_skill(row: &Row) -> Result<Skill> {
    Ok(Skill {
        key: row.try_get(0)?,
        name: row.try_get(1)?,
        description: row.try_get(2)?,
        logo: row.try_get(3)?,
        tags: row.try_get(4)?,
    })
}

impl SkillStore for PostgresSkillStore {
    fn get(&self, key: &str) -> Result<Skill> {
        let sql = format!("SELECT {} FROM skill WHERE key = $1", SKILL_COLUMNS);
        let row = self
            .connection()?
            .query_opt(sql.as_str(), &[&key])?
            .ok_or_else(|| SkillError::not_found(key))?;
        row_to_skill(&row)
    }

    fn list(&self) -> Result<Vec<Skill>> {
        let sql = format!("SELECT {} FROM skill ORDER BY key", SKILL_COLUMNS);
        self.connection()?
            .query(sql.as_str(), &[])?
            .iter()
            .map(row_to_skill)
            .collect()
    }

    fn create(&self, skill: Skill) -> Result<CreateOutcome> {
        let insert = format!(
            "INSERT INTO skill ({cols}) VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (key) DO NOTHING RETURNING {cols}",
            cols = SKILL_COLUMNS
        );
        let mut conn = self.connection()?;
        let inserted = conn.query_opt(
            insert.as_str(),
            &[
                &skill.key,
                &skill.name,
                &skill.description,
                &skill.logo,
                &skill.tags,
            ],
        )?;
        if let Some(row) = inserted {
            return Ok(CreateOutcome::Created(row_to_skill(&row)?));
        }

        let select = format!("SELECT {} FROM skill WHERE key = $1", SKILL_COLUMNS);
        let row = conn
            .query_opt(select.as_str(), &[&skill.key])?
            .ok_or_else(|| SkillError::not_found(&skill.key))?;
        Ok(CreateOutcome::Existing(row_to_skill(&row)?))
    }

    fn replace(&self, key: &str, update: SkillUpdateRequest) -> Result<Skill> {
        let sql = format!(
            "UPDATE skill SET name = $1, description = $2, logo = $3, tags = $4 \
             WHERE key = $5 RETURNING {}",
            SKILL_COLUMNS
        );
        let row = self
            .connection()?
            .query_opt(
                sql.as_str(),
                &[
                    &update.name,
                    &update.description,
                    &update.logo,
                    &update.tags,
                    &key,
                ],
            )?
            .ok_or_else(|| SkillError::not_found(key))?;
        row_to_skill(&row)
    }

    fn patch(&self, key: &str, patch: SkillPatch) -> Result<Skill> {
        // Column names come from the closed SkillField set, never from input.
        let sql = format!(
            "UPDATE skill SET {} = $1 WHERE key = $2 RETURNING {}",
            patch.field().as_str(),
            SKILL_COLUMNS
        );
        let mut conn = self.connection()?;
        let row = match &patch {
            SkillPatch::Name(value) | SkillPatch::Description(value) | SkillPatch::Logo(value) => {
                conn.query_opt(sql.as_str(), &[value, &key])?
            }
            SkillPatch::Tags(tags) => conn.query_opt(sql.as_str(), &[tags, &key])?,
        };
        let row = row.ok_or_else(|| SkillError::not_found(key))?;
        row_to_skill(&row)
    }

    fn delete(&self, key: &str) -> Result<()> {
        let removed = self
            .connection()?
            .execute("DELETE FROM skill WHERE key = $1", &[&key])?;
        if removed == 0 {
            return Err(SkillError::not_found(key));
        }
        Ok(())
    }

    fn clear(&self) -> Result<u64> {
        Ok(self.connection()?.execute("DELETE FROM skill", &[])?)
    }
}
