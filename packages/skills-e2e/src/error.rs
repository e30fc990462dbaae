//! Fixture and verifier errors.

use skills_core::SkillError;
use thiserror::Error;

use crate::contract::SuiteReport;

/// Seeding or cleanup failure.
#[derive(Error, Debug)]
pub enum FixtureError {
    /// Could not open the database connection
    #[error("failed to connect to {target}: {source}")]
    Connect {
        target: String,
        #[source]
        source: postgres::Error,
    },

    /// Statement failed on an open connection
    #[error("fixture query failed: {0}")]
    Query(#[from] postgres::Error),

    /// Store-backed fixture failed
    #[error("fixture store failed: {0}")]
    Store(#[from] SkillError),

    /// Seed row was already present
    #[error("seed skill '{key}' already exists")]
    SeedExists { key: String },
}

/// Errors that stop a suite run or prevent one from starting.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// Fixture insert failed; no case was run
    #[error("fixture setup failed: {0}")]
    FixtureSetup(#[source] FixtureError),

    /// Every case ran but the fixture delete failed
    #[error("fixture teardown failed: {source}")]
    FixtureTeardown {
        #[source]
        source: FixtureError,
        report: Box<SuiteReport>,
    },

    /// Request never produced a response
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response body is not JSON
    #[error("response from {url} (status {status}) is not JSON: {source}")]
    Decode {
        url: String,
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// A single case's assertion failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct CaseFailure {
    pub reason: String,
}

impl CaseFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<VerifyError> for CaseFailure {
    fn from(err: VerifyError) -> Self {
        CaseFailure::new(err.to_string())
    }
}
