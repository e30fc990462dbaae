//! Contract suite for the skills REST API.
//!
//! A [`SkillFixture`] seeds the database before the suite and clears it
//! afterwards; [`ContractSuite`] drives a live service through
//! [`SkillsClient`] and records one [`CaseOutcome`] per case.

pub mod assertions;
pub mod client;
pub mod config;
pub mod contract;
pub mod error;
pub mod fixture;

pub use client::{ApiReply, SkillsClient};
pub use config::VerifierConfig;
pub use contract::{CaseOutcome, ContractCase, ContractSuite, SuiteReport};
pub use error::{CaseFailure, FixtureError, VerifyError};
pub use fixture::{seed_skill, PostgresFixture, SkillFixture, StoreFixture, SEED_KEY};
