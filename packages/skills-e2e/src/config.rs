//! Verifier configuration.

use skills_core::config::PostgresConfig;

/// Where the verifier sends requests and which database it seeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierConfig {
    /// Service root, without a trailing `/api/v1`
    pub base_url: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Database seeded by the fixture
    pub postgres: PostgresConfig,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout_ms: 10000,
            postgres: PostgresConfig::default(),
        }
    }
}

impl VerifierConfig {
    /// Config pointing at `base_url` with every other value defaulted.
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}
