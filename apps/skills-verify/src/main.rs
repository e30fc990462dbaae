//! Contract suite runner.
//!
//! Seeds the service's Postgres database, runs every contract case against
//! the service over HTTP, clears the database, and exits non-zero when any
//! case failed.

use std::process::ExitCode;

use clap::Parser;
use skills_core::config::PostgresConfig;
use skills_e2e::{
    ContractSuite, PostgresFixture, SkillsClient, SuiteReport, VerifierConfig, VerifyError,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for the contract suite runner.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Root URL of the service under test
    #[arg(long, env = "SKILLS_BASE_URL", default_value = "http://127.0.0.1:8080")]
    base_url: String,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "SKILLS_VERIFY_TIMEOUT_MS", default_value_t = 10000)]
    timeout_ms: u64,

    /// Postgres host
    #[arg(long, env = "SKILLS_DB_HOST", default_value = "127.0.0.1")]
    db_host: String,

    /// Postgres port
    #[arg(long, env = "SKILLS_DB_PORT", default_value_t = 5432)]
    db_port: u16,

    /// Postgres user
    #[arg(long, env = "SKILLS_DB_USER", default_value = "postgres")]
    db_user: String,

    /// Postgres password
    #[arg(long, env = "SKILLS_DB_PASSWORD", default_value = "postgres", hide_env_values = true)]
    db_password: String,

    /// Postgres database
    #[arg(long, env = "SKILLS_DB_NAME", default_value = "app")]
    db_name: String,

    /// Print the case names and exit
    #[arg(long)]
    list: bool,
}

impl Args {
    fn verifier_config(&self) -> VerifierConfig {
        VerifierConfig {
            base_url: self.base_url.clone(),
            timeout_ms: self.timeout_ms,
            postgres: PostgresConfig {
                host: self.db_host.clone(),
                port: self.db_port,
                user: self.db_user.clone(),
                password: self.db_password.clone(),
                database: self.db_name.clone(),
                ..PostgresConfig::default()
            },
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false))
        .init();
}

fn summarize(report: &SuiteReport) {
    for outcome in report.failures() {
        if let Some(failure) = &outcome.failure {
            tracing::error!("{}: {}", outcome.name, failure);
        }
    }
    tracing::info!(
        "{} passed, {} failed in {:.2}s",
        report.passed(),
        report.failed(),
        report.elapsed.as_secs_f64()
    );
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_tracing();

    let suite = ContractSuite::standard();
    if args.list {
        for case in suite.cases() {
            println!("{}", case.name());
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = args.verifier_config();
    tracing::info!(
        base_url = %config.base_url,
        db = %config.postgres.redacted(),
        cases = suite.cases().len(),
        "Running contract suite"
    );

    let client = SkillsClient::new(&config)?;
    let mut fixture = PostgresFixture::new(config.postgres.clone());

    match suite.run(&client, &mut fixture) {
        Ok(report) => {
            summarize(&report);
            Ok(if report.all_passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Err(VerifyError::FixtureTeardown { source, report }) => {
            summarize(&report);
            tracing::error!("Fixture teardown failed: {}", source);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}
