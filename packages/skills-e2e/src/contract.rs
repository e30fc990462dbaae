//! Ordered contract cases and the suite runner.

use std::time::{Duration, Instant};

use skills_core::{Skill, SkillCreateRequest, SkillPatch, SkillUpdateRequest};

use crate::assertions::{
    expect_error, expect_field, expect_success_list, expect_success_message,
    expect_success_skill,
};
use crate::client::SkillsClient;
use crate::error::{CaseFailure, VerifyError};
use crate::fixture::{SkillFixture, SEED_KEY};

/// Key never present in the seeded database.
const MISSING_KEY: &str = "kotlin";

type CaseFn = Box<dyn Fn(&SkillsClient) -> Result<(), CaseFailure>>;

/// One named check against a live service.
pub struct ContractCase {
    name: String,
    check: CaseFn,
}

impl ContractCase {
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&SkillsClient) -> Result<(), CaseFailure> + 'static,
    {
        Self {
            name: name.into(),
            check: Box::new(check),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, client: &SkillsClient) -> CaseOutcome {
        let started = Instant::now();
        let result = (self.check)(client);
        CaseOutcome {
            name: self.name.clone(),
            failure: result.err(),
            elapsed: started.elapsed(),
        }
    }
}

/// Result of one case.
#[derive(Debug, Clone)]
pub struct CaseOutcome {
    pub name: String,
    pub failure: Option<CaseFailure>,
    pub elapsed: Duration,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Outcomes of a whole run, in execution order.
#[derive(Debug, Clone, Default)]
pub struct SuiteReport {
    pub outcomes: Vec<CaseOutcome>,
    pub elapsed: Duration,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }
}

/// Ordered list of contract cases.
pub struct ContractSuite {
    cases: Vec<ContractCase>,
}

impl ContractSuite {
    pub fn new(cases: Vec<ContractCase>) -> Self {
        Self { cases }
    }

    /// The standard skills API contract.
    ///
    /// Cases share one database and run in order: later cases expect the
    /// writes of earlier ones.
    pub fn standard() -> Self {
        let mut cases = vec![
            ContractCase::new("GET /api/v1/skills/{key} returns the seeded skill", get_existing),
            ContractCase::new("GET /api/v1/skills/{key} on a missing key is an error", get_missing),
            ContractCase::new("GET /api/v1/skills lists skills", list_skills),
            ContractCase::new("POST /api/v1/skills creates a skill", create_skill),
            ContractCase::new("GET /api/v1/skills/{key} returns the created skill", get_created),
            ContractCase::new(
                "POST /api/v1/skills with an existing key keeps the stored skill",
                create_duplicate,
            ),
            ContractCase::new("PUT /api/v1/skills/{key} replaces a skill", replace_existing),
            ContractCase::new("PUT /api/v1/skills/{key} on a missing key is an error", replace_missing),
        ];

        let patches = [
            SkillPatch::Name("golang patch".to_string()),
            SkillPatch::Description("golang description".to_string()),
            SkillPatch::Logo("newlogoPath".to_string()),
            SkillPatch::Tags(vec!["test tags".to_string()]),
        ];
        for patch in patches {
            let field = patch.field();
            let missing = patch.clone();
            cases.push(ContractCase::new(
                format!("PATCH /api/v1/skills/{{key}}/actions/{} updates the field", field),
                move |client| patch_existing(client, &patch),
            ));
            cases.push(ContractCase::new(
                format!("PATCH /api/v1/skills/{{key}}/actions/{} on a missing key is an error", field),
                move |client| patch_missing(client, &missing),
            ));
        }

        cases.push(ContractCase::new("DELETE /api/v1/skills/{key} deletes a skill", delete_existing));
        cases.push(ContractCase::new(
            "DELETE /api/v1/skills/{key} on a missing key is an error",
            delete_missing,
        ));

        Self::new(cases)
    }

    pub fn cases(&self) -> &[ContractCase] {
        &self.cases
    }

    /// Seeds through `fixture`, runs every case, then clears the data.
    ///
    /// A failed insert stops the run before any case executes; the fixture
    /// still gets a delete so a partial seed is not left behind. A failed
    /// case does not stop the run.
    pub fn run(
        &self,
        client: &SkillsClient,
        fixture: &mut dyn SkillFixture,
    ) -> Result<SuiteReport, VerifyError> {
        if let Err(e) = fixture.insert_data() {
            if let Err(cleanup) = fixture.delete_data() {
                tracing::warn!("Fixture cleanup after failed insert failed: {}", cleanup);
            }
            return Err(VerifyError::FixtureSetup(e));
        }

        let started = Instant::now();
        let mut report = SuiteReport::default();
        for case in &self.cases {
            let outcome = case.run(client);
            match &outcome.failure {
                None => tracing::info!(
                    case = %outcome.name,
                    elapsed_ms = outcome.elapsed.as_millis() as u64,
                    "PASS"
                ),
                Some(failure) => tracing::error!(case = %outcome.name, reason = %failure, "FAIL"),
            }
            report.outcomes.push(outcome);
        }
        report.elapsed = started.elapsed();

        tracing::info!(
            passed = report.passed(),
            failed = report.failed(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "contract suite finished"
        );

        match fixture.delete_data() {
            Ok(()) => Ok(report),
            Err(source) => Err(VerifyError::FixtureTeardown {
                source,
                report: Box::new(report),
            }),
        }
    }
}

fn python_request() -> SkillCreateRequest {
    SkillCreateRequest {
        key: "python".to_string(),
        name: "Python".to_string(),
        description: "Python is an interpreted, high-level, general-purpose programming language."
            .to_string(),
        logo: "https://upload.wikimedia.org/wikipedia/commons/c/c3/Python-logo-notext.svg"
            .to_string(),
        tags: vec!["programming language".to_string(), "scripting".to_string()],
    }
}

fn go2_update() -> SkillUpdateRequest {
    SkillUpdateRequest {
        key: None,
        name: "go2".to_string(),
        description: "go2 is the latest version of Python programming language.".to_string(),
        logo: "https://upload.wikimedia.org/wikipedia/commons/c/c3/Python-logo-notext.svg"
            .to_string(),
        tags: vec!["data".to_string()],
    }
}

fn fetch(client: &SkillsClient, key: &str) -> Result<Skill, CaseFailure> {
    expect_success_skill(&client.get_skill(key)?)
}

fn get_existing(client: &SkillsClient) -> Result<(), CaseFailure> {
    let skill = fetch(client, SEED_KEY)?;
    expect_field("key", skill.key.as_str(), SEED_KEY)
}

fn get_missing(client: &SkillsClient) -> Result<(), CaseFailure> {
    expect_error(&client.get_skill("java")?, Some("Skill not found")).map(|_| ())
}

fn list_skills(client: &SkillsClient) -> Result<(), CaseFailure> {
    let skills = expect_success_list(&client.list_skills()?)?;
    if skills.iter().any(|skill| skill.key == SEED_KEY) {
        Ok(())
    } else {
        Err(CaseFailure::new(format!(
            "list does not contain '{}': {:?}",
            SEED_KEY,
            skills.iter().map(|s| s.key.as_str()).collect::<Vec<_>>()
        )))
    }
}

fn create_skill(client: &SkillsClient) -> Result<(), CaseFailure> {
    let request = python_request();
    let created = expect_success_skill(&client.create_skill(&request)?)?;
    let expected = request
        .into_skill()
        .map_err(|e| CaseFailure::new(e.to_string()))?;
    expect_field("created skill", &created, &expected)
}

fn get_created(client: &SkillsClient) -> Result<(), CaseFailure> {
    let expected = python_request()
        .into_skill()
        .map_err(|e| CaseFailure::new(e.to_string()))?;
    let stored = fetch(client, &expected.key)?;
    expect_field("stored skill", &stored, &expected)
}

fn create_duplicate(client: &SkillsClient) -> Result<(), CaseFailure> {
    let before = fetch(client, SEED_KEY)?;

    let request = SkillCreateRequest {
        key: SEED_KEY.to_string(),
        ..python_request()
    };
    let returned = expect_success_skill(&client.create_skill(&request)?)?;
    expect_field("key", returned.key.as_str(), SEED_KEY)?;

    let after = fetch(client, SEED_KEY)?;
    expect_field("stored skill after duplicate create", &after, &before)
}

fn replace_existing(client: &SkillsClient) -> Result<(), CaseFailure> {
    let update = go2_update();
    let mut expected = fetch(client, SEED_KEY)?;
    expected.replace(update.clone());

    let replaced = expect_success_skill(&client.replace_skill(SEED_KEY, &update)?)?;
    expect_field("replaced skill", &replaced, &expected)?;

    let stored = fetch(client, SEED_KEY)?;
    expect_field("stored skill", &stored, &expected)
}

fn replace_missing(client: &SkillsClient) -> Result<(), CaseFailure> {
    expect_error(&client.replace_skill(MISSING_KEY, &go2_update())?, None).map(|_| ())
}

fn patch_existing(client: &SkillsClient, patch: &SkillPatch) -> Result<(), CaseFailure> {
    let mut expected = fetch(client, SEED_KEY)?;
    expected.apply(patch.clone());

    let patched = expect_success_skill(&client.patch_skill(SEED_KEY, patch)?)?;
    expect_field("patched skill", &patched, &expected)?;

    let stored = fetch(client, SEED_KEY)?;
    expect_field("stored skill", &stored, &expected)
}

fn patch_missing(client: &SkillsClient, patch: &SkillPatch) -> Result<(), CaseFailure> {
    expect_error(&client.patch_skill(MISSING_KEY, patch)?, None).map(|_| ())
}

fn delete_existing(client: &SkillsClient) -> Result<(), CaseFailure> {
    expect_success_message(&client.delete_skill(SEED_KEY)?, "Skill deleted")?;
    expect_error(&client.get_skill(SEED_KEY)?, Some("Skill not found")).map(|_| ())
}

fn delete_missing(client: &SkillsClient) -> Result<(), CaseFailure> {
    expect_error(&client.delete_skill(MISSING_KEY)?, None).map(|_| ())
}
