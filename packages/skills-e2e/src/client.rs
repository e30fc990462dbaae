//! Blocking HTTP client for the skills API.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::{Map, Value};
use skills_core::{SkillCreateRequest, SkillPatch, SkillUpdateRequest};

use crate::config::VerifierConfig;
use crate::error::VerifyError;

/// Characters left unescaped in a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Status code and decoded JSON body of one response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: u16,
    pub body: Value,
}

impl ApiReply {
    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One method per skills endpoint.
pub struct SkillsClient {
    http: Client,
    base_url: String,
}

impl SkillsClient {
    /// Builds a client for `config.base_url`.
    ///
    /// Must not be called from inside an async runtime.
    pub fn new(config: &VerifierConfig) -> Result<Self, VerifyError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(VerifyError::Client)?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/v1/skills/{key}`
    pub fn get_skill(&self, key: &str) -> Result<ApiReply, VerifyError> {
        let url = self.skill_url(key);
        self.send(self.http.get(&url), url)
    }

    /// `GET /api/v1/skills`
    pub fn list_skills(&self) -> Result<ApiReply, VerifyError> {
        let url = self.collection_url();
        self.send(self.http.get(&url), url)
    }

    /// `POST /api/v1/skills`
    pub fn create_skill(&self, request: &SkillCreateRequest) -> Result<ApiReply, VerifyError> {
        self.create_raw(request)
    }

    /// `POST /api/v1/skills` with an arbitrary JSON body.
    pub fn create_raw<T: Serialize + ?Sized>(&self, body: &T) -> Result<ApiReply, VerifyError> {
        let url = self.collection_url();
        self.send(self.http.post(&url).json(body), url)
    }

    /// `PUT /api/v1/skills/{key}`
    pub fn replace_skill(
        &self,
        key: &str,
        update: &SkillUpdateRequest,
    ) -> Result<ApiReply, VerifyError> {
        let url = self.skill_url(key);
        self.send(self.http.put(&url).json(update), url)
    }

    /// `PATCH /api/v1/skills/{key}/actions/{field}`
    pub fn patch_skill(&self, key: &str, patch: &SkillPatch) -> Result<ApiReply, VerifyError> {
        let url = format!("{}/actions/{}", self.skill_url(key), patch.field());
        self.send(self.http.patch(&url).json(&patch_body(patch)), url)
    }

    /// `DELETE /api/v1/skills/{key}`
    pub fn delete_skill(&self, key: &str) -> Result<ApiReply, VerifyError> {
        let url = self.skill_url(key);
        self.send(self.http.delete(&url), url)
    }

    fn collection_url(&self) -> String {
        format!("{}/api/v1/skills", self.base_url)
    }

    fn skill_url(&self, key: &str) -> String {
        format!(
            "{}/{}",
            self.collection_url(),
            utf8_percent_encode(key, PATH_SEGMENT)
        )
    }

    fn send(&self, request: RequestBuilder, url: String) -> Result<ApiReply, VerifyError> {
        let response = request.send().map_err(|source| VerifyError::Transport {
            url: url.clone(),
            source,
        })?;
        let status = response.status().as_u16();
        let bytes = response.bytes().map_err(|source| VerifyError::Transport {
            url: url.clone(),
            source,
        })?;
        let body = serde_json::from_slice(&bytes).map_err(|source| VerifyError::Decode {
            url: url.clone(),
            status,
            source,
        })?;

        tracing::debug!(%url, status, "response received");
        Ok(ApiReply { status, body })
    }
}

/// `{"<field>": <value>}` body of a patch request.
fn patch_body(patch: &SkillPatch) -> Value {
    let value = match patch {
        SkillPatch::Name(value) | SkillPatch::Description(value) | SkillPatch::Logo(value) => {
            Value::from(value.as_str())
        }
        SkillPatch::Tags(tags) => Value::from(tags.clone()),
    };
    let mut body = Map::new();
    body.insert(patch.field().as_str().to_string(), value);
    Value::Object(body)
}
