//! HTTP backend for the mnemon ledger.
//!
//! Speaks the `/v0` wire protocol of a remote ledger service and
//! implements the same [`Ledger`] contract as the local store, so the
//! two are interchangeable behind the trait.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde::Serialize;
use tracing::debug;

use mnemon_core::chain::ChainReport;
use mnemon_core::error::CoreError;
use mnemon_core::ledger::{Ledger, NewIntent};
use mnemon_core::model::{Checkpoint, IntentRecord, Meta, Project};
use mnemon_core::store::ListOptions;
use mnemon_core::verify::VerifyReport;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Ledger backend over a remote HTTP service.
pub struct RemoteLedger {
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct CreateIntentBody<'a> {
    author: &'a str,
    source_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    prompt: &'a str,
    response: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<&'a Meta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prev_hash: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct CreateProjectBody<'a> {
    name: &'a str,
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateCheckpointBody<'a> {
    project: &'a str,
    summary: &'a str,
    artifact_ids: &'a [String],
}

impl RemoteLedger {
    pub fn new(base_url: &str) -> Result<Self, CoreError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(CoreError::Validation("remote URL is required".into()));
        }
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| CoreError::Transport(err.to_string()))?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send the request and decode a JSON body. Non-2xx responses surface
    /// the trimmed response body as a transport error.
    fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, CoreError> {
        let response = request
            .send()
            .map_err(|err| CoreError::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let body = body.trim();
            debug!(%status, "remote ledger request failed");
            let detail = if body.is_empty() {
                status.to_string()
            } else {
                body.to_string()
            };
            return Err(CoreError::Transport(detail));
        }
        response
            .json()
            .map_err(|err| CoreError::Transport(err.to_string()))
    }
}

impl Ledger for RemoteLedger {
    fn create_intent(&self, new: NewIntent) -> Result<IntentRecord, CoreError> {
        let author = new.author.trim();
        if author.is_empty() {
            return Err(CoreError::Validation("author is required".into()));
        }
        if new.response.trim().is_empty() {
            return Err(CoreError::Validation("response is required".into()));
        }
        let body = CreateIntentBody {
            author,
            source_type: match new.source_type.trim() {
                "" => "cli",
                s => s,
            },
            title: new.title.as_deref().map(str::trim).filter(|t| !t.is_empty()),
            prompt: &new.prompt,
            response: &new.response,
            meta: new.meta.as_ref().filter(|m| !m.is_empty()),
            prev_hash: new.prev_hash.as_deref().filter(|h| !h.is_empty()),
        };
        self.send_json(self.client.post(self.url("/v0/intents")).json(&body))
    }

    fn get_intent(&self, id: &str) -> Result<IntentRecord, CoreError> {
        self.send_json(self.client.get(self.url(&format!("/v0/intents/{id}"))))
    }

    fn list_intents(&self, opts: &ListOptions) -> Result<Vec<IntentRecord>, CoreError> {
        let mut query: Vec<(String, String)> = Vec::new();
        if let Some(author) = &opts.author {
            query.push(("author".into(), author.clone()));
        }
        if let Some(source) = &opts.source {
            query.push(("source".into(), source.clone()));
        }
        if let Some(limit) = opts.limit {
            query.push(("limit".into(), limit.to_string()));
        }
        for (key, value) in &opts.meta {
            query.push((format!("meta_{key}"), value.clone()));
        }
        self.send_json(self.client.get(self.url("/v0/intents")).query(&query))
    }

    fn verify_intent(&self, id: &str) -> Result<VerifyReport, CoreError> {
        self.send_json(
            self.client
                .get(self.url(&format!("/v0/intents/{id}/verify"))),
        )
    }

    fn chain_intent(&self, id: &str) -> Result<ChainReport, CoreError> {
        self.send_json(self.client.get(self.url(&format!("/v0/intents/{id}/chain"))))
    }

    fn create_project(&self, name: &str, description: &str) -> Result<Project, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("project name is required".into()));
        }
        let body = CreateProjectBody { name, description };
        self.send_json(self.client.post(self.url("/v0/projects")).json(&body))
    }

    fn list_projects(&self) -> Result<Vec<Project>, CoreError> {
        self.send_json(self.client.get(self.url("/v0/projects")))
    }

    fn create_checkpoint(
        &self,
        project: &str,
        summary: &str,
        artifact_ids: Vec<String>,
    ) -> Result<Checkpoint, CoreError> {
        let project = project.trim();
        if project.is_empty() {
            return Err(CoreError::Validation("project is required".into()));
        }
        let summary = summary.trim();
        if summary.is_empty() {
            return Err(CoreError::Validation("summary is required".into()));
        }
        let body = CreateCheckpointBody {
            project,
            summary,
            artifact_ids: &artifact_ids,
        };
        self.send_json(self.client.post(self.url("/v0/checkpoints")).json(&body))
    }

    fn list_checkpoints(&self, project: &str) -> Result<Vec<Checkpoint>, CoreError> {
        let project = project.trim();
        if project.is_empty() {
            return Err(CoreError::Validation("project is required".into()));
        }
        self.send_json(
            self.client
                .get(self.url("/v0/checkpoints"))
                .query(&[("project", project)]),
        )
    }
}
