//! Label commit-history client.
//!
//! Retrieves the revision history of a label from the registry, newest
//! first, one page per call. Page tokens are opaque cursors minted by the
//! registry — this client passes them through without inspecting them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::RegistryConfig;
use crate::error::RegistryError;

const ENDPOINT: &str = "registry.v1.LabelService/ListLabelHistory";

// ── Request types ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListLabelHistoryRequest<'a> {
    page_size: u32,
    label_ref: LabelRef<'a>,
    order: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LabelRef<'a> {
    name: LabelName<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LabelName<'a> {
    owner: &'a str,
    module: &'a str,
    label: &'a str,
}

// ── Response types ───────────────────────────────────────────────────

/// One page of a label's history. Immutable once returned.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitPage {
    #[serde(default)]
    pub values: Vec<LabelHistoryEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// One commit on the label, with the registry's check state for it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelHistoryEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<Commit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_check_state: Option<CommitCheckState>,
}

/// Commit metadata. Identifiers are opaque registry-assigned strings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub owner_id: String,
    #[serde(default)]
    pub module_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<Digest>,
    #[serde(default)]
    pub created_by_user_id: String,
}

/// Content digest of a commit.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Digest {
    #[serde(default, rename = "type")]
    pub digest_type: String,
    #[serde(default)]
    pub value: String,
}

/// The registry's policy-check verdict for a commit.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitCheckState {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub update_time: Option<DateTime<Utc>>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Client for the registry's label-history surface.
#[derive(Debug, Clone)]
pub struct CommitsClient {
    http: reqwest::Client,
    config: RegistryConfig,
}

impl CommitsClient {
    pub(crate) fn new(http: reqwest::Client, config: RegistryConfig) -> Self {
        Self { http, config }
    }

    /// Fetch one page of commit history for `label`, newest first.
    ///
    /// `page_size` must already be validated as positive by the caller;
    /// `label` falls back to the configured default when `None`;
    /// `page_token` is an opaque cursor from a previous page.
    pub async fn list_commits(
        &self,
        label: Option<&str>,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<CommitPage, RegistryError> {
        let label = label.unwrap_or(&self.config.default_label);
        let url = format!("{}{ENDPOINT}", self.config.base_url);
        let request = ListLabelHistoryRequest {
            page_size,
            label_ref: LabelRef {
                name: LabelName {
                    owner: &self.config.owner,
                    module: &self.config.module,
                    label,
                },
            },
            order: "ORDER_DESC",
            page_token,
        };
        tracing::debug!(label, page_size, "fetching label history from registry");

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RegistryError::Transport {
                endpoint: ENDPOINT.into(),
                source: e,
            })?;
        let response =
            crate::check_status(response, ENDPOINT, &format!("label {label}")).await?;

        let page: CommitPage = response.json().await.map_err(|e| RegistryError::Decode {
            endpoint: ENDPOINT.into(),
            detail: e.to_string(),
        })?;
        tracing::info!(label, commits = page.values.len(), "fetched label history page");
        Ok(page)
    }
}
