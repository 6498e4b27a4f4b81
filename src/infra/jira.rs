use std::time::Duration;

use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::ticket::{TicketDraft, TicketResult};
use crate::services::IssueTrackerService;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct JiraClient {
    http: Client,
    base_url: String,
    email: String,
    token: String,
    project_key: String,
}

impl JiraClient {
    pub fn new(base_url: String, email: String, token: String, project_key: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
            email,
            token,
            project_key,
        }
    }

    fn auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.email, self.token);
        let encoded = BASE64_STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }

    fn issue_endpoint(&self) -> String {
        format!("{}/rest/api/3/issue", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl IssueTrackerService for JiraClient {
    /// Sends the create-issue request and folds every failure mode into
    /// `TicketResult::Failed`. Retries, if ever wanted, live upstream.
    async fn create_issue(&self, draft: &TicketDraft) -> TicketResult {
        let request_body = JiraCreateIssueRequest::new(
            &self.project_key,
            draft.category.issue_type_id(),
            draft.title(),
            draft.description.trim(),
        );

        debug!(
            issue_type = draft.category.issue_type_id(),
            title = draft.title(),
            "submitting ticket to Jira"
        );

        let response = match self
            .http
            .post(self.issue_endpoint())
            .timeout(REQUEST_TIMEOUT)
            .header(AUTHORIZATION, self.auth_header())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&request_body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "Jira request failed to send");
                return TicketResult::Failed {
                    detail: format!("Error de conexión: {err}"),
                };
            }
        };

        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            warn!(%status, "Jira rejected the create-issue request");
            return TicketResult::Failed {
                detail: format!("Error {status}: {body}"),
            };
        }

        match response.json::<JiraCreateIssueResponse>().await {
            Ok(payload) => TicketResult::Created {
                key: payload.key,
                category_label: draft.category.label().to_string(),
            },
            Err(err) => TicketResult::Failed {
                detail: format!("respuesta de Jira ilegible: {err}"),
            },
        }
    }
}

#[derive(Serialize)]
struct JiraCreateIssueRequest {
    fields: JiraCreateIssueFields,
}

impl JiraCreateIssueRequest {
    fn new(project_key: &str, issue_type_id: &str, summary: &str, description: &str) -> Self {
        Self {
            fields: JiraCreateIssueFields {
                project: JiraProject {
                    key: project_key.to_string(),
                },
                summary: summary.to_string(),
                description: JiraDescription::from_text(description),
                issuetype: JiraIssueType {
                    id: issue_type_id.to_string(),
                },
            },
        }
    }
}

#[derive(Serialize)]
struct JiraCreateIssueFields {
    project: JiraProject,
    summary: String,
    description: JiraDescription,
    issuetype: JiraIssueType,
}

#[derive(Serialize)]
struct JiraProject {
    key: String,
}

#[derive(Serialize)]
struct JiraIssueType {
    id: String,
}

#[derive(Serialize)]
struct JiraDescription {
    #[serde(rename = "type")]
    doc_type: &'static str,
    version: u8,
    content: Vec<JiraDocNode>,
}

impl JiraDescription {
    /// Builds the ADF document the v3 API expects, one paragraph per blank
    /// line separated block.
    fn from_text(description: &str) -> Self {
        let cleaned = description.replace('\r', "");
        let mut sections = cleaned
            .split("\n\n")
            .map(|section| section.trim())
            .filter(|section| !section.is_empty())
            .collect::<Vec<_>>();

        if sections.is_empty() {
            sections.push("Sin descripción proporcionada.");
        }

        let content = sections
            .into_iter()
            .map(|section| {
                let paragraph_text = section.replace('\n', " ").trim().to_string();
                JiraDocNode::paragraph(paragraph_text)
            })
            .collect();

        Self {
            doc_type: "doc",
            version: 1,
            content,
        }
    }
}

#[derive(Serialize)]
struct JiraDocNode {
    #[serde(rename = "type")]
    node_type: &'static str,
    content: Vec<JiraDocText>,
}

impl JiraDocNode {
    fn paragraph(text: String) -> Self {
        Self {
            node_type: "paragraph",
            content: vec![JiraDocText::text(text)],
        }
    }
}

#[derive(Serialize)]
struct JiraDocText {
    #[serde(rename = "type")]
    text_type: &'static str,
    text: String,
}

impl JiraDocText {
    fn text(text: String) -> Self {
        Self {
            text_type: "text",
            text,
        }
    }
}

#[derive(Deserialize)]
struct JiraCreateIssueResponse {
    key: String,
}
