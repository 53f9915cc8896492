//! GitLab platform service implementation

use crate::config::GitLabConfig;
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{Branch, Commit, Issue, MergeRequest, NewIssue, NewMergeRequest};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// Page size used when listing merge request commits
const COMMITS_PER_PAGE: &str = "100";

/// GitLab service using reqwest
pub struct GitLabService {
    client: Client,
    token: String,
    base_url: String,
}

/// Error body GitLab sends with non-2xx responses
#[derive(Deserialize)]
struct ApiError {
    message: Option<serde_json::Value>,
    error: Option<String>,
}

impl GitLabService {
    /// Create a new GitLab service
    pub fn new(config: &GitLabConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| Error::Config(format!("invalid GitLab URL '{}': {e}", config.base_url)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "GitLab URL must be http(s), got '{}'",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.insecure)
            .build()
            .map_err(|e| Error::GitLabApi(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token: config.token.clone(),
            base_url: base.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v4{}", self.base_url, path)
    }
}

/// Turn a non-success response into `Error::GitLabApi`, keeping GitLab's message
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::GitLabApi(format!("{status}: {}", error_message(&body))))
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    Ok(check_status(response).await?.json().await?)
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(ApiError {
            message: Some(serde_json::Value::String(message)),
            ..
        }) => message,
        Ok(ApiError {
            message: Some(message),
            ..
        }) => message.to_string(),
        Ok(ApiError {
            error: Some(error), ..
        }) => error,
        _ => body.trim().to_string(),
    }
}

#[async_trait]
impl PlatformService for GitLabService {
    async fn create_branch(&self, project: u64, branch: &str, git_ref: &str) -> Result<Branch> {
        debug!(project, branch, git_ref, "creating branch");
        let url = self.api_url(&format!("/projects/{project}/repository/branches"));

        let response = self
            .client
            .post(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .query(&[("branch", branch), ("ref", git_ref)])
            .send()
            .await?;
        let created: Branch = parse_json(response).await?;

        debug!(project, branch = %created.name, "created branch");
        Ok(created)
    }

    async fn merge_request_commits(&self, project: u64, mr_iid: u64) -> Result<Vec<Commit>> {
        debug!(project, mr_iid, "listing MR commits");
        let url = self.api_url(&format!(
            "/projects/{project}/merge_requests/{mr_iid}/commits"
        ));

        let mut commits = Vec::new();
        let mut page = String::from("1");
        loop {
            let response = self
                .client
                .get(&url)
                .header("PRIVATE-TOKEN", &self.token)
                .query(&[("per_page", COMMITS_PER_PAGE), ("page", page.as_str())])
                .send()
                .await?;
            let response = check_status(response).await?;

            let next_page = response
                .headers()
                .get("x-next-page")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(ToString::to_string);

            let batch: Vec<Commit> = response.json().await?;
            commits.extend(batch);

            match next_page {
                Some(next) if next != page => page = next,
                _ => break,
            }
        }

        debug!(project, mr_iid, count = commits.len(), "listed MR commits");
        Ok(commits)
    }

    async fn cherry_pick(&self, project: u64, sha: &str, branch: &str) -> Result<Commit> {
        debug!(project, sha, branch, "cherry-picking commit");
        let url = self.api_url(&format!(
            "/projects/{project}/repository/commits/{}/cherry_pick",
            urlencoding::encode(sha)
        ));

        let response = self
            .client
            .post(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .json(&serde_json::json!({ "branch": branch }))
            .send()
            .await?;
        let commit: Commit = parse_json(response).await?;

        debug!(project, sha, new_sha = %commit.id, "cherry-picked commit");
        Ok(commit)
    }

    async fn create_issue(&self, project: u64, issue: &NewIssue) -> Result<Issue> {
        debug!(project, title = %issue.title, "creating issue");
        let url = self.api_url(&format!("/projects/{project}/issues"));

        let response = self
            .client
            .post(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .json(issue)
            .send()
            .await?;
        let created: Issue = parse_json(response).await?;

        debug!(project, issue_iid = created.iid, "created issue");
        Ok(created)
    }

    async fn create_merge_request(
        &self,
        project: u64,
        merge_request: &NewMergeRequest,
    ) -> Result<MergeRequest> {
        debug!(
            project,
            source = %merge_request.source_branch,
            target = %merge_request.target_branch,
            "creating MR"
        );
        let url = self.api_url(&format!("/projects/{project}/merge_requests"));

        let response = self
            .client
            .post(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .json(merge_request)
            .send()
            .await?;
        let created: MergeRequest = parse_json(response).await?;

        debug!(project, mr_iid = created.iid, "created MR");
        Ok(created)
    }
}
