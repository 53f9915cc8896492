//! Remote hosting platform
//!
//! The mirror only needs five operations from the hosting platform. They are
//! collected in [`PlatformService`] so the workflow can run against GitLab in
//! production and against an in-memory fake in tests.

mod gitlab;

pub use gitlab::GitLabService;

use crate::error::Result;
use crate::types::{Branch, Commit, Issue, MergeRequest, NewIssue, NewMergeRequest};
use async_trait::async_trait;

/// Platform service trait for the operations the mirror performs
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Create `branch` in `project`, rooted at the tip of `git_ref`
    async fn create_branch(&self, project: u64, branch: &str, git_ref: &str) -> Result<Branch>;

    /// List every commit of a merge request
    ///
    /// GitLab returns these newest first; implementations pass that order
    /// through unchanged.
    async fn merge_request_commits(&self, project: u64, mr_iid: u64) -> Result<Vec<Commit>>;

    /// Cherry-pick `sha` onto `branch`, returning the new commit
    async fn cherry_pick(&self, project: u64, sha: &str, branch: &str) -> Result<Commit>;

    /// Open an issue in `project`
    async fn create_issue(&self, project: u64, issue: &NewIssue) -> Result<Issue>;

    /// Open a merge request in `project`
    async fn create_merge_request(
        &self,
        project: u64,
        merge_request: &NewMergeRequest,
    ) -> Result<MergeRequest>;
}
