//! Core types for mr-mirror

use serde::{Deserialize, Serialize};

/// A merge request webhook notification
///
/// Only the fields needed for mirroring are decoded; everything else in the
/// GitLab payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct MergeEvent {
    /// Event kind ("`merge_request`" for merge request hooks)
    #[serde(default)]
    pub object_kind: Option<String>,
    /// The merge request itself
    pub object_attributes: MergeAttributes,
}

/// Merge request attributes carried by a [`MergeEvent`]
#[derive(Debug, Clone, Deserialize)]
pub struct MergeAttributes {
    /// Project-scoped merge request number
    pub iid: u64,
    /// Merge request title
    #[serde(default)]
    pub title: String,
    /// Merge request description (GitLab sends `null` when empty)
    #[serde(default)]
    pub description: Option<String>,
    /// Author user ID
    pub author_id: u64,
    /// Project the source branch lives in
    pub source_project_id: u64,
    /// Project the merge request targets
    pub target_project_id: u64,
    /// Source branch name
    pub source_branch: String,
    /// Target branch name
    pub target_branch: String,
    /// Lifecycle action that fired the hook
    #[serde(default)]
    pub action: EventAction,
    /// Web URL of the merge request
    #[serde(default)]
    pub url: String,
}

impl MergeAttributes {
    /// Description, empty when GitLab sent none
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

/// Merge request lifecycle action
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Option<String>")]
pub enum EventAction {
    /// Merge request was opened
    Open,
    /// Merge request was reopened
    Reopen,
    /// Anything else (update, close, merge, approved, ...)
    Other(String),
    /// No action in the payload
    #[default]
    Missing,
}

impl EventAction {
    /// Whether this action should trigger a mirror
    pub const fn is_mirrorable(&self) -> bool {
        matches!(self, Self::Open | Self::Reopen)
    }
}

impl From<Option<String>> for EventAction {
    fn from(action: Option<String>) -> Self {
        let Some(action) = action else {
            return Self::Missing;
        };
        match action.as_str() {
            "open" => Self::Open,
            "reopen" => Self::Reopen,
            _ => Self::Other(action),
        }
    }
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Reopen => write!(f, "reopen"),
            Self::Other(action) => write!(f, "{action}"),
            Self::Missing => write!(f, "<none>"),
        }
    }
}

/// A commit as returned by the remote API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Commit {
    /// Full commit SHA
    pub id: String,
    /// First line of the commit message
    #[serde(default)]
    pub title: String,
}

/// A branch created on the remote
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Branch {
    /// Branch name
    pub name: String,
    /// Tip commit
    #[serde(default)]
    pub commit: Option<BranchTip>,
}

/// Tip commit of a [`Branch`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BranchTip {
    /// Commit SHA
    pub id: String,
}

/// An issue created on the remote
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Issue {
    /// Project-scoped issue number
    pub iid: u64,
    /// Web URL for the issue
    #[serde(default)]
    pub web_url: String,
}

/// A merge request created on the remote
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MergeRequest {
    /// Project-scoped merge request number
    pub iid: u64,
    /// Web URL for the merge request
    #[serde(default)]
    pub web_url: String,
}

/// Options for creating an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewIssue {
    /// Issue title
    pub title: String,
    /// Issue body (markdown)
    pub description: String,
    /// Users to assign
    pub assignee_ids: Vec<u64>,
    /// Merge request whose discussions this issue resolves
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_request_to_resolve_discussions_of: Option<u64>,
}

/// Options for creating a merge request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMergeRequest {
    /// Merge request title
    pub title: String,
    /// Merge request body (markdown)
    pub description: String,
    /// Branch with the changes
    pub source_branch: String,
    /// Branch to merge into
    pub target_branch: String,
    /// User to assign
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<u64>,
    /// Project to open the merge request against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_project_id: Option<u64>,
    /// Delete the source branch once merged
    pub remove_source_branch: bool,
}
