//! Error types for mr-mirror

use thiserror::Error;

/// Errors raised while mirroring a merge request
#[derive(Debug, Error)]
pub enum Error {
    /// Webhook body could not be decoded as a merge event
    #[error("malformed merge event: {0}")]
    MalformedEvent(String),

    /// Event decoded fine but does not warrant mirroring
    #[error("merge event not actionable (action={action}, target branch={target_branch})")]
    NotActionable {
        /// Lifecycle action carried by the event
        action: String,
        /// Branch the merge request targets
        target_branch: String,
    },

    /// Working branch could not be created
    #[error("failed to create branch {branch}: {source}")]
    BranchCreation {
        /// Branch that was requested
        branch: String,
        /// Underlying remote failure
        #[source]
        source: Box<Self>,
    },

    /// Commit list of the merge request could not be fetched
    #[error("failed to list commits of merge request !{iid}: {source}")]
    CommitFetch {
        /// Merge request IID
        iid: u64,
        /// Underlying remote failure
        #[source]
        source: Box<Self>,
    },

    /// A single commit failed to cherry-pick
    #[error("failed to cherry-pick {sha}: {source}")]
    CherryPick {
        /// Commit that failed
        sha: String,
        /// Underlying remote failure
        #[source]
        source: Box<Self>,
    },

    /// Issue or merge request reporting the outcome could not be created
    #[error("failed to create {what}: {source}")]
    Reporting {
        /// What was being created ("issue" or "merge request")
        what: &'static str,
        /// Underlying remote failure
        #[source]
        source: Box<Self>,
    },

    /// GitLab answered with a non-success status
    #[error("GitLab API error: {0}")]
    GitLabApi(String),

    /// Generic platform failure
    #[error("platform error: {0}")]
    Platform(String),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Message of the innermost cause, without the wrapping context
    ///
    /// Used when the remote's own words matter more than ours, e.g. the
    /// conflict text GitLab returns for a failed cherry-pick.
    pub fn root_message(&self) -> String {
        match self {
            Self::BranchCreation { source, .. }
            | Self::CommitFetch { source, .. }
            | Self::CherryPick { source, .. }
            | Self::Reporting { source, .. } => source.root_message(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for mr-mirror operations
pub type Result<T> = std::result::Result<T, Error>;
