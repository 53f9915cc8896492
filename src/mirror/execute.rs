//! Cherry-pick execution - effectful operations
//!
//! Commits are replayed strictly in order because each pick is computed
//! against the branch state the previous pick left behind. The first failure
//! ends the run; nothing after it is attempted.

use crate::error::Error;
use crate::platform::PlatformService;
use crate::types::Commit;
use tracing::{debug, warn};

/// Result of cherry-picking a commit sequence
///
/// `applied` followed by `failed` is always the original sequence. When
/// `failed` is non-empty its first commit is the one that broke, `cause`
/// holds why, and the rest were never attempted.
#[derive(Debug)]
pub struct CherryPickOutcome {
    applied: Vec<Commit>,
    failed: Vec<Commit>,
    cause: Option<Error>,
}

impl CherryPickOutcome {
    /// Every commit applied
    pub const fn complete(commits: Vec<Commit>) -> Self {
        Self {
            applied: commits,
            failed: Vec::new(),
            cause: None,
        }
    }

    /// Split `commits` at the commit that failed to apply
    pub(crate) fn split_at(mut commits: Vec<Commit>, failed_index: usize, cause: Error) -> Self {
        let failed = commits.split_off(failed_index.min(commits.len()));
        if failed.is_empty() {
            return Self::complete(commits);
        }
        Self {
            applied: commits,
            failed,
            cause: Some(cause),
        }
    }

    /// Commits applied to the working branch, oldest first
    pub fn applied(&self) -> &[Commit] {
        &self.applied
    }

    /// Commits not applied: the failing one followed by the skipped ones
    pub fn failed(&self) -> &[Commit] {
        &self.failed
    }

    /// Why the first failed commit did not apply
    pub const fn cause(&self) -> Option<&Error> {
        self.cause.as_ref()
    }

    /// The commit whose cherry-pick failed
    pub fn failed_commit(&self) -> Option<&Commit> {
        self.failed.first()
    }

    /// Commits after the failing one, never attempted
    pub fn skipped(&self) -> &[Commit] {
        self.failed.get(1..).unwrap_or_default()
    }

    /// Check if every commit applied
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of commits in the original sequence
    pub fn total(&self) -> usize {
        self.applied.len() + self.failed.len()
    }
}

/// Cherry-pick `commits` onto `branch` in order (EFFECTFUL)
///
/// Stops at the first failure and reports the split point in the returned
/// [`CherryPickOutcome`]. Never returns an error: a failed pick is an outcome,
/// not a fault.
pub async fn cherry_pick_commits(
    platform: &dyn PlatformService,
    project: u64,
    commits: Vec<Commit>,
    branch: &str,
) -> CherryPickOutcome {
    let mut failure = None;

    for (index, commit) in commits.iter().enumerate() {
        match platform.cherry_pick(project, &commit.id, branch).await {
            Ok(picked) => {
                debug!(sha = %commit.id, new_sha = %picked.id, branch, "applied commit");
            }
            Err(e) => {
                warn!(
                    sha = %commit.id,
                    index,
                    total = commits.len(),
                    branch,
                    error = %e,
                    "cherry-pick failed, skipping remaining commits"
                );
                failure = Some((
                    index,
                    Error::CherryPick {
                        sha: commit.id.clone(),
                        source: Box::new(e),
                    },
                ));
                break;
            }
        }
    }

    match failure {
        Some((index, cause)) => CherryPickOutcome::split_at(commits, index, cause),
        None => CherryPickOutcome::complete(commits),
    }
}
