//! Working branch preparation and commit sequencing

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{Branch, Commit, MergeEvent};
use tracing::debug;

/// Name of the branch that stages a mirror of `source_branch` onto `downstream`
pub fn working_branch_name(source_branch: &str, downstream: &str) -> String {
    format!("{source_branch}_for_{downstream}")
}

/// Create the working branch, rooted at the current tip of `downstream`
///
/// There is no fallback name: if the branch already exists the request fails.
pub async fn prepare_branch(
    platform: &dyn PlatformService,
    event: &MergeEvent,
    downstream: &str,
) -> Result<Branch> {
    let attrs = &event.object_attributes;
    let name = working_branch_name(&attrs.source_branch, downstream);

    platform
        .create_branch(attrs.source_project_id, &name, downstream)
        .await
        .map_err(|e| Error::BranchCreation {
            branch: name,
            source: Box::new(e),
        })
}

/// Fetch the merge request's commits in the order they must be applied
///
/// The platform lists commits newest first; cherry-picks have to replay them
/// oldest first.
pub async fn fetch_commits(
    platform: &dyn PlatformService,
    event: &MergeEvent,
) -> Result<Vec<Commit>> {
    let attrs = &event.object_attributes;
    let mut commits = platform
        .merge_request_commits(attrs.source_project_id, attrs.iid)
        .await
        .map_err(|e| Error::CommitFetch {
            iid: attrs.iid,
            source: Box::new(e),
        })?;
    commits.reverse();

    debug!(
        mr_iid = attrs.iid,
        count = commits.len(),
        "sequenced commits oldest first"
    );
    Ok(commits)
}
