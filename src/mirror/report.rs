//! Outcome reporting
//!
//! A complete mirror becomes a merge request from the working branch into the
//! downstream branch. Anything less becomes an issue listing which commits
//! applied, which one failed and which were skipped. Nothing is rolled back.

use crate::error::{Error, Result};
use crate::mirror::execute::CherryPickOutcome;
use crate::platform::PlatformService;
use crate::types::{Commit, Issue, MergeEvent, MergeRequest, NewIssue, NewMergeRequest};
use std::fmt::Write as _;
use tracing::debug;

/// Prefix of mirrored merge request titles
pub const MERGE_REQUEST_TITLE_PREFIX: &str = "CherryPick - ";

/// What was filed for an outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// Merge request opened for a complete mirror
    MergeRequest(MergeRequest),
    /// Issue opened for a partial or failed mirror
    Issue(Issue),
}

/// Title of the merge request opened for a complete mirror
pub fn merge_request_title(original_title: &str) -> String {
    format!("{MERGE_REQUEST_TITLE_PREFIX}{original_title}")
}

/// Title of the issue opened when a mirror fails
pub fn issue_title(event: &MergeEvent, downstream: &str) -> String {
    let attrs = &event.object_attributes;
    format!(
        "Fail to cherry pick MR !{} ({}) into {downstream}",
        attrs.iid, attrs.title
    )
}

/// Markdown body of the issue opened when a mirror fails
pub fn issue_description(
    event: &MergeEvent,
    downstream: &str,
    working_branch: &str,
    outcome: &CherryPickOutcome,
) -> String {
    let mut desc = String::new();
    let _ = writeln!(desc, "**Merge Request:** {}\n", event.object_attributes.url);
    let _ = writeln!(desc, "**Target Branch:** {downstream}\n");
    let _ = writeln!(desc, "**Working Branch:** {working_branch}\n");
    let _ = writeln!(
        desc,
        "**Details:** {}/{} commit(s) not applied\n",
        outcome.failed().len(),
        outcome.total()
    );

    for commit in outcome.applied() {
        let _ = writeln!(desc, "* {} [applied]", commit_label(commit));
    }
    if let Some(commit) = outcome.failed_commit() {
        let reason = outcome
            .cause()
            .map_or_else(|| "unknown error".to_string(), Error::root_message);
        let _ = writeln!(desc, "* {} [failed]: {reason}", commit_label(commit));
    }
    for commit in outcome.skipped() {
        let _ = writeln!(desc, "* {} [skipped]", commit_label(commit));
    }
    desc
}

/// SHA followed by the commit title in parentheses, when there is one
fn commit_label(commit: &Commit) -> String {
    if commit.title.is_empty() {
        commit.id.clone()
    } else {
        format!("{} ({})", commit.id, commit.title)
    }
}

/// File the report for a cherry-pick outcome (EFFECTFUL)
///
/// Exactly one remote call is made: merge request creation when every commit
/// applied, issue creation otherwise.
pub async fn report_outcome(
    platform: &dyn PlatformService,
    event: &MergeEvent,
    downstream: &str,
    working_branch: &str,
    outcome: &CherryPickOutcome,
) -> Result<Report> {
    let attrs = &event.object_attributes;

    if outcome.is_complete() {
        let merge_request = NewMergeRequest {
            title: merge_request_title(&attrs.title),
            description: attrs.description().to_string(),
            source_branch: working_branch.to_string(),
            target_branch: downstream.to_string(),
            assignee_id: Some(attrs.author_id),
            target_project_id: Some(attrs.target_project_id),
            remove_source_branch: true,
        };
        debug!(mr_iid = attrs.iid, working_branch, downstream, "opening mirrored MR");
        let created = platform
            .create_merge_request(attrs.source_project_id, &merge_request)
            .await
            .map_err(|e| Error::Reporting {
                what: "merge request",
                source: Box::new(e),
            })?;
        return Ok(Report::MergeRequest(created));
    }

    let issue = NewIssue {
        title: issue_title(event, downstream),
        description: issue_description(event, downstream, working_branch, outcome),
        assignee_ids: vec![attrs.author_id],
        merge_request_to_resolve_discussions_of: Some(attrs.iid),
    };
    debug!(mr_iid = attrs.iid, working_branch, downstream, "opening failure issue");
    let created = platform
        .create_issue(attrs.source_project_id, &issue)
        .await
        .map_err(|e| Error::Reporting {
            what: "issue",
            source: Box::new(e),
        })?;
    Ok(Report::Issue(created))
}
