//! Request orchestration
//!
//! Wires validation, preparation, execution and reporting into one flow per
//! webhook delivery and decides what the sender gets back.

use crate::config::BranchMapping;
use crate::error::Error;
use crate::mirror::execute::cherry_pick_commits;
use crate::mirror::prepare::{fetch_commits, prepare_branch};
use crate::mirror::report::{Report, report_outcome};
use crate::mirror::validate::{AcceptedEvent, admit, parse_event};
use crate::platform::PlatformService;
use axum::http::StatusCode;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// How a webhook delivery ended
///
/// The mirror's success or failure is reported through GitLab, not through
/// the response, so a partial failure still answers "ok".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Event was malformed or not actionable, nothing was touched
    Ignored,
    /// Branch creation or commit listing failed before any cherry-pick
    FailedEarly,
    /// Commits were picked and a report was attempted
    Done {
        /// Whether every commit applied
        mirrored: bool,
    },
}

impl Disposition {
    /// HTTP status answered to the webhook sender
    pub const fn status_code(self) -> StatusCode {
        match self {
            Self::Ignored | Self::Done { .. } => StatusCode::OK,
            Self::FailedEarly => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Plain-text body answered to the webhook sender
    pub const fn body(self) -> &'static str {
        match self {
            Self::Ignored => "ignored",
            Self::FailedEarly => "failed",
            Self::Done { .. } => "ok",
        }
    }
}

/// Mirrors merge request events onto their downstream branches
///
/// Cheap to clone; every clone shares the same platform client and mapping.
/// Holds no per-request state, so deliveries can be handled concurrently.
#[derive(Clone)]
pub struct Mirror {
    platform: Arc<dyn PlatformService>,
    mapping: Arc<BranchMapping>,
}

impl Mirror {
    /// Create a mirror over `platform` using `mapping`
    pub fn new(platform: Arc<dyn PlatformService>, mapping: BranchMapping) -> Self {
        Self {
            platform,
            mapping: Arc::new(mapping),
        }
    }

    /// Branch mapping in use
    pub fn mapping(&self) -> &BranchMapping {
        &self.mapping
    }

    /// Handle a raw webhook body
    pub async fn handle(&self, body: &[u8]) -> Disposition {
        let accepted = match parse_event(body).and_then(|event| admit(event, &self.mapping)) {
            Ok(accepted) => accepted,
            Err(e @ Error::MalformedEvent(_)) => {
                debug!(error = %e, "ignoring undecodable webhook body");
                return Disposition::Ignored;
            }
            Err(e) => {
                info!(error = %e, "ignoring merge event");
                return Disposition::Ignored;
            }
        };
        self.mirror(&accepted).await
    }

    /// Mirror an event that already passed admission
    pub async fn mirror(&self, accepted: &AcceptedEvent) -> Disposition {
        let platform = self.platform.as_ref();
        let event = &accepted.event;
        let downstream = accepted.downstream.as_str();
        let attrs = &event.object_attributes;
        info!(mr_iid = attrs.iid, url = %attrs.url, downstream, "start cherry-picking MR");

        let branch = match prepare_branch(platform, event, downstream).await {
            Ok(branch) => branch,
            Err(e) => {
                error!(
                    mr_iid = attrs.iid,
                    downstream,
                    error = %e,
                    "failed to prepare working branch"
                );
                return Disposition::FailedEarly;
            }
        };
        info!(
            mr_iid = attrs.iid,
            working_branch = %branch.name,
            downstream,
            "working branch prepared"
        );

        let commits = match fetch_commits(platform, event).await {
            Ok(commits) => commits,
            Err(e) => {
                error!(
                    mr_iid = attrs.iid,
                    downstream,
                    error = %e,
                    "failed to fetch MR commits"
                );
                return Disposition::FailedEarly;
            }
        };

        let outcome =
            cherry_pick_commits(platform, attrs.source_project_id, commits, &branch.name).await;
        let mirrored = outcome.is_complete();
        if let Some(cause) = outcome.cause() {
            warn!(
                mr_iid = attrs.iid,
                title = %attrs.title,
                downstream,
                applied = outcome.applied().len(),
                total = outcome.total(),
                error = %cause,
                "cherry-pick of MR failed"
            );
        }

        match report_outcome(platform, event, downstream, &branch.name, &outcome).await {
            Ok(Report::MergeRequest(mr)) => {
                info!(
                    mr_iid = attrs.iid,
                    downstream,
                    new_mr = mr.iid,
                    url = %mr.web_url,
                    "cherry-pick of MR succeeded"
                );
            }
            Ok(Report::Issue(issue)) => {
                info!(
                    mr_iid = attrs.iid,
                    downstream,
                    issue = issue.iid,
                    url = %issue.web_url,
                    "issue created for the failure"
                );
            }
            Err(e) => {
                warn!(
                    mr_iid = attrs.iid,
                    downstream,
                    mirrored,
                    error = %e,
                    "failed to report cherry-pick outcome"
                );
            }
        }

        Disposition::Done { mirrored }
    }
}
