//! Mirror engine for merge requests
//!
//! One webhook delivery flows through these stages in order:
//! 1. Validate - decode the event and apply the admission rules (pure)
//! 2. Prepare - create the working branch, fetch the commits oldest first
//! 3. Execute - cherry-pick commits one by one, stopping at the first failure
//! 4. Report - open a merge request on success, an issue otherwise

mod execute;
mod handle;
mod prepare;
mod report;
mod validate;

pub use execute::{CherryPickOutcome, cherry_pick_commits};
pub use handle::{Disposition, Mirror};
pub use prepare::{fetch_commits, prepare_branch, working_branch_name};
pub use report::{
    MERGE_REQUEST_TITLE_PREFIX, Report, issue_description, issue_title, merge_request_title,
    report_outcome,
};
pub use validate::{AcceptedEvent, admit, parse_event};
