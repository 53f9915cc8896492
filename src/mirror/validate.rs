//! Event validation - pure functions deciding whether an event is mirrored
//!
//! Nothing here talks to the network, so a rejected event never causes a
//! remote side effect.

use crate::config::BranchMapping;
use crate::error::{Error, Result};
use crate::types::MergeEvent;

/// Webhook `object_kind` of merge request events
const MERGE_REQUEST_KIND: &str = "merge_request";

/// A merge event that passed admission, paired with its destination
#[derive(Debug, Clone)]
pub struct AcceptedEvent {
    /// The decoded event
    pub event: MergeEvent,
    /// Downstream branch the merge request is mirrored onto
    pub downstream: String,
}

/// Decode a webhook body into a [`MergeEvent`]
pub fn parse_event(body: &[u8]) -> Result<MergeEvent> {
    serde_json::from_slice(body).map_err(|e| Error::MalformedEvent(e.to_string()))
}

/// Apply the admission rules to a decoded event
///
/// An event is mirrored only when it opens or reopens a merge request whose
/// target branch has a downstream entry in `mapping`.
pub fn admit(event: MergeEvent, mapping: &BranchMapping) -> Result<AcceptedEvent> {
    let attrs = &event.object_attributes;
    let is_merge_request = event
        .object_kind
        .as_deref()
        .is_none_or(|kind| kind == MERGE_REQUEST_KIND);

    let downstream = mapping
        .downstream_for(&attrs.target_branch)
        .filter(|_| is_merge_request && attrs.action.is_mirrorable())
        .map(ToString::to_string);

    match downstream {
        Some(downstream) => Ok(AcceptedEvent { event, downstream }),
        None => Err(Error::NotActionable {
            action: attrs.action.to_string(),
            target_branch: attrs.target_branch.clone(),
        }),
    }
}
