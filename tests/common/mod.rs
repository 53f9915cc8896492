//! Shared test helpers

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::*;

use mr_mirror::config::{BranchMapping, MappingPair};
use mr_mirror::mirror::Mirror;
use std::sync::Arc;

/// The mapping used across tests: MASTER mirrors onto `Branch_v2.1.1`
pub fn test_mapping() -> BranchMapping {
    ["MASTER=Branch_v2.1.1", "Branch_v2.0=MASTER"]
        .iter()
        .map(|pair| pair.parse::<MappingPair>().expect("valid mapping"))
        .collect()
}

/// A mirror over a fresh mock platform, returning both
pub fn mock_mirror() -> (Mirror, Arc<MockPlatformService>) {
    let platform = Arc::new(MockPlatformService::new());
    let mirror = Mirror::new(platform.clone(), test_mapping());
    (mirror, platform)
}

/// GitLab merge request hook body
pub fn merge_event_json(iid: u64, action: &str, target_branch: &str) -> String {
    serde_json::json!({
        "object_kind": "merge_request",
        "event_type": "merge_request",
        "user": { "id": 7, "name": "Jane Doe", "username": "jdoe" },
        "project": { "id": 3, "path_with_namespace": "group/project" },
        "object_attributes": {
            "id": 9001,
            "iid": iid,
            "title": "Fix crash on startup",
            "description": "Closes #12",
            "author_id": 7,
            "source_project_id": 3,
            "target_project_id": 3,
            "source_branch": "fix-crash",
            "target_branch": target_branch,
            "state": "opened",
            "action": action,
            "url": format!("https://gitlab.example.com/group/project/-/merge_requests/{iid}")
        }
    })
    .to_string()
}
