//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use mr_mirror::error::{Error, Result};
use mr_mirror::platform::PlatformService;
use mr_mirror::types::{
    Branch, BranchTip, Commit, Issue, MergeRequest, NewIssue, NewMergeRequest,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `create_branch`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBranchCall {
    pub project: u64,
    pub branch: String,
    pub git_ref: String,
}

/// Call record for `cherry_pick`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CherryPickCall {
    pub project: u64,
    pub sha: String,
    pub branch: String,
}

/// Call record for `create_issue`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIssueCall {
    pub project: u64,
    pub issue: NewIssue,
}

/// Call record for `create_merge_request`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMrCall {
    pub project: u64,
    pub merge_request: NewMergeRequest,
}

/// Simple in-memory platform for testing
///
/// This manually implements `PlatformService` rather than using mockall.
///
/// Features:
/// - Commit lists per merge request, returned newest first like GitLab
/// - Call tracking for verification
/// - Error injection per operation, and per commit for cherry-picks
pub struct MockPlatformService {
    next_iid: AtomicU64,
    commits: Mutex<HashMap<u64, Vec<Commit>>>,
    // Call tracking
    create_branch_calls: Mutex<Vec<CreateBranchCall>>,
    list_commits_calls: Mutex<Vec<(u64, u64)>>,
    cherry_pick_calls: Mutex<Vec<CherryPickCall>>,
    create_issue_calls: Mutex<Vec<CreateIssueCall>>,
    create_mr_calls: Mutex<Vec<CreateMrCall>>,
    // Error injection
    error_on_create_branch: Mutex<Option<String>>,
    error_on_list_commits: Mutex<Option<String>>,
    error_on_cherry_pick: Mutex<HashMap<String, String>>,
    error_on_create_issue: Mutex<Option<String>>,
    error_on_create_mr: Mutex<Option<String>>,
}

impl Default for MockPlatformService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPlatformService {
    /// Create an empty mock
    pub fn new() -> Self {
        Self {
            next_iid: AtomicU64::new(100),
            commits: Mutex::new(HashMap::new()),
            create_branch_calls: Mutex::new(Vec::new()),
            list_commits_calls: Mutex::new(Vec::new()),
            cherry_pick_calls: Mutex::new(Vec::new()),
            create_issue_calls: Mutex::new(Vec::new()),
            create_mr_calls: Mutex::new(Vec::new()),
            error_on_create_branch: Mutex::new(None),
            error_on_list_commits: Mutex::new(None),
            error_on_cherry_pick: Mutex::new(HashMap::new()),
            error_on_create_issue: Mutex::new(None),
            error_on_create_mr: Mutex::new(None),
        }
    }

    /// Set the commits of a merge request, given newest first
    pub fn set_commits(&self, mr_iid: u64, newest_first: &[&str]) {
        self.commits
            .lock()
            .unwrap()
            .insert(mr_iid, newest_first.iter().map(|id| make_commit(id)).collect());
    }

    // === Error injection methods ===

    /// Make `create_branch` return an error
    pub fn fail_create_branch(&self, msg: &str) {
        *self.error_on_create_branch.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `merge_request_commits` return an error
    pub fn fail_list_commits(&self, msg: &str) {
        *self.error_on_list_commits.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `cherry_pick` of a specific commit return an error
    pub fn fail_cherry_pick(&self, sha: &str, msg: &str) {
        self.error_on_cherry_pick
            .lock()
            .unwrap()
            .insert(sha.to_string(), msg.to_string());
    }

    /// Make `create_issue` return an error
    pub fn fail_create_issue(&self, msg: &str) {
        *self.error_on_create_issue.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_merge_request` return an error
    pub fn fail_create_mr(&self, msg: &str) {
        *self.error_on_create_mr.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    /// Get all `create_branch` calls
    pub fn get_create_branch_calls(&self) -> Vec<CreateBranchCall> {
        self.create_branch_calls.lock().unwrap().clone()
    }

    /// Get all `(project, mr_iid)` pairs `merge_request_commits` was called with
    pub fn get_list_commits_calls(&self) -> Vec<(u64, u64)> {
        self.list_commits_calls.lock().unwrap().clone()
    }

    /// Get all `cherry_pick` calls
    pub fn get_cherry_pick_calls(&self) -> Vec<CherryPickCall> {
        self.cherry_pick_calls.lock().unwrap().clone()
    }

    /// Get the SHAs cherry-picked, in call order
    pub fn get_picked_shas(&self) -> Vec<String> {
        self.get_cherry_pick_calls()
            .into_iter()
            .map(|c| c.sha)
            .collect()
    }

    /// Get all `create_issue` calls
    pub fn get_create_issue_calls(&self) -> Vec<CreateIssueCall> {
        self.create_issue_calls.lock().unwrap().clone()
    }

    /// Get all `create_merge_request` calls
    pub fn get_create_mr_calls(&self) -> Vec<CreateMrCall> {
        self.create_mr_calls.lock().unwrap().clone()
    }

    /// Assert that nothing on the remote was read or changed
    pub fn assert_untouched(&self) {
        assert!(self.get_create_branch_calls().is_empty(), "unexpected create_branch");
        assert!(self.get_list_commits_calls().is_empty(), "unexpected commit listing");
        assert!(self.get_cherry_pick_calls().is_empty(), "unexpected cherry_pick");
        assert!(self.get_create_issue_calls().is_empty(), "unexpected create_issue");
        assert!(self.get_create_mr_calls().is_empty(), "unexpected create_merge_request");
    }

    fn next_iid(&self) -> u64 {
        self.next_iid.fetch_add(1, Ordering::SeqCst)
    }
}

/// Build a commit with only its SHA filled in
pub fn make_commit(id: &str) -> Commit {
    Commit {
        id: id.to_string(),
        title: String::new(),
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn create_branch(&self, project: u64, branch: &str, git_ref: &str) -> Result<Branch> {
        self.create_branch_calls
            .lock()
            .unwrap()
            .push(CreateBranchCall {
                project,
                branch: branch.to_string(),
                git_ref: git_ref.to_string(),
            });

        if let Some(msg) = self.error_on_create_branch.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        Ok(Branch {
            name: branch.to_string(),
            commit: Some(BranchTip {
                id: format!("tip_of_{git_ref}"),
            }),
        })
    }

    async fn merge_request_commits(&self, project: u64, mr_iid: u64) -> Result<Vec<Commit>> {
        self.list_commits_calls.lock().unwrap().push((project, mr_iid));

        if let Some(msg) = self.error_on_list_commits.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        Ok(self
            .commits
            .lock()
            .unwrap()
            .get(&mr_iid)
            .cloned()
            .unwrap_or_default())
    }

    async fn cherry_pick(&self, project: u64, sha: &str, branch: &str) -> Result<Commit> {
        self.cherry_pick_calls.lock().unwrap().push(CherryPickCall {
            project,
            sha: sha.to_string(),
            branch: branch.to_string(),
        });

        if let Some(msg) = self.error_on_cherry_pick.lock().unwrap().get(sha) {
            return Err(Error::Platform(msg.clone()));
        }

        Ok(make_commit(&format!("picked_{sha}")))
    }

    async fn create_issue(&self, project: u64, issue: &NewIssue) -> Result<Issue> {
        self.create_issue_calls.lock().unwrap().push(CreateIssueCall {
            project,
            issue: issue.clone(),
        });

        if let Some(msg) = self.error_on_create_issue.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        let iid = self.next_iid();
        Ok(Issue {
            iid,
            web_url: format!("https://gitlab.example.com/g/p/-/issues/{iid}"),
        })
    }

    async fn create_merge_request(
        &self,
        project: u64,
        merge_request: &NewMergeRequest,
    ) -> Result<MergeRequest> {
        self.create_mr_calls.lock().unwrap().push(CreateMrCall {
            project,
            merge_request: merge_request.clone(),
        });

        if let Some(msg) = self.error_on_create_mr.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        let iid = self.next_iid();
        Ok(MergeRequest {
            iid,
            web_url: format!("https://gitlab.example.com/g/p/-/merge_requests/{iid}"),
        })
    }
}
