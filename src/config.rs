//! Runtime configuration
//!
//! The branch mapping decides which merge requests get mirrored and where to.
//! It is built once at startup and only read afterwards.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

/// Default timeout for each call to the remote API
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// One `upstream=downstream` pair from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingPair {
    /// Branch merge requests target
    pub upstream: String,
    /// Branch the merge request gets mirrored onto
    pub downstream: String,
}

impl FromStr for MappingPair {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split('=');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(upstream), Some(downstream), None) if !upstream.is_empty() => Ok(Self {
                upstream: upstream.to_string(),
                downstream: downstream.to_string(),
            }),
            _ => Err(Error::Config(format!(
                "invalid branch mapping '{s}', expected branch=downstream"
            ))),
        }
    }
}

/// Target branch to downstream branch lookup table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchMapping {
    branches: HashMap<String, String>,
}

impl BranchMapping {
    /// Downstream branch for a merge request target, if mapped
    ///
    /// Empty downstream entries count as unmapped.
    pub fn downstream_for(&self, target_branch: &str) -> Option<&str> {
        self.branches
            .get(target_branch)
            .map(String::as_str)
            .filter(|downstream| !downstream.is_empty())
    }

    /// Number of configured pairs
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    /// Whether no pairs are configured
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}

impl FromIterator<MappingPair> for BranchMapping {
    fn from_iter<I: IntoIterator<Item = MappingPair>>(iter: I) -> Self {
        Self {
            branches: iter
                .into_iter()
                .map(|pair| (pair.upstream, pair.downstream))
                .collect(),
        }
    }
}

/// Connection settings for the GitLab API
#[derive(Debug, Clone)]
pub struct GitLabConfig {
    /// Base URL, e.g. `https://gitlab.com`
    pub base_url: String,
    /// Access token
    pub token: String,
    /// Timeout applied to each API call
    pub timeout: Duration,
    /// Accept invalid TLS certificates
    pub insecure: bool,
}

impl GitLabConfig {
    /// Config with the default timeout and certificate validation on
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            insecure: false,
        }
    }
}
