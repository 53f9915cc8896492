//! Serve command - run the webhook listener

use crate::cli::Cli;
use anyhow::{Context, Result};
use mr_mirror::config::{BranchMapping, GitLabConfig};
use mr_mirror::mirror::Mirror;
use mr_mirror::platform::GitLabService;
use mr_mirror::server::serve;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::warn;

/// Build the mirror from the command line and serve until shutdown
pub async fn run_serve(cli: Cli) -> Result<()> {
    let gitlab = GitLabConfig {
        base_url: cli.gitlab_url,
        token: cli.gitlab_token,
        timeout: Duration::from_secs(cli.timeout),
        insecure: cli.insecure,
    };
    if gitlab.insecure {
        warn!("TLS certificate validation disabled for the GitLab API");
    }

    let platform = GitLabService::new(&gitlab)?;
    let mapping: BranchMapping = cli.mappings.into_iter().collect();
    let mirror = Mirror::new(Arc::new(platform), mapping);

    let listener = TcpListener::bind(&cli.listen)
        .await
        .with_context(|| format!("failed to bind {}", cli.listen))?;
    serve(listener, mirror).await?;
    Ok(())
}
