//! Command line interface

mod serve;

pub use serve::run_serve;

use anyhow::{Context, Result};
use clap::Parser;
use mr_mirror::config::{DEFAULT_TIMEOUT_SECS, MappingPair};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Mirror accepted GitLab merge requests onto downstream branches by cherry-picking
#[derive(Parser, Debug)]
#[command(name = "mr-mirror", version, about, long_about = None)]
pub struct Cli {
    /// Address to listen on
    #[arg(long, env = "MR_MIRROR_LISTEN", default_value = "0.0.0.0:80")]
    pub listen: String,

    /// GitLab base URL for the API, e.g. "https://gitlab.com"
    #[arg(long, env = "GITLAB_URL")]
    pub gitlab_url: String,

    /// GitLab access token (User Settings > Access Tokens)
    #[arg(long, env = "GITLAB_TOKEN", hide_env_values = true)]
    pub gitlab_token: String,

    /// Skip TLS certificate validation for the GitLab API
    #[arg(long)]
    pub insecure: bool,

    /// Timeout in seconds for each GitLab API call
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Append logs to this file instead of stdout
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log filter, e.g. "info" or "`mr_mirror=debug`"
    #[arg(long, env = "MR_MIRROR_LOG", default_value = "info")]
    pub log_level: String,

    /// Branch mappings: merge requests into BRANCH are mirrored onto DOWNSTREAM
    #[arg(value_name = "BRANCH=DOWNSTREAM", required = true, value_parser = parse_mapping)]
    pub mappings: Vec<MappingPair>,
}

fn parse_mapping(s: &str) -> std::result::Result<MappingPair, String> {
    s.parse().map_err(|e: mr_mirror::error::Error| e.to_string())
}

impl Cli {
    /// Install the global tracing subscriber
    pub fn init_tracing(&self) -> Result<()> {
        let filter = EnvFilter::try_new(&self.log_level)
            .with_context(|| format!("invalid log filter '{}'", self.log_level))?;

        if let Some(log_file) = &self.log_file {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)
                .with_context(|| format!("failed to open log file {}", log_file.display()))?;

            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(file)
                        .with_ansi(false),
                )
                .try_init()?;
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .try_init()?;
        }
        Ok(())
    }
}
