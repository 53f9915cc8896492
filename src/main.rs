//! mr-mirror - cherry-pick GitLab merge requests onto downstream branches

mod cli;

use clap::Parser;
use cli::{Cli, run_serve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.init_tracing()?;
    run_serve(cli).await
}
