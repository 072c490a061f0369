//! Run command - invoke a task by name

use crate::cli::CliProgress;
use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check};
use anstream::println;
use gh_tasks::error::Result;
use gh_tasks::platform::GitHubServiceFactory;
use gh_tasks::tasks::TaskContext;
use std::path::Path;

/// Options for the run command
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Announce every task as it starts
    pub verbose: bool,
}

/// Run the run command
pub async fn run_task(
    config: Option<&Path>,
    repository: Option<&str>,
    task: &str,
    args: &[String],
    options: RunOptions,
) -> Result<()> {
    let ctx = CommandContext::new(config, repository, true).await?;

    let factory = GitHubServiceFactory::new(ctx.config.host.clone());
    let progress = if options.verbose {
        CliProgress::verbose()
    } else {
        CliProgress::compact()
    };

    ctx.app
        .invoke(
            task,
            args,
            TaskContext {
                factory: &factory,
                progress: &progress,
            },
        )
        .await?;

    println!("{} {}", check(), format!("{task} done").success());
    Ok(())
}
