//! List command - show defined tasks

use crate::cli::context::CommandContext;
use crate::cli::style::Stylize;
use anstream::println;
use gh_tasks::error::Result;
use std::path::Path;

/// Run the list command
pub async fn run_list(config: Option<&Path>, repository: Option<&str>) -> Result<()> {
    let ctx = CommandContext::new(config, repository, false).await?;

    let names: Vec<String> = ctx.app.tasks().iter().map(|t| t.full_name()).collect();
    let width = names.iter().map(String::len).max().unwrap_or(0);

    println!(
        "{}",
        format!("Tasks from {}:", ctx.config_path.display()).muted()
    );
    for (name, task) in names.iter().zip(ctx.app.tasks()) {
        println!(
            "  {}  {}",
            format!("{name:<width$}").accent(),
            format!("# {}", task.description).muted()
        );
    }

    Ok(())
}
